use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["includes", "calleeName", "localePattern", "keyStrategy", "output"] {
        assert!(parsed.get(field).is_some(), "Config should have '{}' field", field);
    }
    assert_eq!(parsed["output"]["filename"], "zh-CN.json");

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );
    assert!(content.ends_with('\n'));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Created .autoi18nrc.json"));

    assert!(test.root().join(".autoi18nrc.json").exists());

    let content = test.read_file(".autoi18nrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".autoi18nrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains(".autoi18nrc.json already exists"));
    assert_eq!(test.read_file(".autoi18nrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file("src/app.js", r#"const a = "测试";"#)?;

    let output = test.transform_command().output()?;
    assert!(
        output.status.success(),
        "Transform should work with initialized config. stderr: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("Would rewrite 1 literal(s) in 1 file(s)."));

    Ok(())
}
