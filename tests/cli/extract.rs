use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, TEXT_KEYS_CONFIG, stderr, stdout};

const APP: &str = "const a = `你好, ${name}`;\nconst b = \"再见\";\n";

#[test]
fn test_extract_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file(".autoi18nrc.json", TEXT_KEYS_CONFIG)?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Collected 2 key(s) from 1 source file"), "stdout: {}", out);
    assert!(out.contains("Would update 1 locale file(s):"));
    assert!(out.contains("Run with --apply to write the locale files."));

    assert!(!test.root().join("locales").exists());

    Ok(())
}

#[test]
fn test_extract_apply_never_touches_sources() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file(".autoi18nrc.json", TEXT_KEYS_CONFIG)?;

    let output = test.extract_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Updated 1 locale file(s):"));

    assert_eq!(test.read_file("src/app.js")?, APP);
    assert_eq!(
        test.read_json("locales/zh-CN.json")?,
        json!({ "你好, {var1}": "你好, {var1}", "再见": "再见" })
    );

    Ok(())
}

#[test]
fn test_extract_keeps_existing_keys() -> Result<()> {
    let test = CliTest::with_file("src/app.js", "const b = \"再见\";\n")?;
    test.write_file(".autoi18nrc.json", TEXT_KEYS_CONFIG)?;
    test.write_file("locales/zh-CN.json", "{\n  \"旧的\": \"旧的\"\n}\n")?;

    let output = test.extract_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_json("locales/zh-CN.json")?,
        json!({ "再见": "再见", "旧的": "旧的" })
    );

    Ok(())
}
