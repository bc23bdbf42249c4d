use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, TEXT_KEYS_CONFIG, stderr, stdout};

const APP: &str = r#"const title = "你好";
console.log("调试");
export default title;
"#;

#[test]
fn test_dry_run_leaves_files_untouched() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file(".autoi18nrc.json", TEXT_KEYS_CONFIG)?;

    let output = test.transform_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("rewrite: \"你好\""), "stdout: {}", out);
    assert!(out.contains("--> src/app.js:1:15"), "stdout: {}", out);
    assert!(out.contains("Would rewrite 1 literal(s) in 1 file(s)."));
    assert!(out.contains("locales/zh-CN.json: 1 key(s) (+1, -0)"));
    assert!(out.contains("Run with --apply to write these changes."));

    assert_eq!(test.read_file("src/app.js")?, APP);
    assert!(!test.root().join("locales").exists());

    Ok(())
}

#[test]
fn test_apply_rewrites_and_writes_locale() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file(".autoi18nrc.json", TEXT_KEYS_CONFIG)?;

    let output = test.transform_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Rewrote 1 literal(s) in 1 file(s)."));

    assert_eq!(
        test.read_file("src/app.js")?,
        r#"const title = i18n("你好");
console.log("调试");
export default title;
"#
    );
    assert_eq!(test.read_json("locales/zh-CN.json")?, json!({ "你好": "你好" }));

    Ok(())
}

#[test]
fn test_rerun_after_apply_is_a_no_op() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file(".autoi18nrc.json", TEXT_KEYS_CONFIG)?;

    test.transform_command().arg("--apply").output()?;
    let first = test.read_file("src/app.js")?;
    let locale = test.read_file("locales/zh-CN.json")?;

    let output = test.transform_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Checked 1 source file - nothing to rewrite"));

    assert_eq!(test.read_file("src/app.js")?, first);
    assert_eq!(test.read_file("locales/zh-CN.json")?, locale);

    Ok(())
}

#[test]
fn test_default_keys_are_md5() -> Result<()> {
    let test = CliTest::with_file("src/app.js", r#"const a = "你好";"#)?;

    let output = test.transform_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_file("src/app.js")?,
        r#"const a = i18n("7eca689f0d3389d9dea66ae112e5cfd7");"#
    );
    assert_eq!(
        test.read_json("locales/zh-CN.json")?,
        json!({ "7eca689f0d3389d9dea66ae112e5cfd7": "你好" })
    );

    Ok(())
}

#[test]
fn test_injects_configured_dependency() -> Result<()> {
    let test = CliTest::with_file(
        "src/page.ts",
        r#"import { ref } from "vue";
const label = ref("标签");
"#,
    )?;
    test.write_file(
        ".autoi18nrc.json",
        r#"{
  "keyStrategy": "text",
  "dependency": { "path": "@/i18n", "name": "i18n" }
}"#,
    )?;

    let output = test.transform_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let code = test.read_file("src/page.ts")?;
    assert!(code.contains(r#"import i18n from "@/i18n";"#), "code: {}", code);
    assert!(code.contains(r#"ref(i18n("标签"))"#), "code: {}", code);

    Ok(())
}

#[test]
fn test_out_dir_mirrors_sources_with_source_maps() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file("src/util.js", "export const one = 1;\n")?;
    test.write_file(
        ".autoi18nrc.json",
        r#"{
  "keyStrategy": "text",
  "sourceMaps": true
}"#,
    )?;

    let output = test
        .transform_command()
        .args(["--apply", "--out-dir", "build"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("into build"));

    // Sources stay as they were.
    assert_eq!(test.read_file("src/app.js")?, APP);

    assert!(test.read_file("build/src/app.js")?.contains(r#"i18n("你好")"#));
    assert_eq!(test.read_file("build/src/util.js")?, "export const one = 1;\n");

    let map = test.read_json("build/src/app.js.map")?;
    assert_eq!(map["version"], json!(3));
    assert_eq!(map["sources"], json!(["src/app.js"]));
    assert!(!test.root().join("build/src/util.js.map").exists());

    Ok(())
}

#[test]
fn test_lang_list_keeps_translations() -> Result<()> {
    let test = CliTest::with_file("src/app.js", "const a = \"你好\";\nconst b = \"再见\";\n")?;
    test.write_file(
        ".autoi18nrc.json",
        r#"{
  "keyStrategy": "text",
  "output": { "path": "i18n", "langList": ["en-US"] }
}"#,
    )?;
    test.write_file(
        "i18n/en-US.json",
        r#"{ "你好": "Hello", "再见": "", "旧的": "Old" }"#,
    )?;

    let output = test.transform_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_json("i18n/zh-CN.json")?,
        json!({ "你好": "你好", "再见": "再见" })
    );
    assert_eq!(
        test.read_json("i18n/en-US.json")?,
        json!({ "你好": "Hello", "再见": "再见" })
    );

    Ok(())
}

#[test]
fn test_parse_error_fails_only_that_file() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file("src/broken.js", "const = \"坏\";\n")?;
    test.write_file(".autoi18nrc.json", TEXT_KEYS_CONFIG)?;

    let output = test.transform_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("1 file(s) could not be transformed"));

    assert!(test.read_file("src/app.js")?.contains(r#"i18n("你好")"#));
    assert_eq!(test.read_file("src/broken.js")?, "const = \"坏\";\n");

    Ok(())
}

#[test]
fn test_verbose_names_the_failing_file() -> Result<()> {
    let test = CliTest::with_file("src/broken.js", "const = \"坏\";\n")?;

    let output = test.transform_command().arg("-v").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("src/broken.js"), "stderr: {}", stderr(&output));

    Ok(())
}

#[test]
fn test_skips_test_files_and_node_modules() -> Result<()> {
    let test = CliTest::with_file("src/app.test.js", r#"const a = "测试";"#)?;
    test.write_file("src/node_modules/lib/index.js", r#"const b = "依赖";"#)?;

    let output = test.transform_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Checked 0 source files - nothing to rewrite"));

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file(".autoi18nrc.json", r#"{ "localePattern": "[" }"#)?;

    let output = test.transform_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("localePattern"));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("transform"));
    assert!(out.contains("extract"));
    assert!(out.contains("init"));

    Ok(())
}
