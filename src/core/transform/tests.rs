use std::sync::Arc;

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use regex::Regex;

use super::*;
use crate::core::{
    dependency::ModuleSystem, exclusion::Exclusion, occurrence::Occurrence,
    scanner::SkipReason,
};

fn prefixed_key(text: &str, _: &Occurrence<'_>, _: &KeyRegistry) -> String {
    format!("key_{}", text)
}

fn constant_key(_: &str, _: &Occurrence<'_>, _: &KeyRegistry) -> String {
    "same".to_string()
}

fn config() -> TransformConfig {
    TransformConfig {
        key_strategy: Arc::new(prefixed_key),
        ..Default::default()
    }
}

fn with_dependency(module: ModuleSystem) -> TransformConfig {
    TransformConfig {
        dependency: Some(DependencyConfig {
            path: "@/i18n".to_string(),
            name: "i18n".to_string(),
            module,
            object_pattern: false,
            preprocessing: None,
        }),
        ..config()
    }
}

fn run_with(id: &str, code: &str, config: &TransformConfig) -> (TransformOutput, KeyRegistry) {
    let mut registry = KeyRegistry::new();
    let output = transform(id, code, config, &mut registry).unwrap();
    (output, registry)
}

fn rewrite(code: &str) -> String {
    run_with("test.js", code, &config()).0.code
}

fn skip_reasons(report: &FileReport) -> Vec<SkipReason> {
    report.skipped.iter().map(|s| s.reason.clone()).collect()
}

// ============================================================================
// String literals
// ============================================================================

#[test]
fn test_rewrites_variable_initializer() {
    let (output, registry) = run_with("test.js", "const a = \"你好\";", &config());
    assert_eq!(output.code, "const a = i18n(\"key_你好\");");
    assert_eq!(registry.get("key_你好"), Some("你好"));

    let record = &output.report.rewrites[0];
    assert_eq!(record.kind, LiteralKind::String);
    assert_eq!((record.line, record.col), (1, 11));
}

#[test]
fn test_single_quoted_source_is_written_with_double_quotes() {
    assert_eq!(rewrite("const a = '你好';"), "const a = i18n(\"key_你好\");");
}

#[test]
fn test_rewrites_supported_containers() {
    assert_eq!(rewrite("alert(\"你好\");"), "alert(i18n(\"key_你好\"));");
    assert_eq!(
        rewrite("throw new Error(\"错误\");"),
        "throw new Error(i18n(\"key_错误\"));"
    );
    assert_eq!(
        rewrite("const a = [\"甲\", 1, \"乙\"];"),
        "const a = [i18n(\"key_甲\"), 1, i18n(\"key_乙\")];"
    );
    assert_eq!(
        rewrite("const o = { title: \"标题\" };"),
        "const o = { title: i18n(\"key_标题\") };"
    );
    assert_eq!(
        rewrite("const a = ok ? \"是\" : \"否\";"),
        "const a = ok ? i18n(\"key_是\") : i18n(\"key_否\");"
    );
    assert_eq!(
        rewrite("const a = b || \"默认\";"),
        "const a = b || i18n(\"key_默认\");"
    );
    assert_eq!(
        rewrite("function f() { return \"你好\"; }"),
        "function f() { return i18n(\"key_你好\"); }"
    );
    assert_eq!(
        rewrite("function f(a = \"你好\") {}"),
        "function f(a = i18n(\"key_你好\")) {}"
    );
}

#[test]
fn test_parenthesized_argument_keeps_parens() {
    assert_eq!(rewrite("alert((\"你好\"));"), "alert((i18n(\"key_你好\")));");
}

#[test]
fn test_literal_without_match_is_untouched() {
    let (output, registry) = run_with("test.js", "const a = \"hello\";", &config());
    assert_eq!(output.code, "const a = \"hello\";");
    assert!(registry.is_empty());
    assert!(!output.report.is_changed());
    assert!(output.report.skipped.is_empty());
}

#[test]
fn test_duplicate_siblings_share_one_key() {
    let (output, registry) = run_with("test.js", "foo(\"你好\", \"你好\");", &config());
    assert_eq!(output.code, "foo(i18n(\"key_你好\"), i18n(\"key_你好\"));");
    assert_eq!(registry.len(), 1);
    assert_eq!(output.report.rewrites.len(), 2);
}

#[test]
fn test_md5_keys_by_default() {
    let (output, registry) = run_with(
        "test.js",
        "const a = \"你好世界\";",
        &TransformConfig::default(),
    );
    assert_eq!(
        output.code,
        "const a = i18n(\"65396ee4aad0b4f17aacd1c6112ee364\");"
    );
    assert_eq!(
        registry.get("65396ee4aad0b4f17aacd1c6112ee364"),
        Some("你好世界")
    );
}

#[test]
fn test_custom_callee_name() {
    let config = TransformConfig {
        callee_name: "$t".to_string(),
        ..config()
    };
    let (output, _) = run_with("test.js", "const a = \"你好\";", &config);
    assert_eq!(output.code, "const a = $t(\"key_你好\");");
}

// ============================================================================
// Whitespace and multi-line strings
// ============================================================================

#[test]
fn test_padding_stays_outside_the_call() {
    assert_eq!(
        rewrite("const a = \" 你好 \";"),
        "const a = \" \" + i18n(\"key_你好\") + \" \";"
    );
}

#[test]
fn test_concat_in_binary_operand_is_grouped() {
    assert_eq!(
        rewrite("const a = b + \" 你好\";"),
        "const a = b + (\" \" + i18n(\"key_你好\"));"
    );
}

#[test]
fn test_multi_line_string_gets_one_key_per_line() {
    let (output, registry) = run_with("test.js", "const a = \"第一行\\n第二行\";", &config());
    assert_eq!(
        output.code,
        "const a = i18n(\"key_第一行\") + \"\\n\" + i18n(\"key_第二行\");"
    );
    assert_eq!(registry.len(), 2);
    assert_eq!(output.report.rewrites.len(), 2);
}

#[test]
fn test_lines_without_match_stay_verbatim() {
    assert_eq!(
        rewrite("const a = \"你好\\nabc\";"),
        "const a = i18n(\"key_你好\") + \"\\nabc\";"
    );
}

// ============================================================================
// Template literals
// ============================================================================

#[test]
fn test_template_without_holes_keeps_padding_in_key() {
    let (output, registry) = run_with("test.js", "const a = `  你好  `;", &config());
    assert_eq!(output.code, "const a = i18n(\"key_  你好  \");");
    assert_eq!(registry.get("key_  你好  "), Some("  你好  "));
    assert_eq!(output.report.rewrites[0].kind, LiteralKind::Template);
}

#[test]
fn test_template_holes_become_variables() {
    assert_eq!(
        rewrite("const a = `你好，${name}`;"),
        "const a = i18n(\"key_你好，{var1}\", { var1: name });"
    );
    assert_eq!(
        rewrite("const s = `第${a}页，共${b}页${c}`;"),
        "const s = i18n(\"key_第{var1}页，共{var2}页{var3}\", { var1: a, var2: b, var3: c });"
    );
}

#[test]
fn test_template_of_only_holes_keys_placeholders() {
    let config = TransformConfig {
        detection_pattern: Regex::new(".*").unwrap(),
        ..config()
    };
    let (output, registry) = run_with("test.js", "const s = `${a}${b}${c}`;", &config);
    assert_eq!(
        output.code,
        "const s = i18n(\"key_{var1}{var2}{var3}\", { var1: a, var2: b, var3: c });"
    );
    assert_eq!(registry.get("key_{var1}{var2}{var3}"), Some("{var1}{var2}{var3}"));
}

#[test]
fn test_hole_expressions_are_copied_verbatim() {
    assert_eq!(
        rewrite("const a = `共${list.length + 1}项`;"),
        "const a = i18n(\"key_共{var1}项\", { var1: list.length + 1 });"
    );
}

#[test]
fn test_sequence_hole_is_grouped() {
    assert_eq!(
        rewrite("const s = `你好${a, b}`;"),
        "const s = i18n(\"key_你好{var1}\", { var1: (a, b) });"
    );
}

#[test]
fn test_string_inside_rewritten_hole_is_rewritten_too() {
    let (output, registry) = run_with("test.js", "const a = `你好${\"世界\"}`;", &config());
    assert_eq!(
        output.code,
        "const a = i18n(\"key_你好{var1}\", { var1: i18n(\"key_世界\") });"
    );
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_template_without_match_is_untouched() {
    assert_eq!(rewrite("const a = `hello ${name}`;"), "const a = `hello ${name}`;");
}

#[test]
fn test_tagged_template_is_untouched() {
    assert_eq!(rewrite("const a = css`你好`;"), "const a = css`你好`;");
}

// ============================================================================
// Exclusions
// ============================================================================

#[test]
fn test_console_arguments_are_excluded() {
    let (output, registry) = run_with("test.js", "console.log(\"你好\", `再见${a}`);", &config());
    assert_eq!(output.code, "console.log(\"你好\", `再见${a}`);");
    assert!(registry.is_empty());
    assert_eq!(
        skip_reasons(&output.report),
        vec![
            SkipReason::Excluded {
                rule: Exclusion::Diagnostic
            },
            SkipReason::Excluded {
                rule: Exclusion::Diagnostic
            },
        ]
    );
}

#[test]
fn test_ignore_marker_in_every_callee_form() {
    let code = "ignoreAutoI18n(\"你好\");\nutils.ignoreAutoI18n(\"你好\");\n(0, _utils.ignoreAutoI18n)(\"你好\");";
    let (output, registry) = run_with("test.js", code, &config());
    assert_eq!(output.code, code);
    assert!(registry.is_empty());
    assert_eq!(output.report.skipped.len(), 3);
    assert!(output.report.skipped.iter().all(|s| s.reason
        == SkipReason::Excluded {
            rule: Exclusion::IgnoreMarker
        }));
}

#[test]
fn test_module_specifiers_are_excluded() {
    let code = "import a from \"./中文\";\nexport * from \"./中文\";\nconst b = require(\"./中文\");\nimport(\"./中文\");";
    let (output, registry) = run_with("test.js", code, &config());
    assert_eq!(output.code, code);
    assert!(registry.is_empty());
}

#[test]
fn test_unsupported_position_is_reported() {
    let (output, _) = run_with("test.js", "const a = \"中文\".split(\"\");", &config());
    assert_eq!(output.code, "const a = \"中文\".split(\"\");");
    assert_eq!(
        skip_reasons(&output.report),
        vec![SkipReason::UnsupportedShape]
    );
}

#[test]
fn test_rerun_is_a_no_op() {
    let config = config();
    let mut registry = KeyRegistry::new();
    let code = "const a = \"你好\";\nconst b = `共${n}条`;";
    let first = transform("test.js", code, &config, &mut registry).unwrap();
    let second = transform("test.js", &first.code, &config, &mut registry).unwrap();

    assert_eq!(second.code, first.code);
    assert!(second.report.rewrites.is_empty());
    assert_eq!(registry.len(), 2);
}

// ============================================================================
// Key conflicts
// ============================================================================

#[test]
fn test_conflicting_key_skips_the_occurrence() {
    let config = TransformConfig {
        key_strategy: Arc::new(constant_key),
        ..config()
    };
    let (output, registry) = run_with("test.js", "const a = \"甲\"; const b = \"乙\";", &config);
    assert_eq!(output.code, "const a = i18n(\"same\"); const b = \"乙\";");
    assert_eq!(registry.get("same"), Some("甲"));
    assert_eq!(
        skip_reasons(&output.report),
        vec![SkipReason::KeyConflict {
            key: "same".to_string(),
            existing: "甲".to_string(),
        }]
    );
}

// ============================================================================
// Dependency injection
// ============================================================================

#[test]
fn test_import_is_injected_after_existing_imports() {
    let (output, _) = run_with(
        "test.js",
        "import a from \"a\";\nconst b = \"你好\";",
        &with_dependency(ModuleSystem::Import),
    );
    assert!(output.report.injected);
    assert_snapshot!(output.code, @r#"
import a from "a";
import i18n from "@/i18n";
const b = i18n("key_你好");
"#);
}

#[test]
fn test_import_is_injected_at_top() {
    let (output, _) = run_with(
        "test.ts",
        "const b: string = \"你好\";",
        &with_dependency(ModuleSystem::Import),
    );
    assert_snapshot!(output.code, @r#"
import i18n from "@/i18n";
const b: string = i18n("key_你好");
"#);
}

#[test]
fn test_require_is_injected_after_directives() {
    let (output, _) = run_with(
        "test.js",
        "'use strict';\nconst b = \"你好\";",
        &with_dependency(ModuleSystem::Require),
    );
    assert_snapshot!(output.code, @r#"
'use strict';
const i18n = require("@/i18n");
const b = i18n("key_你好");
"#);
}

#[test]
fn test_require_is_declared_before_first_rewritten_statement() {
    let (output, _) = run_with(
        "test.js",
        "const a = \"你好\";\nconst b = a;",
        &with_dependency(ModuleSystem::Require),
    );
    assert_snapshot!(output.code, @r#"
const i18n = require("@/i18n");
const a = i18n("key_你好");
const b = a;
"#);
}

#[test]
fn test_existing_import_is_not_duplicated() {
    let code = "import i18n from \"@/i18n\";\nconst b = \"你好\";";
    let (output, _) = run_with("test.js", code, &with_dependency(ModuleSystem::Import));
    assert!(!output.report.injected);
    assert_eq!(output.report.dependency, DependencyState::ResolvedImport);
    assert_eq!(
        output.code,
        "import i18n from \"@/i18n\";\nconst b = i18n(\"key_你好\");"
    );
}

#[test]
fn test_nothing_is_injected_without_rewrites() {
    let code = "const b = \"hello\";";
    let (output, _) = run_with("test.js", code, &with_dependency(ModuleSystem::Import));
    assert!(!output.report.injected);
    assert_eq!(output.code, code);
}

#[test]
fn test_invalid_dependency_is_an_error() {
    let mut config = with_dependency(ModuleSystem::Import);
    if let Some(dep) = config.dependency.as_mut() {
        dep.name = "not valid".to_string();
    }
    let mut registry = KeyRegistry::new();
    assert!(transform("test.js", "const b = \"你好\";", &config, &mut registry).is_err());
}

// ============================================================================
// Compiled single-file components
// ============================================================================

#[test]
fn test_sfc_comment_and_file_metadata_are_excluded() {
    let code = "_createCommentVNode(\"注释\");\nexport default _export_sfc(_sfc_main, [[\"__file\", \"/src/中文.vue\"]]);";
    let (output, registry) = run_with("App.vue", code, &config());
    assert_eq!(output.code, code);
    assert!(registry.is_empty());
    assert_eq!(
        skip_reasons(&output.report),
        vec![
            SkipReason::Excluded {
                rule: Exclusion::FrameworkComment
            },
            SkipReason::Excluded {
                rule: Exclusion::FrameworkMetadata
            },
        ]
    );
}

#[test]
fn test_sfc_rules_need_vue_id() {
    assert_eq!(
        rewrite("_createCommentVNode(\"注释\");"),
        "_createCommentVNode(i18n(\"key_注释\"));"
    );
    let (output, _) = run_with(
        "App.vue?vue&type=script",
        "_createCommentVNode(\"注释\");",
        &config(),
    );
    assert_eq!(output.code, "_createCommentVNode(\"注释\");");
}

// ============================================================================
// Syntax and source maps
// ============================================================================

#[test]
fn test_parses_typescript_and_jsx() {
    let (output, _) = run_with(
        "test.tsx",
        "const title: string = \"标题\";\nconst el = <div title={`你好`}>{name}</div>;",
        &config(),
    );
    assert_eq!(
        output.code,
        "const title: string = i18n(\"key_标题\");\nconst el = <div title={i18n(\"key_你好\")}>{name}</div>;"
    );
}

#[test]
fn test_parse_error_is_reported() {
    let mut registry = KeyRegistry::new();
    let err = transform("test.js", "const = ;", &config(), &mut registry).unwrap_err();
    assert!(err.to_string().contains("test.js"));
}

#[test]
fn test_source_map_points_back_to_original() {
    let (output, _) = run_with(
        "test.js",
        "const a = \"你好\";\nconst b = 1;",
        &with_dependency(ModuleSystem::Import),
    );
    assert_eq!(
        output.code,
        "import i18n from \"@/i18n\";\nconst a = i18n(\"key_你好\");\nconst b = 1;"
    );

    // Rewritten call on output line 1 starts at the original literal.
    let token = output.map.lookup_token(1, 10).unwrap();
    assert_eq!((token.get_src_line(), token.get_src_col()), (0, 10));

    // Untouched line after it.
    let token = output.map.lookup_token(2, 0).unwrap();
    assert_eq!((token.get_src_line(), token.get_src_col()), (1, 0));

    let json = output.map_json().unwrap();
    assert!(json.contains("\"sources\":[\"test.js\"]"));
}
