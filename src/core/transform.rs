//! Single-file entry point: parse, scan, plan, emit.

use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use swc_common::SourceMap;
use swc_ecma_visit::VisitWith;

use super::{
    dependency::{DependencyConfig, DependencyState, plan_injection},
    emit::emit,
    occurrence::LiteralKind,
    parsers::parse_source,
    registry::{KeyRegistry, KeyStrategy, Md5Keys},
    scanner::{LiteralScanner, ScanOutcome, SkippedLiteral},
};

pub const DEFAULT_CALLEE: &str = "i18n";
pub const DEFAULT_IGNORE_CALLEE: &str = "ignoreAutoI18n";
pub const DEFAULT_LOCALE_PATTERN: &str = r"[\u4E00-\u9FA5]+";

static DEFAULT_DETECTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_LOCALE_PATTERN).unwrap());

/// Engine settings for one transform call.
#[derive(Clone)]
pub struct TransformConfig {
    /// Localization function written at every rewritten site.
    pub callee_name: String,
    /// Literals (and line cores) are only rewritten when this matches.
    pub detection_pattern: Regex,
    /// Calls to this identity function keep their arguments untouched.
    pub ignore_callee: String,
    pub key_strategy: Arc<dyn KeyStrategy>,
    /// Injected when a file gets rewritten without having it in scope.
    pub dependency: Option<DependencyConfig>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            callee_name: DEFAULT_CALLEE.to_string(),
            detection_pattern: DEFAULT_DETECTION_PATTERN.clone(),
            ignore_callee: DEFAULT_IGNORE_CALLEE.to_string(),
            key_strategy: Arc::new(Md5Keys),
            dependency: None,
        }
    }
}

impl std::fmt::Debug for TransformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformConfig")
            .field("callee_name", &self.callee_name)
            .field("detection_pattern", &self.detection_pattern.as_str())
            .field("ignore_callee", &self.ignore_callee)
            .field("dependency", &self.dependency)
            .finish_non_exhaustive()
    }
}

/// One key written into the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRecord {
    pub key: String,
    pub text: String,
    pub kind: LiteralKind,
    pub line: usize,
    pub col: usize,
}

/// What happened to a single file.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub rewrites: Vec<RewriteRecord>,
    pub skipped: Vec<SkippedLiteral>,
    pub dependency: DependencyState,
    pub injected: bool,
}

impl FileReport {
    pub fn is_changed(&self) -> bool {
        !self.rewrites.is_empty() || self.injected
    }
}

#[derive(Debug)]
pub struct TransformOutput {
    pub code: String,
    pub map: sourcemap::SourceMap,
    pub report: FileReport,
}

impl TransformOutput {
    /// Serialized source map JSON.
    pub fn map_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.map
            .to_writer(&mut buf)
            .context("Failed to serialize source map")?;
        String::from_utf8(buf).context("Source map is not valid UTF-8")
    }
}

/// Rewrite every eligible literal of one file.
///
/// `id` names the file (its extension selects the parser syntax and framework
/// rules). New keys are added to `registry`; a parse failure or an invalid
/// dependency configuration is an error, everything else is reported in
/// [`FileReport`] and leaves the affected literal untouched.
pub fn transform(
    id: &str,
    code: &str,
    config: &TransformConfig,
    registry: &mut KeyRegistry,
) -> Result<TransformOutput> {
    let source_map: Arc<SourceMap> = Default::default();
    let parsed = parse_source(code.to_string(), id, source_map.clone())?;
    let start_pos = parsed.source_file.start_pos;

    let mut scanner = LiteralScanner::new(id, config, registry, &source_map);
    parsed.program.visit_with(&mut scanner);
    let ScanOutcome {
        rewrites,
        skipped,
        dependency,
    } = scanner.finish();

    let injection = match &config.dependency {
        Some(dep) => plan_injection(
            &parsed.program,
            start_pos,
            code.len(),
            dep,
            dependency,
            !rewrites.is_empty(),
        )?,
        None => None,
    };

    let emitted = emit(id, code, start_pos, &rewrites, injection.as_ref());

    let records = rewrites
        .iter()
        .flat_map(|rewrite| {
            rewrite.keys.iter().map(|keyed| RewriteRecord {
                key: keyed.key.clone(),
                text: keyed.text.clone(),
                kind: rewrite.kind,
                line: rewrite.line,
                col: rewrite.col,
            })
        })
        .collect();

    Ok(TransformOutput {
        code: emitted.code,
        map: emitted.map,
        report: FileReport {
            rewrites: records,
            skipped,
            dependency,
            injected: injection.is_some(),
        },
    })
}

#[cfg(test)]
mod tests;
