use crate::core::FileReport;

/// A source file the engine produced a result for.
#[derive(Debug)]
pub struct FileChange {
    /// Path relative to the source root.
    pub path: String,
    /// Original text, used to print source context.
    pub source: String,
    pub report: FileReport,
}

/// A file that could not be transformed.
#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    pub message: String,
}

/// A locale file that was (or would be) written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChange {
    pub path: String,
    pub key_count: usize,
    pub added: usize,
    pub removed: usize,
}

#[derive(Debug)]
pub struct TransformSummary {
    pub files: Vec<FileChange>,
    pub locales: Vec<LocaleChange>,
    pub is_apply: bool,
    /// Where transformed files went, if not in place.
    pub out_dir: Option<String>,
}

impl TransformSummary {
    pub fn rewrite_count(&self) -> usize {
        self.files.iter().map(|f| f.report.rewrites.len()).sum()
    }

    pub fn changed_file_count(&self) -> usize {
        self.files.iter().filter(|f| f.report.is_changed()).count()
    }
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub key_count: usize,
    pub locales: Vec<LocaleChange>,
    pub is_apply: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

#[derive(Debug)]
pub enum CommandSummary {
    Transform(TransformSummary),
    Extract(ExtractSummary),
    Init(InitSummary),
}

/// Result of running an autoi18n command.
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Files that failed to read, parse or merge.
    pub failures: Vec<FileFailure>,
    /// Number of source files that were scanned.
    pub source_files_checked: usize,
}
