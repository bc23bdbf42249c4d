//! Source file discovery under the configured include roots.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::{DirEntry, WalkDir};

use crate::config::TEST_FILE_PATTERNS;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Patterns without `*` or `?` are literal paths, so `app/[locale]` stays literal.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

fn warn(verbose: bool, message: std::fmt::Arguments<'_>) {
    if verbose {
        eprintln!("{} {}", "warning:".bold().yellow(), message);
    }
}

/// Source files found under the include roots, sorted by path.
pub struct ScanResult {
    pub files: BTreeSet<String>,
    pub skipped_count: usize,
}

/// Ignore rules and the extension allow-list, resolved against the base directory.
struct PathFilter<'a> {
    /// Literal ignores match as path prefixes.
    prefixes: Vec<PathBuf>,
    globs: Vec<Pattern>,
    extensions: &'a [String],
}

impl<'a> PathFilter<'a> {
    fn new(
        base_dir: &Path,
        ignore_patterns: &[String],
        extensions: &'a [String],
        ignore_test_files: bool,
        verbose: bool,
    ) -> Self {
        let (glob_ignores, literal_ignores): (Vec<&String>, Vec<&String>) =
            ignore_patterns.iter().partition(|p| is_glob_pattern(p));

        let mut globs: Vec<Pattern> = glob_ignores
            .into_iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn(verbose, format_args!("Invalid ignore pattern '{}': {}", p, e));
                    None
                }
            })
            .collect();
        if ignore_test_files {
            globs.extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
        }

        Self {
            prefixes: literal_ignores.into_iter().map(|p| base_dir.join(p)).collect(),
            globs,
            extensions,
        }
    }

    fn is_ignored(&self, path: &Path) -> bool {
        if self.prefixes.iter().any(|prefix| path.starts_with(prefix)) {
            return true;
        }
        let path_str = path.to_string_lossy();
        self.globs.iter().any(|pattern| pattern.matches(&path_str))
    }

    /// Whether the walk should descend into (or yield) `entry`.
    fn admits(&self, entry: &DirEntry) -> bool {
        let skipped_dir = entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| SKIPPED_DIRS.contains(&name));
        !skipped_dir && !self.is_ignored(entry.path())
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }
}

/// Directories (or, for glob includes, files) to walk. No includes means the base dir.
fn include_roots(base_dir: &Path, includes: &[String], verbose: bool) -> Vec<PathBuf> {
    if includes.is_empty() {
        return vec![base_dir.to_path_buf()];
    }

    let mut roots = Vec::new();
    for include in includes {
        let full = base_dir.join(include);
        if is_glob_pattern(include) {
            match glob(&full.to_string_lossy()) {
                Ok(entries) => roots.extend(entries.flatten()),
                Err(e) => warn(
                    verbose,
                    format_args!("Invalid glob pattern '{}': {}", include, e),
                ),
            }
        } else if full.exists() {
            roots.push(full);
        } else {
            warn(
                verbose,
                format_args!("Include path does not exist: {}", full.display()),
            );
        }
    }
    roots
}

pub fn scan_files(
    base_dir: &str,
    includes: &[String],
    ignore_patterns: &[String],
    extensions: &[String],
    ignore_test_files: bool,
    verbose: bool,
) -> ScanResult {
    let base = Path::new(base_dir);
    let filter = PathFilter::new(base, ignore_patterns, extensions, ignore_test_files, verbose);

    let mut files = BTreeSet::new();
    let mut skipped_count = 0;

    for root in include_roots(base, includes, verbose) {
        for entry in WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| filter.admits(entry))
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && filter.has_extension(path) {
                        files.insert(path.to_string_lossy().into_owned());
                    }
                }
                Err(e) => {
                    skipped_count += 1;
                    warn(verbose, format_args!("Cannot access path: {}", e));
                }
            }
        }
    }

    ScanResult {
        files,
        skipped_count,
    }
}
