//! Report formatting and printing.
//!
//! Rewrites and skipped literals are shown in cargo style with the source line and a
//! caret under the literal. Kept apart from the commands so the engine stays usable
//! as a library.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, ExtractSummary, FileChange, FileFailure, InitSummary,
    LocaleChange, TransformSummary,
};
use crate::{config::CONFIG_FILE_NAME, core::scanner::SkipReason};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());
    print_failures_to(&result.failures, verbose, &mut io::stderr().lock());
}

pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    match &result.summary {
        CommandSummary::Transform(summary) => {
            print_transform(summary, result.source_files_checked, verbose, writer)
        }
        CommandSummary::Extract(summary) => {
            print_extract(summary, result.source_files_checked, writer)
        }
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

/// Files that could not be processed. Details only in verbose mode.
pub fn print_failures_to<W: Write>(failures: &[FileFailure], verbose: bool, writer: &mut W) {
    if failures.is_empty() {
        return;
    }
    if verbose {
        for failure in failures {
            let _ = writeln!(
                writer,
                "{} {}: {}",
                FAILURE_MARK.red(),
                failure.path,
                failure.message
            );
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be transformed (use {} for details)",
            "warning:".bold().yellow(),
            failures.len(),
            "-v".cyan()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_transform<W: Write>(
    summary: &TransformSummary,
    source_files: usize,
    verbose: bool,
    writer: &mut W,
) {
    let show_rewrites = !summary.is_apply || verbose;
    let max_line_width = max_line_width(&summary.files);

    for file in &summary.files {
        if show_rewrites {
            for record in &file.report.rewrites {
                print_location(
                    writer,
                    &format!(
                        "{}: {:?}  {}",
                        "rewrite".bold().green(),
                        record.text,
                        record.key.dimmed().cyan()
                    ),
                    file,
                    record.line,
                    record.col,
                    "^".green(),
                    max_line_width,
                );
            }
        }
        for skipped in &file.report.skipped {
            let conflict = matches!(skipped.reason, SkipReason::KeyConflict { .. });
            if !conflict && !verbose {
                continue;
            }
            print_location(
                writer,
                &format!(
                    "{}: {:?}  {}",
                    "skipped".bold().yellow(),
                    skipped.text,
                    skipped.reason.describe().dimmed()
                ),
                file,
                skipped.line,
                skipped.col,
                "^".yellow(),
                max_line_width,
            );
        }
    }

    let rewrites = summary.rewrite_count();
    let changed = summary.changed_file_count();
    if changed == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} source {} - nothing to rewrite",
                source_files,
                plural(source_files, "file", "files")
            )
            .green()
        );
    } else if summary.is_apply {
        let _ = writeln!(
            writer,
            "{} {} literal(s) in {} file(s){}.",
            "Rewrote".green().bold(),
            rewrites,
            changed,
            summary
                .out_dir
                .as_ref()
                .map(|dir| format!(" into {}", dir))
                .unwrap_or_default()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} literal(s) in {} file(s).",
            "Would rewrite".yellow().bold(),
            rewrites,
            changed
        );
    }

    print_locales(&summary.locales, summary.is_apply, writer);

    if changed > 0 && !summary.is_apply {
        let _ = writeln!(writer, "Run with {} to write these changes.", "--apply".cyan());
    }
}

fn print_extract<W: Write>(summary: &ExtractSummary, source_files: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Collected {} key(s) from {} source {}",
            summary.key_count,
            source_files,
            plural(source_files, "file", "files")
        )
        .green()
    );
    print_locales(&summary.locales, summary.is_apply, writer);

    if !summary.is_apply && summary.locales.iter().any(is_locale_changed) {
        let _ = writeln!(
            writer,
            "Run with {} to write the locale files.",
            "--apply".cyan()
        );
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

fn is_locale_changed(change: &LocaleChange) -> bool {
    change.added > 0 || change.removed > 0
}

fn print_locales<W: Write>(locales: &[LocaleChange], is_apply: bool, writer: &mut W) {
    let changed: Vec<&LocaleChange> = locales.iter().filter(|c| is_locale_changed(c)).collect();
    if changed.is_empty() {
        return;
    }

    let _ = writeln!(
        writer,
        "{} {} locale file(s):",
        if is_apply {
            "Updated".green().bold()
        } else {
            "Would update".yellow().bold()
        },
        changed.len()
    );
    for change in changed {
        let _ = writeln!(
            writer,
            "  - {}: {} key(s) ({}, {})",
            change.path,
            change.key_count,
            format!("+{}", change.added).green(),
            format!("-{}", change.removed).red()
        );
    }
}

fn print_location<W: Write>(
    writer: &mut W,
    headline: &str,
    file: &FileChange,
    line: usize,
    col: usize,
    caret: ColoredString,
    max_line_width: usize,
) {
    let _ = writeln!(writer, "{}", headline);
    let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file.path, line, col);

    if let Some(source_line) = file.source.lines().nth(line.saturating_sub(1)) {
        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // col is 1-based
        let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret,
            width = max_line_width,
            padding = caret_padding
        );
    }
    let _ = writeln!(writer);
}

fn max_line_width(files: &[FileChange]) -> usize {
    files
        .iter()
        .flat_map(|f| {
            f.report
                .rewrites
                .iter()
                .map(|r| r.line)
                .chain(f.report.skipped.iter().map(|s| s.line))
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

// ============================================================
// Tests
// ============================================================
