//! Runs the engine over every scanned file.
//!
//! Files are transformed in parallel, each against its own copy of the seed
//! registry. The per-file registries are then merged in path order, so the result
//! does not depend on scheduling. A file whose keys conflict with an earlier file
//! is reported as a failure and its output is discarded.

use std::fs;

use anyhow::{Context, Result};
use colored::Colorize;
use rayon::prelude::*;

use super::{
    command_result::{FileChange, FileFailure},
    context::CommandContext,
};
use crate::core::{KeyRegistry, TransformOutput, transform};

/// Engine output for one file that merged cleanly.
pub struct FileOutput {
    /// Path as scanned (root-joined).
    pub file_path: String,
    pub change: FileChange,
    pub code: String,
    pub map_json: Option<String>,
}

pub struct PipelineResult {
    pub outputs: Vec<FileOutput>,
    pub registry: KeyRegistry,
    pub failures: Vec<FileFailure>,
}

fn process_file(
    ctx: &CommandContext,
    file_path: &str,
    id: &str,
    seed: &KeyRegistry,
) -> Result<(String, TransformOutput, KeyRegistry)> {
    let code = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read file: {}", file_path))?;
    let mut registry = seed.clone();
    let output = transform(id, &code, &ctx.transform_config, &mut registry)?;
    Ok((code, output, registry))
}

pub fn run_pipeline(ctx: &CommandContext, seed: &KeyRegistry) -> PipelineResult {
    let want_maps = ctx.config.source_maps;

    let results: Vec<_> = ctx
        .files
        .par_iter()
        .map(|file_path| {
            let id = ctx.relative(file_path);
            let result = process_file(ctx, file_path, &id, seed).and_then(
                |(source, output, registry)| {
                    let map_json = if want_maps && output.report.is_changed() {
                        Some(output.map_json()?)
                    } else {
                        None
                    };
                    Ok((source, output, registry, map_json))
                },
            );
            (file_path, id, result)
        })
        .collect();

    let mut registry = seed.clone();
    let mut outputs = Vec::new();
    let mut failures = Vec::new();

    for (file_path, id, result) in results {
        let (source, output, file_registry, map_json) = match result {
            Ok(ok) => ok,
            Err(e) => {
                if ctx.verbose {
                    eprintln!("{} {:#}", "warning:".bold().yellow(), e);
                }
                failures.push(FileFailure {
                    path: id,
                    message: format!("{:#}", e),
                });
                continue;
            }
        };

        if let Err(conflict) = registry.merge(&file_registry) {
            failures.push(FileFailure {
                path: id,
                message: conflict.to_string(),
            });
            continue;
        }

        outputs.push(FileOutput {
            file_path: file_path.clone(),
            change: FileChange {
                path: id,
                source,
                report: output.report,
            },
            code: output.code,
            map_json,
        });
    }

    PipelineResult {
        outputs,
        registry,
        failures,
    }
}
