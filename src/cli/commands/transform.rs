use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::{
    command_result::{CommandResult, CommandSummary, LocaleChange, TransformSummary},
    context::CommandContext,
    pipeline::{FileOutput, run_pipeline},
};
use crate::{
    cli::args::TransformCommand,
    locales::{self, LocaleFile},
};

pub fn transform(cmd: TransformCommand) -> Result<CommandResult> {
    let ctx = CommandContext::new(&cmd.common)?;
    let seed = locales::load_base(&ctx.root_dir, &ctx.config.output, ctx.verbose)?;
    let pipeline = run_pipeline(&ctx, &seed);

    let out_dir: Option<PathBuf> = cmd
        .out_dir
        .or_else(|| ctx.config.out_dir.as_ref().map(PathBuf::from))
        .map(|dir| ctx.root_dir.join(dir));

    if cmd.apply {
        for output in &pipeline.outputs {
            write_output(output, out_dir.as_deref())?;
        }
    }
    let locale_files = locales::generate(
        &pipeline.registry,
        &ctx.config.output,
        &ctx.root_dir,
        cmd.apply,
    )?;

    let summary = TransformSummary {
        locales: locale_changes(&ctx, &locale_files),
        files: pipeline.outputs.into_iter().map(|o| o.change).collect(),
        is_apply: cmd.apply,
        out_dir: out_dir.as_deref().map(|dir| ctx.display(dir)),
    };

    Ok(CommandResult {
        summary: CommandSummary::Transform(summary),
        failures: pipeline.failures,
        source_files_checked: ctx.files.len(),
    })
}

pub(super) fn locale_changes(ctx: &CommandContext, files: &[LocaleFile]) -> Vec<LocaleChange> {
    files
        .iter()
        .map(|file| LocaleChange {
            path: ctx.display(&file.path),
            key_count: file.entries.len(),
            added: file.added,
            removed: file.removed,
        })
        .collect()
}

/// Destination of a transformed file: in place, or mirrored under `out_dir`.
fn destination(output: &FileOutput, out_dir: Option<&Path>) -> PathBuf {
    match out_dir {
        Some(dir) => dir.join(&output.change.path),
        None => PathBuf::from(&output.file_path),
    }
}

fn write_output(output: &FileOutput, out_dir: Option<&Path>) -> Result<()> {
    // In place, untouched files stay untouched. An output directory gets every file.
    if out_dir.is_none() && !output.change.report.is_changed() {
        return Ok(());
    }

    let dest = destination(output, out_dir);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&dest, &output.code)
        .with_context(|| format!("Failed to write file: {}", dest.display()))?;

    if let Some(map) = &output.map_json {
        let mut map_path = dest.into_os_string();
        map_path.push(".map");
        let map_path = PathBuf::from(map_path);
        fs::write(&map_path, map)
            .with_context(|| format!("Failed to write file: {}", map_path.display()))?;
    }
    Ok(())
}
