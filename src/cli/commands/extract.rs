use anyhow::Result;

use super::{
    command_result::{CommandResult, CommandSummary, ExtractSummary},
    context::CommandContext,
    pipeline::run_pipeline,
    transform::locale_changes,
};
use crate::{cli::args::ExtractCommand, locales};

/// Collect keys from every source file and sync the locale files. Sources are never written.
pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let ctx = CommandContext::new(&cmd.common)?;
    let seed = locales::load_base(&ctx.root_dir, &ctx.config.output, ctx.verbose)?;
    let pipeline = run_pipeline(&ctx, &seed);

    let locale_files = locales::generate(
        &pipeline.registry,
        &ctx.config.output,
        &ctx.root_dir,
        cmd.apply,
    )?;

    Ok(CommandResult {
        summary: CommandSummary::Extract(ExtractSummary {
            key_count: pipeline.registry.len(),
            locales: locale_changes(&ctx, &locale_files),
            is_apply: cmd.apply,
        }),
        failures: pipeline.failures,
        source_files_checked: ctx.files.len(),
    })
}
