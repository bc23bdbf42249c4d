//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `transform`: Rewrite matching literals into localization calls
//! - `extract`: Only collect keys and update the locale files
//! - `init`: Create a default `.autoi18nrc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Transform(cmd)) => cmd.common.verbose,
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Source code root directory (defaults to the current directory)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn root(&self) -> PathBuf {
        self.source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Args)]
pub struct TransformCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually write files (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Write transformed files under this directory (overrides config file)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually write locale files (default is dry-run)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace hardcoded text with localization calls
    Transform(TransformCommand),
    /// Collect localizable text into locale files without touching sources
    Extract(ExtractCommand),
    /// Initialize a new .autoi18nrc.json configuration file
    Init,
}
