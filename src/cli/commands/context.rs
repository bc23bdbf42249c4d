use std::path::{Component, Path, PathBuf};

use anyhow::{Context as _, Result, anyhow};
use colored::Colorize;

use super::super::args::CommonArgs;
use crate::{
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{TransformConfig, file_scanner::scan_files},
};

/// Configuration and scanned files shared by `transform` and `extract`.
pub struct CommandContext {
    pub config: Config,
    pub transform_config: TransformConfig,
    pub root_dir: PathBuf,
    /// Absolute or root-joined paths, sorted.
    pub files: Vec<String>,
    pub verbose: bool,
}

impl CommandContext {
    pub fn new(args: &CommonArgs) -> Result<Self> {
        let root_dir = args.root();
        let root = root_dir
            .to_str()
            .with_context(|| anyhow!("Invalid path: {:?}", root_dir))?;

        let config_result = load_config(&root_dir)?;
        if args.verbose && !config_result.from_file {
            eprintln!(
                "{} No {} found, using default configuration",
                "note:".bold(),
                CONFIG_FILE_NAME
            );
        }
        let config = config_result.config;
        let transform_config = config.to_transform_config()?;

        let scan_result = scan_files(
            root,
            &config.includes,
            &config.ignores,
            &config.extensions,
            config.ignore_test_files,
            args.verbose,
        );
        if scan_result.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                scan_result.skipped_count,
                if args.verbose {
                    ""
                } else {
                    " (use -v for details)"
                }
            );
        }

        Ok(Self {
            config,
            transform_config,
            root_dir,
            files: scan_result.files.into_iter().collect(),
            verbose: args.verbose,
        })
    }

    /// `path` relative to the source root, with `/` separators.
    pub fn relative(&self, path: &str) -> String {
        let path = Path::new(path);
        path.strip_prefix(&self.root_dir)
            .unwrap_or(path)
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Path of a file as shown to the user: relative to the working directory.
    pub fn display(&self, path: &Path) -> String {
        path.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect::<PathBuf>()
            .to_string_lossy()
            .into_owned()
    }
}
