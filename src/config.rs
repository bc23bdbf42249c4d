use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{
    DependencyConfig, KeyStyle, TransformConfig,
    transform::{DEFAULT_CALLEE, DEFAULT_IGNORE_CALLEE, DEFAULT_LOCALE_PATTERN},
};

pub const CONFIG_FILE_NAME: &str = ".autoi18nrc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.*",
    "**/*.spec.*",
    "**/__tests__/**",
    "**/__mocks__/**",
];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
    #[serde(default = "default_callee_name")]
    pub callee_name: String,
    /// Regex a literal has to match to be rewritten.
    #[serde(default = "default_locale_pattern")]
    pub locale_pattern: String,
    #[serde(default = "default_ignore_callee")]
    pub ignore_callee: String,
    #[serde(default)]
    pub key_strategy: KeyStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<DependencyConfig>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub source_maps: bool,
    /// Write transformed files here instead of in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
}

/// Where locale files are generated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    /// Base locale file holding the source texts.
    #[serde(default = "default_output_filename")]
    pub filename: String,
    /// Translation files kept in sync with the base file.
    #[serde(default)]
    pub lang_list: Vec<String>,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_ignores() -> Vec<String> {
    vec!["**/dist/**".to_string()]
}

pub fn default_extensions() -> Vec<String> {
    ["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"]
        .map(String::from)
        .to_vec()
}

fn default_ignore_test_files() -> bool {
    true
}

fn default_callee_name() -> String {
    DEFAULT_CALLEE.to_string()
}

fn default_locale_pattern() -> String {
    DEFAULT_LOCALE_PATTERN.to_string()
}

fn default_ignore_callee() -> String {
    DEFAULT_IGNORE_CALLEE.to_string()
}

fn default_output_path() -> String {
    "./locales".to_string()
}

fn default_output_filename() -> String {
    "zh-CN.json".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            filename: default_output_filename(),
            lang_list: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: default_ignores(),
            extensions: default_extensions(),
            ignore_test_files: default_ignore_test_files(),
            callee_name: default_callee_name(),
            locale_pattern: default_locale_pattern(),
            ignore_callee: default_ignore_callee(),
            key_strategy: KeyStyle::default(),
            dependency: None,
            output: OutputConfig::default(),
            source_maps: false,
            out_dir: None,
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c == '$' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}

impl Config {
    /// Validate configuration values.
    ///
    /// Glob patterns, the locale regex, the callee names and the dependency
    /// statement are checked so that a bad config fails before any file is read.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern)
                    .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
            }
        }
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.extensions.is_empty() {
            bail!("'extensions' must not be empty");
        }

        Regex::new(&self.locale_pattern).with_context(|| {
            format!("Invalid regex in 'localePattern': \"{}\"", self.locale_pattern)
        })?;

        if !is_identifier(&self.callee_name) {
            bail!("Invalid 'calleeName': \"{}\"", self.callee_name);
        }
        if !is_identifier(&self.ignore_callee) {
            bail!("Invalid 'ignoreCallee': \"{}\"", self.ignore_callee);
        }

        if let Some(dependency) = &self.dependency {
            dependency.injected_source()?;
        }

        if self.output.filename.is_empty() || self.output.path.is_empty() {
            bail!("'output.path' and 'output.filename' are required");
        }

        Ok(())
    }

    /// Engine settings derived from this config.
    pub fn to_transform_config(&self) -> Result<TransformConfig> {
        let detection_pattern = Regex::new(&self.locale_pattern).with_context(|| {
            format!("Invalid regex in 'localePattern': \"{}\"", self.locale_pattern)
        })?;
        Ok(TransformConfig {
            callee_name: self.callee_name.clone(),
            detection_pattern,
            ignore_callee: self.ignore_callee.clone(),
            key_strategy: self.key_strategy.strategy(),
            dependency: self.dependency.clone(),
        })
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
