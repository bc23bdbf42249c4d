//! Locale files: the base file (key -> source text) and one file per target language.
//!
//! Language files are merged, never overwritten wholesale: translations of keys that
//! still exist are kept, new keys are seeded with the source text and keys that left
//! the base file are dropped.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{Map, Value};

use crate::{config::OutputConfig, core::KeyRegistry};

/// Contents of one locale file, computed but not yet written.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleFile {
    pub path: PathBuf,
    pub entries: Map<String, Value>,
    /// Keys not present in the file on disk.
    pub added: usize,
    /// Keys on disk that are no longer present.
    pub removed: usize,
}

impl LocaleFile {
    pub fn is_changed(&self) -> bool {
        self.added > 0 || self.removed > 0
    }

    /// Write as pretty JSON with a trailing newline.
    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let mut content = serde_json::to_string_pretty(&Value::Object(self.entries.clone()))
            .context("Failed to serialize locale file")?;
        content.push('\n');
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write file: {}", self.path.display()))
    }
}

fn read_object(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?
    {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Locale file is not a JSON object: {}", path.display()),
    }
}

/// Directory that holds the locale files.
pub fn output_dir(root: &Path, output: &OutputConfig) -> PathBuf {
    root.join(&output.path)
}

pub fn base_file_path(root: &Path, output: &OutputConfig) -> PathBuf {
    output_dir(root, output).join(&output.filename)
}

/// `en-US` and `en-US.json` both name `en-US.json`.
fn lang_file_path(root: &Path, output: &OutputConfig, lang: &str) -> PathBuf {
    let file = if Path::new(lang).extension().is_some() {
        lang.to_string()
    } else {
        format!("{}.json", lang)
    };
    output_dir(root, output).join(file)
}

/// Load an existing base file so keys from earlier runs are kept and checked for conflicts.
pub fn load_base(root: &Path, output: &OutputConfig, verbose: bool) -> Result<KeyRegistry> {
    let path = base_file_path(root, output);
    let mut registry = KeyRegistry::new();
    for (key, value) in read_object(&path)? {
        match value {
            Value::String(text) => {
                if let Err(conflict) = registry.register(&key, &text)
                    && verbose
                {
                    eprintln!(
                        "{} Ignoring entry in {}: {}",
                        "warning:".bold().yellow(),
                        path.display(),
                        conflict
                    );
                }
            }
            _ => {
                if verbose {
                    eprintln!(
                        "{} Ignoring non-string entry '{}' in {}",
                        "warning:".bold().yellow(),
                        key,
                        path.display()
                    );
                }
            }
        }
    }
    Ok(registry)
}

/// Compute the base file and every language file for `registry`.
pub fn plan_locales(
    registry: &KeyRegistry,
    output: &OutputConfig,
    root: &Path,
) -> Result<Vec<LocaleFile>> {
    let base: Map<String, Value> = registry
        .entries()
        .iter()
        .map(|(key, text)| (key.clone(), Value::String(text.clone())))
        .collect();

    let mut files = Vec::with_capacity(1 + output.lang_list.len());
    let base_path = base_file_path(root, output);
    let on_disk = read_object(&base_path)?;
    files.push(merge(&base_path, &base, &on_disk, |_, source| source.clone()));

    for lang in &output.lang_list {
        let path = lang_file_path(root, output, lang);
        let on_disk = read_object(&path)?;
        files.push(merge(&path, &base, &on_disk, |key, source| {
            match on_disk.get(key) {
                // An empty translation counts as missing.
                Some(Value::String(s)) if s.is_empty() => source.clone(),
                Some(value) => value.clone(),
                None => source.clone(),
            }
        }));
    }

    Ok(files)
}

fn merge(
    path: &Path,
    base: &Map<String, Value>,
    on_disk: &Map<String, Value>,
    value_for: impl Fn(&str, &Value) -> Value,
) -> LocaleFile {
    let entries: Map<String, Value> = base
        .iter()
        .map(|(key, source)| (key.clone(), value_for(key, source)))
        .collect();
    let added = entries.keys().filter(|k| !on_disk.contains_key(*k)).count();
    let removed = on_disk.keys().filter(|k| !entries.contains_key(*k)).count();

    LocaleFile {
        path: path.to_path_buf(),
        entries,
        added,
        removed,
    }
}

/// Plan all locale files and write them when `apply` is set.
pub fn generate(
    registry: &KeyRegistry,
    output: &OutputConfig,
    root: &Path,
    apply: bool,
) -> Result<Vec<LocaleFile>> {
    let files = plan_locales(registry, output, root)?;
    if apply {
        for file in &files {
            file.write()?;
        }
    }
    Ok(files)
}
