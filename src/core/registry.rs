//! Key registry and key strategies.
//!
//! The registry is an explicit store owned by the caller. Every successful rewrite
//! registers `key -> text`; the locale generator reads it afterwards.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use super::occurrence::Occurrence;

/// A key is already bound to a different text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConflict {
    pub key: String,
    pub existing: String,
    pub incoming: String,
}

impl fmt::Display for KeyConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key \"{}\" is already bound to \"{}\", refusing \"{}\"",
            self.key, self.existing, self.incoming
        )
    }
}

impl std::error::Error for KeyConflict {}

/// Ordered mapping from generated key to canonical source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyRegistry {
    entries: BTreeMap<String, String>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `text`.
    ///
    /// Re-registering the same pair is a no-op. Binding an existing key to a
    /// different text is rejected and leaves the registry unchanged.
    pub fn register(&mut self, key: &str, text: &str) -> Result<(), KeyConflict> {
        self.check(key, text)?;
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| text.to_string());
        Ok(())
    }

    /// Register several pairs at once. Either all of them are committed or none.
    pub fn register_all<'a, I>(&mut self, pairs: I) -> Result<(), KeyConflict>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut pending: BTreeMap<&str, &str> = BTreeMap::new();
        for (key, text) in pairs {
            self.check(key, text)?;
            if let Some(previous) = pending.insert(key, text)
                && previous != text
            {
                return Err(KeyConflict {
                    key: key.to_string(),
                    existing: previous.to_string(),
                    incoming: text.to_string(),
                });
            }
        }
        for (key, text) in pending {
            self.entries
                .entry(key.to_string())
                .or_insert_with(|| text.to_string());
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// All entries ordered by key.
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explicit reset. Nothing in the engine calls this implicitly.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merge another registry into this one, atomically.
    pub fn merge(&mut self, other: &KeyRegistry) -> Result<(), KeyConflict> {
        self.register_all(
            other
                .entries
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    fn check(&self, key: &str, text: &str) -> Result<(), KeyConflict> {
        match self.entries.get(key) {
            Some(existing) if existing != text => Err(KeyConflict {
                key: key.to_string(),
                existing: existing.clone(),
                incoming: text.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Produces the key for a piece of text.
///
/// Implementations must be deterministic in `text` for deduplication to work.
/// The occurrence and the current registry are available for strategies that
/// want to namespace or disambiguate.
pub trait KeyStrategy: Send + Sync {
    fn key_for(&self, text: &str, occurrence: &Occurrence<'_>, registry: &KeyRegistry) -> String;
}

impl<F> KeyStrategy for F
where
    F: Fn(&str, &Occurrence<'_>, &KeyRegistry) -> String + Send + Sync,
{
    fn key_for(&self, text: &str, occurrence: &Occurrence<'_>, registry: &KeyRegistry) -> String {
        self(text, occurrence, registry)
    }
}

/// Lowercase hex MD5 of the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Keys;

impl KeyStrategy for Md5Keys {
    fn key_for(&self, text: &str, _: &Occurrence<'_>, _: &KeyRegistry) -> String {
        format!("{:x}", md5::compute(text.as_bytes()))
    }
}

/// The text is its own key.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextKeys;

impl KeyStrategy for TextKeys {
    fn key_for(&self, text: &str, _: &Occurrence<'_>, _: &KeyRegistry) -> String {
        text.to_string()
    }
}

/// Built-in strategies selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStyle {
    #[default]
    Md5,
    Text,
}

impl KeyStyle {
    pub fn strategy(self) -> std::sync::Arc<dyn KeyStrategy> {
        match self {
            KeyStyle::Md5 => std::sync::Arc::new(Md5Keys),
            KeyStyle::Text => std::sync::Arc::new(TextKeys),
        }
    }
}
