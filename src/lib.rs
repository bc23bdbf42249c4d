//! autoi18n - rewrite hardcoded text in JavaScript and TypeScript into localization calls
//!
//! Every string or template literal whose text matches a locale pattern (CJK by
//! default) is replaced by a call such as `i18n("key")`. Keys and source texts are
//! collected in a [`core::KeyRegistry`] and written out as locale files.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands and reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Rewrite engine (parse, scan, emit) and file scanning
//! - `locales`: Base and per-language locale file generation

pub mod cli;
pub mod config;
pub mod core;
pub mod locales;
