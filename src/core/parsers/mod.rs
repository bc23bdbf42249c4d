//! Source parsing on top of swc.

pub mod source;

pub use source::{ParsedSource, parse_source, syntax_for};
