//! Replacement expressions and the string-literal rewriter.

use swc_common::Span;

use super::whitespace::{Segment, segments};

/// One `varK: <expr>` entry of a template's variable object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVar {
    pub name: String,
    /// Span of the original hole expression. Its source text is moved verbatim.
    pub expr: Span,
    /// The hole is a comma sequence and needs parentheses as a property value.
    pub grouped: bool,
}

/// `callee("key")` or `callee("key", { var1: ..., })`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizeCall {
    pub callee: String,
    pub key: String,
    pub vars: Vec<TemplateVar>,
}

/// The expression written into a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    Text(String),
    Call(LocalizeCall),
    Concat(Box<Replacement>, Box<Replacement>),
}

impl Replacement {
    pub fn call(callee: &str, key: String) -> Self {
        Replacement::Call(LocalizeCall {
            callee: callee.to_string(),
            key,
            vars: Vec::new(),
        })
    }

    pub fn is_concat(&self) -> bool {
        matches!(self, Replacement::Concat(..))
    }

    /// Fold pieces left to right with `+`.
    pub fn concat_all(pieces: Vec<Replacement>) -> Option<Self> {
        pieces
            .into_iter()
            .reduce(|acc, next| Replacement::Concat(Box::new(acc), Box::new(next)))
    }
}

/// A key produced for one core segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedText {
    pub key: String,
    pub text: String,
}

/// Result of rewriting one string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringRewrite {
    pub replacement: Replacement,
    pub keys: Vec<KeyedText>,
}

/// Build the replacement for a string literal's value.
///
/// Returns `None` when no line has a translatable core, which leaves the literal
/// untouched.
pub fn rewrite_string(
    value: &str,
    callee: &str,
    is_translatable: impl Fn(&str) -> bool,
    mut key_for: impl FnMut(&str) -> String,
) -> Option<StringRewrite> {
    let segs = segments(value, is_translatable);
    if !segs.iter().any(|s| matches!(s, Segment::Core(_))) {
        return None;
    }

    let mut keys = Vec::new();
    let pieces = segs
        .into_iter()
        .map(|seg| match seg {
            Segment::Verbatim(text) => Replacement::Text(text),
            Segment::Core(text) => {
                let key = key_for(&text);
                keys.push(KeyedText {
                    key: key.clone(),
                    text,
                });
                Replacement::call(callee, key)
            }
        })
        .collect();

    Replacement::concat_all(pieces).map(|replacement| StringRewrite { replacement, keys })
}
