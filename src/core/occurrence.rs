use serde::Serialize;
use swc_common::Span;

/// Which kind of literal produced an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LiteralKind {
    String,
    Template,
}

/// A single literal met during traversal. Only lives for one file pass.
#[derive(Debug, Clone, Copy)]
pub struct Occurrence<'a> {
    /// Identifier of the file being transformed.
    pub id: &'a str,
    pub kind: LiteralKind,
    /// Cooked value of the literal. For templates this is the placeholder pattern.
    pub value: &'a str,
    pub span: Span,
    /// 1-based.
    pub line: usize,
    /// 1-based, in display columns.
    pub col: usize,
}
