//! Write phase: splice planned rewrites into the original text and build a source map.
//!
//! Untouched source is copied byte for byte. Every copied chunk, every copied line
//! start and every replacement start gets a mapping back to the original position.

use swc_common::BytePos;

use super::{
    dependency::Injection,
    rewrite::{LocalizeCall, Replacement},
    scanner::PlannedRewrite,
};

/// Rewritten code with its source map.
pub struct Emitted {
    pub code: String,
    pub map: sourcemap::SourceMap,
}

#[derive(Debug, Clone, Copy)]
enum EditKind<'a> {
    Replace {
        replacement: &'a Replacement,
        grouped: bool,
    },
    Insert(&'a str),
}

#[derive(Debug, Clone, Copy)]
struct Edit<'a> {
    lo: usize,
    hi: usize,
    kind: EditKind<'a>,
}

impl Edit<'_> {
    fn is_insert(&self) -> bool {
        matches!(self.kind, EditKind::Insert(_))
    }

    fn contains(&self, other: &Edit<'_>) -> bool {
        !self.is_insert() && !other.is_insert() && self.lo <= other.lo && other.hi <= self.hi
    }
}

/// Apply rewrites and the optional injection to `source`.
pub fn emit(
    id: &str,
    source: &str,
    start_pos: BytePos,
    rewrites: &[PlannedRewrite],
    injection: Option<&Injection>,
) -> Emitted {
    let mut emitter = Emitter::new(source, start_pos);

    let mut edits: Vec<Edit<'_>> = rewrites
        .iter()
        .map(|rewrite| Edit {
            lo: emitter.offset(rewrite.slot.target.lo),
            hi: emitter.offset(rewrite.slot.target.hi),
            kind: EditKind::Replace {
                replacement: &rewrite.replacement,
                grouped: rewrite.slot.field.needs_grouping(),
            },
        })
        .collect();
    if let Some(injection) = injection {
        let at = injection.offset.min(source.len());
        edits.push(Edit {
            lo: at,
            hi: at,
            kind: EditKind::Insert(&injection.text),
        });
    }
    // Outer edits before the edits nested in them; insertions before a
    // replacement starting at the same offset.
    edits.sort_by_key(|e| (e.lo, !e.is_insert(), std::cmp::Reverse(e.hi)));

    emitter.write_range(0, source.len(), &edits);

    let map = emitter.source_map(id);
    Emitted {
        code: emitter.out,
        map,
    }
}

struct Emitter<'a> {
    source: &'a str,
    start_pos: BytePos,
    out: String,
    /// (output offset, source offset)
    marks: Vec<(usize, usize)>,
}

impl<'a> Emitter<'a> {
    fn new(source: &'a str, start_pos: BytePos) -> Self {
        Self {
            source,
            start_pos,
            out: String::with_capacity(source.len()),
            marks: Vec::new(),
        }
    }

    fn offset(&self, pos: BytePos) -> usize {
        (pos.0.saturating_sub(self.start_pos.0) as usize).min(self.source.len())
    }

    fn mark(&mut self, src: usize) {
        let out = self.out.len();
        match self.marks.last_mut() {
            Some(last) if last.0 == out => last.1 = src,
            _ => self.marks.push((out, src)),
        }
    }

    fn copy(&mut self, lo: usize, hi: usize) {
        let mut start = lo;
        while start < hi {
            self.mark(start);
            let end = self.source[start..hi]
                .find('\n')
                .map_or(hi, |i| start + i + 1);
            self.out.push_str(&self.source[start..end]);
            start = end;
        }
    }

    /// Copy `[lo, hi)` applying `edits`, which are sorted and lie inside the range.
    fn write_range(&mut self, lo: usize, hi: usize, edits: &[Edit<'_>]) {
        let mut cursor = lo;
        let mut index = 0;
        while index < edits.len() {
            let edit = edits[index];
            let nested = edits[index + 1..]
                .iter()
                .take_while(|inner| edit.contains(inner))
                .count();
            let children = &edits[index + 1..index + 1 + nested];
            index += 1 + nested;

            if edit.lo < cursor {
                // Overlaps an edit already written.
                continue;
            }
            self.copy(cursor, edit.lo);
            match edit.kind {
                EditKind::Insert(text) => self.out.push_str(text),
                EditKind::Replace {
                    replacement,
                    grouped,
                } => {
                    self.mark(edit.lo);
                    let group = grouped && replacement.is_concat();
                    if group {
                        self.out.push('(');
                    }
                    self.write_replacement(replacement, children);
                    if group {
                        self.out.push(')');
                    }
                }
            }
            cursor = edit.hi;
        }
        self.copy(cursor, hi);
    }

    fn write_replacement(&mut self, replacement: &Replacement, children: &[Edit<'_>]) {
        match replacement {
            Replacement::Text(text) => self.write_string(text),
            Replacement::Concat(left, right) => {
                self.write_replacement(left, children);
                self.out.push_str(" + ");
                self.write_replacement(right, children);
            }
            Replacement::Call(call) => self.write_call(call, children),
        }
    }

    fn write_call(&mut self, call: &LocalizeCall, children: &[Edit<'_>]) {
        self.out.push_str(&call.callee);
        self.out.push('(');
        self.write_string(&call.key);
        if !call.vars.is_empty() {
            self.out.push_str(", { ");
            for (i, var) in call.vars.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.out.push_str(&var.name);
                self.out.push_str(": ");

                if var.grouped {
                    self.out.push('(');
                }
                let (start, end) = (self.offset(var.expr.lo), self.offset(var.expr.hi));
                let inner: Vec<Edit<'_>> = children
                    .iter()
                    .filter(|e| start <= e.lo && e.hi <= end)
                    .copied()
                    .collect();
                self.write_range(start, end, &inner);
                if var.grouped {
                    self.out.push(')');
                }
            }
            self.out.push_str(" }");
        }
        self.out.push(')');
    }

    fn write_string(&mut self, text: &str) {
        match serde_json::to_string(text) {
            Ok(quoted) => self.out.push_str(&quoted),
            Err(_) => {
                self.out.push('"');
                self.out.push_str(text);
                self.out.push('"');
            }
        }
    }

    fn source_map(&self, id: &str) -> sourcemap::SourceMap {
        let out_lines = LineIndex::new(&self.out);
        let src_lines = LineIndex::new(self.source);

        let mut builder = sourcemap::SourceMapBuilder::new(Some(id));
        let src_id = builder.add_source(id);
        builder.set_source_contents(src_id, Some(self.source));
        for &(out, src) in &self.marks {
            let (dst_line, dst_col) = out_lines.position(out);
            let (src_line, src_col) = src_lines.position(src);
            builder.add_raw(dst_line, dst_col, src_line, src_col, Some(src_id), None, false);
        }
        builder.into_sourcemap()
    }
}

/// Byte offset to 0-based line and UTF-16 column, as source maps count them.
struct LineIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, starts }
    }

    fn position(&self, offset: usize) -> (u32, u32) {
        let line = self.starts.partition_point(|&start| start <= offset) - 1;
        let start = self.starts[line];
        let col = self
            .text
            .get(start..offset)
            .map_or(0, |prefix| prefix.encode_utf16().count());
        (line as u32, col as u32)
    }
}
