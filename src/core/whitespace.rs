//! Line-wise decomposition of literal text into padding and core.

/// One line of a literal, split around its first and last non-whitespace character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParts<'a> {
    pub leading: &'a str,
    pub core: &'a str,
    pub trailing: &'a str,
}

/// A run of a literal's text: either kept verbatim or extracted for translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Verbatim(String),
    Core(String),
}

/// Split one line into leading whitespace, core and trailing whitespace.
///
/// A whitespace-only line is entirely `leading` with an empty core.
pub fn split_padding(line: &str) -> LineParts<'_> {
    let start = line.len() - line.trim_start().len();
    let end = start + line[start..].trim_end().len();
    LineParts {
        leading: &line[..start],
        core: &line[start..end],
        trailing: &line[end..],
    }
}

/// Split text on `\n` and pad-split every line.
pub fn split_lines(text: &str) -> Vec<LineParts<'_>> {
    text.split('\n').map(split_padding).collect()
}

/// Decompose a literal into verbatim and translatable segments.
///
/// A line core becomes a [`Segment::Core`] when `is_translatable` accepts it.
/// Everything else, including the line breaks, is kept verbatim, and adjacent
/// verbatim runs are merged. Concatenating all segments yields `text` again.
pub fn segments(text: &str, is_translatable: impl Fn(&str) -> bool) -> Vec<Segment> {
    fn push_verbatim(out: &mut Vec<Segment>, s: &str) {
        if s.is_empty() {
            return;
        }
        if let Some(Segment::Verbatim(last)) = out.last_mut() {
            last.push_str(s);
        } else {
            out.push(Segment::Verbatim(s.to_string()));
        }
    }

    let mut out: Vec<Segment> = Vec::new();
    for (i, parts) in split_lines(text).into_iter().enumerate() {
        if i > 0 {
            push_verbatim(&mut out, "\n");
        }
        push_verbatim(&mut out, parts.leading);
        if !parts.core.is_empty() && is_translatable(parts.core) {
            out.push(Segment::Core(parts.core.to_string()));
        } else {
            push_verbatim(&mut out, parts.core);
        }
        push_verbatim(&mut out, parts.trailing);
    }

    out
}
