//! Template literals become a single keyed call with a variable object.

use swc_common::Spanned;
use swc_ecma_ast::{Expr, Tpl};

use super::rewrite::TemplateVar;

/// Name of the K-th (0-based) hole variable.
pub fn var_name(index: usize) -> String {
    format!("var{}", index + 1)
}

/// Cooked text of every chunk, or `None` if any chunk has an invalid escape.
pub fn cooked_chunks(tpl: &Tpl) -> Option<Vec<&str>> {
    tpl.quasis
        .iter()
        .map(|quasi| quasi.cooked.as_ref().and_then(|cooked| cooked.as_str()))
        .collect()
}

/// Concatenate chunks, inserting `{varK}` after every chunk that a hole follows.
pub fn placeholder_pattern(chunks: &[&str], holes: usize) -> String {
    let mut pattern = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        pattern.push_str(chunk);
        if i < holes {
            pattern.push('{');
            pattern.push_str(&var_name(i));
            pattern.push('}');
        }
    }
    pattern
}

/// The variable object entries, in hole order.
pub fn template_vars(tpl: &Tpl) -> Vec<TemplateVar> {
    tpl.exprs
        .iter()
        .enumerate()
        .map(|(i, expr)| TemplateVar {
            name: var_name(i),
            expr: expr.span(),
            grouped: matches!(&**expr, Expr::Seq(_)),
        })
        .collect()
}
