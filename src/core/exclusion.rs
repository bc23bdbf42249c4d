//! Rules that keep a literal out of the rewrite.
//!
//! Each rule is a predicate over the ancestor frames of the literal. Rules are
//! evaluated in a fixed order and the first match decides the reason.

use serde::Serialize;
use swc_common::Span;

use super::ancestry::{Callee, Frame, FrameKind, enclosing_call, parents};

/// Object whose method calls are diagnostics, never user-facing text.
pub const DIAGNOSTIC_OBJECT: &str = "console";
const SFC_COMMENT_HELPER: &str = "_createCommentVNode";
const SFC_EXPORT_HELPER: &str = "_export_sfc";
const SFC_EXTENSION: &str = ".vue";

/// Why a literal was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Exclusion {
    /// Import/export source or `require`/`import()` argument.
    ModuleLinkage,
    /// Wrapped in the configured ignore marker.
    IgnoreMarker,
    /// Argument of `console.*`.
    Diagnostic,
    /// Already an argument of the localization callee.
    LocalizationCall,
    /// Compiled SFC comment placeholder.
    FrameworkComment,
    /// Compiled SFC `__file` metadata.
    FrameworkMetadata,
}

impl Exclusion {
    pub fn as_str(self) -> &'static str {
        match self {
            Exclusion::ModuleLinkage => "module linkage",
            Exclusion::IgnoreMarker => "ignore marker",
            Exclusion::Diagnostic => "diagnostic call",
            Exclusion::LocalizationCall => "already localized",
            Exclusion::FrameworkComment => "framework comment",
            Exclusion::FrameworkMetadata => "framework metadata",
        }
    }
}

pub struct ExclusionFilter<'a> {
    pub ignore_callee: &'a str,
    pub callee_name: &'a str,
    /// File id ends in `.vue`.
    pub compiled_sfc: bool,
}

impl<'a> ExclusionFilter<'a> {
    pub fn new(id: &str, ignore_callee: &'a str, callee_name: &'a str) -> Self {
        let path = id.split('?').next().unwrap_or(id);
        Self {
            ignore_callee,
            callee_name,
            compiled_sfc: path.ends_with(SFC_EXTENSION),
        }
    }

    /// Returns the first rule that excludes the literal at `span`.
    pub fn check(&self, ancestors: &[Frame], span: Span) -> Option<Exclusion> {
        if is_module_linkage(ancestors, span) {
            return Some(Exclusion::ModuleLinkage);
        }

        if let Some(site) = enclosing_call(ancestors, span) {
            if site.callee.resolves_to(self.ignore_callee) {
                return Some(Exclusion::IgnoreMarker);
            }
            if site.callee.is_member_of(DIAGNOSTIC_OBJECT) {
                return Some(Exclusion::Diagnostic);
            }
            if site.callee.is_ident(self.callee_name) {
                return Some(Exclusion::LocalizationCall);
            }
        }

        if self.compiled_sfc {
            if is_sfc_comment(ancestors) {
                return Some(Exclusion::FrameworkComment);
            }
            if is_sfc_file_metadata(ancestors) {
                return Some(Exclusion::FrameworkMetadata);
            }
        }

        None
    }
}

/// Inside an import/export declaration, or the specifier of `require()` / `import()`.
pub fn is_module_linkage(ancestors: &[Frame], span: Span) -> bool {
    if ancestors
        .iter()
        .any(|f| f.kind == FrameKind::ModuleLinkage)
    {
        return true;
    }
    matches!(
        enclosing_call(ancestors, span),
        Some(site) if site.callee.is_ident("require") || site.callee == Callee::Import
    )
}

/// The direct parent is `_createCommentVNode(...)`.
pub fn is_sfc_comment(ancestors: &[Frame]) -> bool {
    parents(ancestors)
        .next()
        .and_then(Frame::call_site)
        .is_some_and(|site| site.callee.is_ident(SFC_COMMENT_HELPER))
}

/// `export default _export_sfc(x, [["__file", "..."]])`.
///
/// The four nearest ancestors are, from the inside: the tagged array, the outer
/// array, the `_export_sfc` call and the default export.
pub fn is_sfc_file_metadata(ancestors: &[Frame]) -> bool {
    let mut chain = parents(ancestors);
    let (Some(inner), Some(outer), Some(call), Some(export)) =
        (chain.next(), chain.next(), chain.next(), chain.next())
    else {
        return false;
    };

    matches!(inner.kind, FrameKind::Array { file_tag: true })
        && matches!(outer.kind, FrameKind::Array { .. })
        && call
            .call_site()
            .is_some_and(|site| site.callee.is_ident(SFC_EXPORT_HELPER))
        && export.kind == FrameKind::ExportDefault
}
