//! Owned descriptions of the nodes enclosing the current traversal position.
//!
//! The scanner pushes a [`Frame`] when it enters a node and pops it on the way
//! out, so exclusion rules and the locator can look at ancestors as plain data.

use swc_common::Span;
use swc_ecma_ast::{Callee as SwcCallee, Expr, ExprOrSpread, Lit, MemberProp};

use super::locator::ContainerShape;

/// What a call's callee resolves to, as far as the exclusion rules care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    Ident(String),
    Member {
        object: Option<String>,
        property: Option<String>,
    },
    /// `(a, b.c)(...)`: the callee is the last element of a sequence.
    Sequence(Box<Callee>),
    /// Dynamic `import(...)`.
    Import,
    Other,
}

impl Callee {
    pub fn of_call(callee: &SwcCallee) -> Self {
        match callee {
            SwcCallee::Expr(expr) => Self::of_expr(expr),
            SwcCallee::Import(_) => Callee::Import,
            SwcCallee::Super(_) => Callee::Other,
        }
    }

    pub fn of_expr(expr: &Expr) -> Self {
        match expr {
            Expr::Ident(ident) => Callee::Ident(ident.sym.to_string()),
            Expr::Member(member) => Callee::Member {
                object: match &*member.obj {
                    Expr::Ident(ident) => Some(ident.sym.to_string()),
                    _ => None,
                },
                property: match &member.prop {
                    MemberProp::Ident(ident) => Some(ident.sym.to_string()),
                    _ => None,
                },
            },
            Expr::Paren(paren) => Self::of_expr(&paren.expr),
            Expr::Seq(seq) => match seq.exprs.last() {
                Some(last) => Callee::Sequence(Box::new(Self::of_expr(last))),
                None => Callee::Other,
            },
            _ => Callee::Other,
        }
    }

    /// True if the callee is `name`, `x.name` or `(..., x.name)`.
    pub fn resolves_to(&self, name: &str) -> bool {
        match self {
            Callee::Ident(ident) => ident == name,
            Callee::Member { property, .. } => property.as_deref() == Some(name),
            Callee::Sequence(inner) => inner.resolves_to(name),
            Callee::Import | Callee::Other => false,
        }
    }

    pub fn is_ident(&self, name: &str) -> bool {
        matches!(self, Callee::Ident(ident) if ident == name)
    }

    /// True for `object.anything(...)`.
    pub fn is_member_of(&self, object_name: &str) -> bool {
        matches!(self, Callee::Member { object: Some(object), .. } if object == object_name)
    }
}

/// A call or `new` expression being traversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub callee: Callee,
    pub callee_span: Span,
}

impl CallSite {
    /// Whether `span` lies in the argument list rather than the callee.
    pub fn is_argument(&self, span: Span) -> bool {
        !(self.callee_span.lo <= span.lo && span.hi <= self.callee_span.hi)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameKind {
    Call(CallSite),
    Array {
        /// First element is the string `"__file"`.
        file_tag: bool,
    },
    ExportDefault,
    /// Import declarations and re-exports.
    ModuleLinkage,
    /// Function bodies, arrows and methods.
    Function,
    /// Parentheses. Skipped when looking for the direct parent.
    Transparent,
    /// A template literal being rewritten; its holes become variables.
    Template,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    pub span: Span,
    pub shape: Option<ContainerShape>,
}

impl Frame {
    pub fn new(kind: FrameKind, span: Span) -> Self {
        Frame {
            kind,
            span,
            shape: None,
        }
    }

    pub fn with_shape(mut self, shape: ContainerShape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn call_site(&self) -> Option<&CallSite> {
        match &self.kind {
            FrameKind::Call(site) => Some(site),
            _ => None,
        }
    }
}

/// Iterate ancestors from the nearest outwards, skipping parentheses.
pub fn parents(ancestors: &[Frame]) -> impl Iterator<Item = &Frame> {
    ancestors
        .iter()
        .rev()
        .filter(|f| f.kind != FrameKind::Transparent)
}

/// The nearest call whose argument list contains `span`, within the current function.
pub fn enclosing_call(ancestors: &[Frame], span: Span) -> Option<&CallSite> {
    for frame in ancestors.iter().rev() {
        match &frame.kind {
            FrameKind::Function => return None,
            FrameKind::Call(site) if site.is_argument(span) => return Some(site),
            _ => {}
        }
    }
    None
}

pub fn is_file_tag(elems: &[Option<ExprOrSpread>]) -> bool {
    matches!(
        elems.first(),
        Some(Some(ExprOrSpread { spread: None, expr }))
            if matches!(&**expr, Expr::Lit(Lit::Str(s)) if s.value.as_str() == Some("__file"))
    )
}
