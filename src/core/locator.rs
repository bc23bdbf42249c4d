//! Containing shapes and slot location.
//!
//! Every grammatical position a rewritten literal may occupy is a variant of
//! [`ContainerShape`]. A shape is captured when the scanner enters the containing
//! node and records, for each field, the string literal sitting there (if any).
//! Locating a literal then reduces to finding the first unclaimed field whose
//! original value equals the literal's value.

use std::collections::HashSet;

use swc_common::Span;
use swc_ecma_ast::{Expr, ExprOrSpread, Lit};

/// A string literal directly in a field, with parentheses looked through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralRef {
    pub span: Span,
    pub value: String,
}

impl LiteralRef {
    pub fn of_expr(expr: &Expr) -> Option<Self> {
        match expr {
            Expr::Paren(paren) => Self::of_expr(&paren.expr),
            Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|value| LiteralRef {
                span: s.span,
                value: value.to_string(),
            }),
            _ => None,
        }
    }

    pub fn of_opt(expr: Option<&Expr>) -> Option<Self> {
        expr.and_then(Self::of_expr)
    }

    fn of_arg(arg: &ExprOrSpread) -> Option<Self> {
        if arg.spread.is_some() {
            return None;
        }
        Self::of_expr(&arg.expr)
    }

    pub fn of_args(args: &[ExprOrSpread]) -> Vec<Option<Self>> {
        args.iter().map(Self::of_arg).collect()
    }

    pub fn of_elems(elems: &[Option<ExprOrSpread>]) -> Vec<Option<Self>> {
        elems
            .iter()
            .map(|e| e.as_ref().and_then(Self::of_arg))
            .collect()
    }
}

/// The grammatical position of a literal inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotField {
    Argument(usize),
    Element(usize),
    Init,
    Left,
    Right,
    Test,
    Consequent,
    Alternate,
    Value,
    ReturnArgument,
    DefaultValue,
    TemplateVar(usize),
    /// The literal replaces itself. Used for template literals.
    InPlace,
}

impl SlotField {
    /// Whether a `+` chain written here must be parenthesized.
    pub fn needs_grouping(self) -> bool {
        matches!(self, SlotField::Left | SlotField::Right | SlotField::Test)
    }
}

/// Where a rewrite lands: the container, the field and the exact span to overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub container: Span,
    pub field: SlotField,
    pub target: Span,
}

impl Slot {
    pub fn in_place(span: Span) -> Self {
        Slot {
            container: span,
            field: SlotField::InPlace,
            target: span,
        }
    }
}

/// Closed set of containers a string literal can be rewritten in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerShape {
    CallArguments(Vec<Option<LiteralRef>>),
    NewArguments(Vec<Option<LiteralRef>>),
    ArrayElements(Vec<Option<LiteralRef>>),
    VarInit(Option<LiteralRef>),
    BinaryOperands {
        left: Option<LiteralRef>,
        right: Option<LiteralRef>,
    },
    LogicalOperands {
        left: Option<LiteralRef>,
        right: Option<LiteralRef>,
    },
    PropertyValue(Option<LiteralRef>),
    Conditional {
        test: Option<LiteralRef>,
        consequent: Option<LiteralRef>,
        alternate: Option<LiteralRef>,
    },
    ReturnArgument(Option<LiteralRef>),
    DefaultValue(Option<LiteralRef>),
    /// Hole expressions of a template that is itself being rewritten. A literal
    /// here ends up as a property value of the generated variable object.
    TemplateVars(Vec<Option<LiteralRef>>),
}

impl ContainerShape {
    /// Find the slot holding a literal with `value`, skipping claimed targets.
    pub fn locate(&self, container: Span, value: &str, claimed: &HashSet<Span>) -> Option<Slot> {
        let pick = |field: SlotField, candidate: &Option<LiteralRef>| -> Option<Slot> {
            candidate
                .as_ref()
                .filter(|lit| lit.value == value && !claimed.contains(&lit.span))
                .map(|lit| Slot {
                    container,
                    field,
                    target: lit.span,
                })
        };
        let indexed = |make: fn(usize) -> SlotField, items: &[Option<LiteralRef>]| {
            items
                .iter()
                .enumerate()
                .find_map(|(i, candidate)| pick(make(i), candidate))
        };

        match self {
            ContainerShape::CallArguments(args) | ContainerShape::NewArguments(args) => {
                indexed(SlotField::Argument, args)
            }
            ContainerShape::ArrayElements(elems) => indexed(SlotField::Element, elems),
            ContainerShape::TemplateVars(vars) => indexed(SlotField::TemplateVar, vars),
            ContainerShape::VarInit(init) => pick(SlotField::Init, init),
            ContainerShape::BinaryOperands { left, right }
            | ContainerShape::LogicalOperands { left, right } => {
                pick(SlotField::Left, left).or_else(|| pick(SlotField::Right, right))
            }
            ContainerShape::PropertyValue(value) => pick(SlotField::Value, value),
            ContainerShape::Conditional {
                test,
                consequent,
                alternate,
            } => pick(SlotField::Test, test)
                .or_else(|| pick(SlotField::Consequent, consequent))
                .or_else(|| pick(SlotField::Alternate, alternate)),
            ContainerShape::ReturnArgument(arg) => pick(SlotField::ReturnArgument, arg),
            ContainerShape::DefaultValue(value) => pick(SlotField::DefaultValue, value),
        }
    }
}
