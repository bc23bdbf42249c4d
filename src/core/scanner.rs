//! Read-only traversal that turns literal occurrences into a rewrite plan.
//!
//! The scanner never mutates the AST. It keeps an explicit stack of [`Frame`]s
//! describing the enclosing nodes, runs the detection gate and the exclusion
//! rules for every literal, and records where and what to write. Keys are
//! registered in the caller's [`KeyRegistry`] as occurrences are accepted.

use std::collections::HashSet;

use serde::Serialize;
use swc_common::{SourceMap, Span, Spanned};
use swc_ecma_ast::{
    AssignPat, BinaryOp, ClassMember, ComputedPropName, Expr, ExportAll, ExportDefaultExpr,
    Function, ImportDecl, JSXExprContainer, KeyValueProp, Lit, NamedExport, Pat, ReturnStmt, Stmt,
    Str, Tpl, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::{
    ancestry::{CallSite, Callee, Frame, FrameKind, is_file_tag, parents},
    dependency::DependencyState,
    exclusion::{Exclusion, ExclusionFilter},
    locator::{ContainerShape, LiteralRef, Slot},
    occurrence::{LiteralKind, Occurrence},
    registry::{KeyConflict, KeyRegistry},
    rewrite::{KeyedText, LocalizeCall, Replacement, rewrite_string},
    template::{cooked_chunks, placeholder_pattern, template_vars},
    transform::TransformConfig,
};

/// A rewrite accepted during traversal, applied later by the emitter.
#[derive(Debug, Clone)]
pub struct PlannedRewrite {
    pub slot: Slot,
    pub replacement: Replacement,
    pub kind: LiteralKind,
    pub keys: Vec<KeyedText>,
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum SkipReason {
    Excluded { rule: Exclusion },
    /// The parent node is not one of the rewritable containers.
    UnsupportedShape,
    /// No unclaimed field of the parent holds this value.
    Unlocated,
    /// A template chunk has an invalid escape sequence.
    InvalidEscape,
    KeyConflict { key: String, existing: String },
}

impl SkipReason {
    pub fn describe(&self) -> String {
        match self {
            SkipReason::Excluded { rule } => rule.as_str().to_string(),
            SkipReason::UnsupportedShape => "unsupported position".to_string(),
            SkipReason::Unlocated => "could not locate literal".to_string(),
            SkipReason::InvalidEscape => "invalid escape sequence".to_string(),
            SkipReason::KeyConflict { key, existing } => {
                format!("key {} already maps to \"{}\"", key, existing)
            }
        }
    }
}

impl From<KeyConflict> for SkipReason {
    fn from(conflict: KeyConflict) -> Self {
        SkipReason::KeyConflict {
            key: conflict.key,
            existing: conflict.existing,
        }
    }
}

/// A literal that matched the detection pattern but was left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedLiteral {
    #[serde(flatten)]
    pub reason: SkipReason,
    pub text: String,
    pub line: usize,
    pub col: usize,
}

/// Everything the traversal produced for one file.
pub struct ScanOutcome {
    pub rewrites: Vec<PlannedRewrite>,
    pub skipped: Vec<SkippedLiteral>,
    pub dependency: DependencyState,
}

pub struct LiteralScanner<'a> {
    id: &'a str,
    config: &'a TransformConfig,
    registry: &'a mut KeyRegistry,
    source_map: &'a SourceMap,
    filter: ExclusionFilter<'a>,
    ancestors: Vec<Frame>,
    claimed: HashSet<Span>,
    rewrites: Vec<PlannedRewrite>,
    skipped: Vec<SkippedLiteral>,
    dependency: DependencyState,
}

impl<'a> LiteralScanner<'a> {
    pub fn new(
        id: &'a str,
        config: &'a TransformConfig,
        registry: &'a mut KeyRegistry,
        source_map: &'a SourceMap,
    ) -> Self {
        Self {
            id,
            config,
            registry,
            source_map,
            filter: ExclusionFilter::new(id, &config.ignore_callee, &config.callee_name),
            ancestors: Vec::new(),
            claimed: HashSet::new(),
            rewrites: Vec::new(),
            skipped: Vec::new(),
            dependency: DependencyState::default(),
        }
    }

    pub fn finish(self) -> ScanOutcome {
        ScanOutcome {
            rewrites: self.rewrites,
            skipped: self.skipped,
            dependency: self.dependency,
        }
    }

    fn with_frame(&mut self, frame: Frame, f: impl FnOnce(&mut Self)) {
        self.ancestors.push(frame);
        f(self);
        self.ancestors.pop();
    }

    fn position(&self, span: Span) -> (usize, usize) {
        let loc = self.source_map.lookup_char_pos(span.lo);
        (loc.line, loc.col_display + 1)
    }

    fn skip(&mut self, reason: SkipReason, text: &str, span: Span) {
        let (line, col) = self.position(span);
        self.skipped.push(SkippedLiteral {
            reason,
            text: text.to_string(),
            line,
            col,
        });
    }

    fn is_translatable(&self, text: &str) -> bool {
        self.config.detection_pattern.is_match(text)
    }

    fn frame_for(expr: &Expr) -> Frame {
        let span = expr.span();
        match expr {
            Expr::Paren(_) => Frame::new(FrameKind::Transparent, span),
            Expr::Call(call) => Frame::new(
                FrameKind::Call(CallSite {
                    callee: Callee::of_call(&call.callee),
                    callee_span: call.callee.span(),
                }),
                span,
            )
            .with_shape(ContainerShape::CallArguments(LiteralRef::of_args(&call.args))),
            Expr::New(new) => Frame::new(
                FrameKind::Call(CallSite {
                    callee: Callee::of_expr(&new.callee),
                    callee_span: new.callee.span(),
                }),
                span,
            )
            .with_shape(ContainerShape::NewArguments(LiteralRef::of_args(
                new.args.as_deref().unwrap_or_default(),
            ))),
            Expr::Array(array) => Frame::new(
                FrameKind::Array {
                    file_tag: is_file_tag(&array.elems),
                },
                span,
            )
            .with_shape(ContainerShape::ArrayElements(LiteralRef::of_elems(
                &array.elems,
            ))),
            Expr::Bin(bin) => {
                let left = LiteralRef::of_expr(&bin.left);
                let right = LiteralRef::of_expr(&bin.right);
                let shape = match bin.op {
                    BinaryOp::LogicalAnd | BinaryOp::LogicalOr | BinaryOp::NullishCoalescing => {
                        ContainerShape::LogicalOperands { left, right }
                    }
                    _ => ContainerShape::BinaryOperands { left, right },
                };
                Frame::new(FrameKind::Other, span).with_shape(shape)
            }
            Expr::Cond(cond) => {
                Frame::new(FrameKind::Other, span).with_shape(ContainerShape::Conditional {
                    test: LiteralRef::of_expr(&cond.test),
                    consequent: LiteralRef::of_expr(&cond.cons),
                    alternate: LiteralRef::of_expr(&cond.alt),
                })
            }
            Expr::Arrow(_) | Expr::Fn(_) => Frame::new(FrameKind::Function, span),
            _ => Frame::new(FrameKind::Other, span),
        }
    }

    fn on_string(&mut self, lit: &Str) {
        let Some(value) = lit.value.as_str() else {
            return;
        };
        if value.is_empty() || !self.is_translatable(value) {
            return;
        }

        if let Some(rule) = self.filter.check(&self.ancestors, lit.span) {
            self.skip(SkipReason::Excluded { rule }, value, lit.span);
            return;
        }

        let located = match parents(&self.ancestors).next() {
            Some(Frame {
                span,
                shape: Some(shape),
                ..
            }) => shape.locate(*span, value, &self.claimed).ok_or(SkipReason::Unlocated),
            _ => Err(SkipReason::UnsupportedShape),
        };
        let slot = match located {
            Ok(slot) => slot,
            Err(reason) => {
                self.skip(reason, value, lit.span);
                return;
            }
        };

        let (line, col) = self.position(lit.span);
        let occurrence = Occurrence {
            id: self.id,
            kind: LiteralKind::String,
            value,
            span: lit.span,
            line,
            col,
        };

        let config = self.config;
        let registry: &KeyRegistry = self.registry;
        let Some(rewrite) = rewrite_string(
            value,
            &config.callee_name,
            |core| config.detection_pattern.is_match(core),
            |core| config.key_strategy.key_for(core, &occurrence, registry),
        ) else {
            return;
        };

        let committed = self.registry.register_all(
            rewrite
                .keys
                .iter()
                .map(|k| (k.key.as_str(), k.text.as_str())),
        );
        if let Err(conflict) = committed {
            self.skip(conflict.into(), value, lit.span);
            return;
        }

        self.claimed.insert(slot.target);
        self.rewrites.push(PlannedRewrite {
            slot,
            replacement: rewrite.replacement,
            kind: LiteralKind::String,
            keys: rewrite.keys,
            line,
            col,
        });
    }

    /// Returns true if the template was planned for rewriting.
    fn plan_template(&mut self, tpl: &Tpl) -> bool {
        let Some(chunks) = cooked_chunks(tpl) else {
            let raw: String = tpl.quasis.iter().map(|q| q.raw.to_string()).collect();
            if self.is_translatable(&raw) {
                self.skip(SkipReason::InvalidEscape, &raw, tpl.span);
            }
            return false;
        };
        if !chunks.iter().any(|chunk| self.is_translatable(chunk)) {
            return false;
        }

        let pattern = placeholder_pattern(&chunks, tpl.exprs.len());

        if let Some(rule) = self.filter.check(&self.ancestors, tpl.span) {
            self.skip(SkipReason::Excluded { rule }, &pattern, tpl.span);
            return false;
        }

        let (line, col) = self.position(tpl.span);
        let occurrence = Occurrence {
            id: self.id,
            kind: LiteralKind::Template,
            value: &pattern,
            span: tpl.span,
            line,
            col,
        };
        let key = self
            .config
            .key_strategy
            .key_for(&pattern, &occurrence, self.registry);

        if let Err(conflict) = self.registry.register(&key, &pattern) {
            self.skip(conflict.into(), &pattern, tpl.span);
            return false;
        }

        self.rewrites.push(PlannedRewrite {
            slot: Slot::in_place(tpl.span),
            replacement: Replacement::Call(LocalizeCall {
                callee: self.config.callee_name.clone(),
                key: key.clone(),
                vars: template_vars(tpl),
            }),
            kind: LiteralKind::Template,
            keys: vec![KeyedText { key, text: pattern }],
            line,
            col,
        });
        true
    }

    fn on_template(&mut self, tpl: &Tpl) {
        let frame = if self.plan_template(tpl) {
            let holes = tpl.exprs.iter().map(|e| LiteralRef::of_expr(e)).collect();
            Frame::new(FrameKind::Template, tpl.span).with_shape(ContainerShape::TemplateVars(holes))
        } else {
            Frame::new(FrameKind::Other, tpl.span)
        };
        self.with_frame(frame, |this| {
            for expr in &tpl.exprs {
                expr.visit_with(this);
            }
        });
    }
}

impl Visit for LiteralScanner<'_> {
    fn visit_expr(&mut self, node: &Expr) {
        match node {
            Expr::Lit(Lit::Str(lit)) => self.on_string(lit),
            Expr::Tpl(tpl) => self.on_template(tpl),
            _ => {
                let frame = Self::frame_for(node);
                self.with_frame(frame, |this| node.visit_children_with(this));
            }
        }
    }

    fn visit_stmt(&mut self, node: &Stmt) {
        self.with_frame(Frame::new(FrameKind::Other, node.span()), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_import_decl(&mut self, node: &ImportDecl) {
        if let Some(dependency) = &self.config.dependency {
            self.dependency.observe_import(node, dependency);
        }
        self.with_frame(Frame::new(FrameKind::ModuleLinkage, node.span), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_export_all(&mut self, node: &ExportAll) {
        self.with_frame(Frame::new(FrameKind::ModuleLinkage, node.span), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_named_export(&mut self, node: &NamedExport) {
        self.with_frame(Frame::new(FrameKind::ModuleLinkage, node.span), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_export_default_expr(&mut self, node: &ExportDefaultExpr) {
        self.with_frame(Frame::new(FrameKind::ExportDefault, node.span), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        if let Some(dependency) = &self.config.dependency {
            self.dependency.observe_declarator(node, dependency);
        }
        let frame = Frame::new(FrameKind::Other, node.span).with_shape(ContainerShape::VarInit(
            LiteralRef::of_opt(node.init.as_deref()),
        ));
        self.with_frame(frame, |this| node.visit_children_with(this));
    }

    fn visit_key_value_prop(&mut self, node: &KeyValueProp) {
        let span = Span::new(node.key.span().lo, node.value.span().hi);
        let frame = Frame::new(FrameKind::Other, span)
            .with_shape(ContainerShape::PropertyValue(LiteralRef::of_expr(&node.value)));
        self.with_frame(frame, |this| node.visit_children_with(this));
    }

    fn visit_computed_prop_name(&mut self, node: &ComputedPropName) {
        self.with_frame(Frame::new(FrameKind::Other, node.span), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_return_stmt(&mut self, node: &ReturnStmt) {
        let frame = Frame::new(FrameKind::Other, node.span).with_shape(
            ContainerShape::ReturnArgument(LiteralRef::of_opt(node.arg.as_deref())),
        );
        self.with_frame(frame, |this| node.visit_children_with(this));
    }

    fn visit_assign_pat(&mut self, node: &AssignPat) {
        let frame = Frame::new(FrameKind::Other, node.span)
            .with_shape(ContainerShape::DefaultValue(LiteralRef::of_expr(&node.right)));
        self.with_frame(frame, |this| node.visit_children_with(this));
    }

    fn visit_pat(&mut self, node: &Pat) {
        self.with_frame(Frame::new(FrameKind::Other, node.span()), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_function(&mut self, node: &Function) {
        self.with_frame(Frame::new(FrameKind::Function, node.span), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_class_member(&mut self, node: &ClassMember) {
        self.with_frame(Frame::new(FrameKind::Other, node.span()), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_jsx_expr_container(&mut self, node: &JSXExprContainer) {
        self.with_frame(Frame::new(FrameKind::Other, node.span), |this| {
            node.visit_children_with(this)
        });
    }
}
