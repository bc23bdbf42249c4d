//! Detecting and injecting the localization dependency.
//!
//! Detection is passive: the scanner feeds every import declaration and variable
//! declarator through [`DependencyState::observe_import`] and
//! [`DependencyState::observe_declarator`]. After traversal, [`plan_injection`]
//! decides whether a single statement has to be inserted.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use swc_common::{BytePos, SourceMap, Spanned};
use swc_ecma_ast::{
    Callee, Expr, ExprStmt, ImportDecl, ImportSpecifier, Lit, ModuleDecl, ModuleExportName,
    ModuleItem, ObjectPatProp, Pat, Program, PropName, Stmt, VarDeclarator,
};

use super::parsers::parse_source;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleSystem {
    #[default]
    #[serde(alias = "esm")]
    Import,
    #[serde(alias = "commonjs", alias = "cjs")]
    Require,
}

/// Where the localization function comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyConfig {
    /// Module specifier, e.g. `@/i18n`.
    pub path: String,
    /// Binding name, usually the localization callee.
    pub name: String,
    #[serde(default)]
    pub module: ModuleSystem,
    /// Bind as `{ name }` instead of the default export / whole module.
    #[serde(default)]
    pub object_pattern: bool,
    /// Extra source inserted right after the dependency statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<String>,
}

impl DependencyConfig {
    /// The statement that brings `name` into scope.
    pub fn statement(&self) -> String {
        let path = serde_json::to_string(&self.path).unwrap_or_else(|_| format!("\"{}\"", self.path));
        let binding = if self.object_pattern {
            format!("{{ {} }}", self.name)
        } else {
            self.name.clone()
        };
        match self.module {
            ModuleSystem::Import => format!("import {} from {};", binding, path),
            ModuleSystem::Require => format!("const {} = require({});", binding, path),
        }
    }

    /// Statement plus preprocessing, validated by parsing it on its own.
    pub fn injected_source(&self) -> Result<String> {
        let mut text = self.statement();
        if let Some(extra) = self.preprocessing.as_deref().filter(|s| !s.trim().is_empty()) {
            text.push('\n');
            text.push_str(extra.trim_end());
        }

        let parsed = parse_source(
            text.clone(),
            "dependency.js",
            Arc::new(SourceMap::default()),
        )
        .with_context(|| format!("Invalid dependency configuration: {}", self.statement()))?;

        let body_len = match &parsed.program {
            Program::Module(module) => module.body.len(),
            Program::Script(script) => script.body.len(),
        };
        if body_len == 0 {
            bail!("Invalid dependency configuration: empty statement");
        }

        Ok(text)
    }
}

/// Whether the dependency is already in scope. Transitions only forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyState {
    #[default]
    Unresolved,
    ResolvedImport,
    ResolvedRequire,
}

impl DependencyState {
    pub fn is_resolved(self) -> bool {
        self != DependencyState::Unresolved
    }

    pub fn observe_import(&mut self, decl: &ImportDecl, config: &DependencyConfig) {
        if !self.is_resolved() && import_binds(decl, config) {
            *self = DependencyState::ResolvedImport;
        }
    }

    pub fn observe_declarator(&mut self, decl: &VarDeclarator, config: &DependencyConfig) {
        if !self.is_resolved() && require_binds(decl, config) {
            *self = DependencyState::ResolvedRequire;
        }
    }
}

/// `import name from "path"` or `import { name } from "path"`.
fn import_binds(decl: &ImportDecl, config: &DependencyConfig) -> bool {
    if decl.src.value.as_str() != Some(config.path.as_str()) {
        return false;
    }
    decl.specifiers.iter().any(|spec| match spec {
        ImportSpecifier::Default(default) => &*default.local.sym == config.name,
        ImportSpecifier::Named(named) => {
            let imported = match &named.imported {
                Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                Some(ModuleExportName::Str(s)) => s.value.as_str().unwrap_or_default().to_string(),
                None => named.local.sym.to_string(),
            };
            imported == config.name
        }
        ImportSpecifier::Namespace(ns) => &*ns.local.sym == config.name,
    })
}

/// `const name = require("path")` or `const { name } = require("path")`.
fn require_binds(decl: &VarDeclarator, config: &DependencyConfig) -> bool {
    let Some(init) = decl.init.as_deref() else {
        return false;
    };
    let Expr::Call(call) = init else {
        return false;
    };
    let Callee::Expr(callee) = &call.callee else {
        return false;
    };
    if !matches!(&**callee, Expr::Ident(ident) if &*ident.sym == "require") {
        return false;
    }
    let requires_path = matches!(
        call.args.first().map(|arg| &*arg.expr),
        Some(Expr::Lit(Lit::Str(s))) if s.value.as_str() == Some(config.path.as_str())
    );
    if !requires_path {
        return false;
    }

    match &decl.name {
        Pat::Ident(ident) => &*ident.id.sym == config.name,
        Pat::Object(obj) => obj.props.iter().any(|prop| match prop {
            ObjectPatProp::KeyValue(kv) => match &kv.key {
                PropName::Ident(ident) => &*ident.sym == config.name,
                PropName::Str(s) => s.value.as_str() == Some(config.name.as_str()),
                _ => false,
            },
            ObjectPatProp::Assign(assign) => &*assign.key.sym == config.name,
            ObjectPatProp::Rest(_) => false,
        }),
        _ => false,
    }
}

/// Text to splice in at `offset` (relative to the start of the file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub offset: usize,
    pub text: String,
}

fn is_directive(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::Expr(ExprStmt { expr, .. }) if matches!(&**expr, Expr::Lit(Lit::Str(_))))
}

/// End of the leading `'use strict'`-style directives, if there are any.
fn directive_prologue_end(program: &Program) -> Option<BytePos> {
    let statements: Vec<&Stmt> = match program {
        Program::Module(module) => module
            .body
            .iter()
            .map_while(|item| match item {
                ModuleItem::Stmt(stmt) => Some(stmt),
                ModuleItem::ModuleDecl(_) => None,
            })
            .collect(),
        Program::Script(script) => script.body.iter().collect(),
    };
    statements
        .into_iter()
        .take_while(|stmt| is_directive(stmt))
        .last()
        .map(|stmt| stmt.span().hi)
}

/// Decide the single insertion, if any.
///
/// Nothing is injected unless a rewrite happened and the dependency is not
/// already in scope. Require-style dependencies go after the directive prologue
/// so every rewritten statement follows them; import-style dependencies go after
/// the last import. Without an anchor the statement goes to the top.
pub fn plan_injection(
    program: &Program,
    start_pos: BytePos,
    source_len: usize,
    config: &DependencyConfig,
    state: DependencyState,
    rewrote: bool,
) -> Result<Option<Injection>> {
    if !rewrote || state.is_resolved() {
        return Ok(None);
    }
    let source = config.injected_source()?;
    let offset_of = |pos: BytePos| (pos.0.saturating_sub(start_pos.0) as usize).min(source_len);

    let item_spans: Vec<_> = match program {
        Program::Module(module) => module.body.iter().map(|item| item.span()).collect(),
        Program::Script(script) => script.body.iter().map(|stmt| stmt.span()).collect(),
    };

    let after = match config.module {
        ModuleSystem::Require => directive_prologue_end(program),
        ModuleSystem::Import => match program {
            Program::Module(module) => module
                .body
                .iter()
                .filter(|item| matches!(item, ModuleItem::ModuleDecl(ModuleDecl::Import(_))))
                .next_back()
                .map(|item| item.span().hi),
            Program::Script(_) => None,
        },
    };

    let injection = match (after, item_spans.first()) {
        (Some(hi), _) => Injection {
            offset: offset_of(hi),
            text: format!("\n{}", source),
        },
        (None, Some(first)) => Injection {
            offset: offset_of(first.lo),
            text: format!("{}\n", source),
        },
        (None, None) => Injection {
            offset: 0,
            text: format!("{}\n", source),
        },
    };

    Ok(Some(injection))
}
