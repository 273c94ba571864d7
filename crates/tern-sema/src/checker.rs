//! Shared state of expression and statement checking.
//!
//! A [`Checker`] checks one body (a function, a global initializer or a
//! registration-time constant). It borrows the registry and configuration,
//! appends to the shared diagnostics list and owns the [`ScopeTree`] being
//! built. Expression, operator, conversion and statement checking are
//! implemented as `impl Checker` blocks in their own modules.

use rustc_hash::FxHashSet;
use tern_core::{DiagnosticKey, Diagnostic, Diagnostics, IntWidth, Severity, Span, TypeKind};
use tern_registry::SymbolRegistry;

use crate::config::SemaConfig;
use crate::scope::{LocalId, ScopeFlags, ScopeId, ScopeTree};
use crate::stmt::jumps::{GotoEntry, LabelEntry, PendingJump};
use crate::typed::TypedStmt;

/// Per-function state that lives at the function's root scope.
#[derive(Debug, Default)]
pub(crate) struct FunctionFrame {
    /// Declared result, `None` for functions without one.
    pub result: Option<TypeKind>,
    /// Locals bound to named results, `None` for `_` results.
    pub named_results: Vec<(Option<LocalId>, TypeKind)>,
    pub labels: Vec<LabelEntry>,
    pub gotos: Vec<GotoEntry>,
    pub jumps: Vec<PendingJump>,
}

type ReportKey = (DiagnosticKey, Span, Vec<String>);

pub struct Checker<'r> {
    pub(crate) registry: &'r SymbolRegistry,
    pub(crate) config: &'r SemaConfig,
    pub(crate) diagnostics: &'r mut Diagnostics,
    /// Every diagnostic already in `diagnostics`, for deduplication.
    reported: FxHashSet<ReportKey>,
    pub(crate) tree: ScopeTree,
    pub(crate) current: ScopeId,
    pub(crate) frame: FunctionFrame,
    /// Generic parameter names visible to type resolution.
    pub(crate) generics: Vec<String>,
}

impl<'r> Checker<'r> {
    pub fn new(registry: &'r SymbolRegistry, config: &'r SemaConfig, diagnostics: &'r mut Diagnostics) -> Self {
        Self::with_flags(registry, config, diagnostics, ScopeFlags::empty(), Span::default())
    }

    pub fn with_flags(
        registry: &'r SymbolRegistry,
        config: &'r SemaConfig,
        diagnostics: &'r mut Diagnostics,
        flags: ScopeFlags,
        span: Span,
    ) -> Self {
        let tree = ScopeTree::new(flags, span);
        let current = tree.root;
        let reported = diagnostics
            .iter()
            .map(|d| (d.key, d.span, d.args.clone()))
            .collect();
        Self {
            registry,
            config,
            diagnostics,
            reported,
            tree,
            current,
            frame: FunctionFrame::default(),
            generics: Vec::new(),
        }
    }

    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    pub fn into_tree(self) -> ScopeTree {
        self.tree
    }

    #[inline]
    pub(crate) fn width(&self) -> IntWidth {
        self.config.int_width
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Record an error. An identical diagnostic at the same span is only
    /// recorded once.
    pub(crate) fn error(&mut self, span: Span, key: DiagnosticKey, args: Vec<String>) {
        self.report(Severity::Error, span, key, args);
    }

    pub(crate) fn report(&mut self, severity: Severity, span: Span, key: DiagnosticKey, args: Vec<String>) {
        if !self.reported.insert((key, span, args.clone())) {
            return;
        }
        log::trace!("{span}: {}", key.as_str());
        self.diagnostics.push(Diagnostic::new(severity, span, key, args));
    }

    pub(crate) fn incompatible(&mut self, span: Span, dest: &TypeKind, src: &TypeKind) {
        self.error(
            span,
            DiagnosticKey::IncompatibleTypes,
            vec![dest.to_string(), src.to_string()],
        );
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    pub(crate) fn is_unsafe(&self) -> bool {
        self.tree.is_unsafe(self.current)
    }

    /// Report unsafe behavior outside an unsafe scope.
    pub(crate) fn require_unsafe(&mut self, span: Span) {
        if !self.is_unsafe() {
            self.error(span, DiagnosticKey::UnsafeBehaviorAtOutOfUnsafeScope, vec![]);
        }
    }

    /// Open a child of the current scope and make it current.
    pub(crate) fn enter_scope(&mut self, flags: ScopeFlags, span: Span) -> ScopeId {
        let id = self.tree.push_child(self.current, flags, span);
        self.current = id;
        id
    }

    /// Close the current scope, report its unused declarations and return to
    /// its parent.
    pub(crate) fn leave_scope(&mut self) {
        self.report_unused(self.current);
        if let Some(parent) = self.tree.node(self.current).parent {
            self.current = parent;
        }
    }

    pub(crate) fn report_unused(&mut self, scope: ScopeId) {
        if !self.config.report_unused {
            return;
        }
        let severity = self.config.unused_severity;
        for (name, span) in self.tree.unused_in(scope) {
            self.report(severity, span, DiagnosticKey::DeclaredButNotUsed, vec![name]);
        }
    }

    /// Append a statement to the current scope.
    pub(crate) fn push_stmt(&mut self, stmt: TypedStmt) {
        self.tree.node_mut(self.current).stmts.push(stmt);
    }

    /// Position the next statement of the current scope will get.
    pub(crate) fn next_index(&self) -> usize {
        self.tree.node(self.current).stmts.len()
    }
}
