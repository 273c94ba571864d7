//! Return path verification for functions with a result.
//!
//! [`ReturnChecker`] inspects the typed scope tree once the body is walked
//! and jumps are resolved, so `broken` flags on constructs are final.
//!
//! # Example
//!
//! ```ignore
//! let tree = checker.into_tree();
//! if !ReturnChecker::new(&tree).all_paths_return(tree.root) {
//!     // missing_ret
//! }
//! ```

use crate::scope::{ScopeId, ScopeTree};
use crate::typed::{TypedIter, TypedStmt};

/// Decides whether every path through a scope ends in a terminating
/// statement.
pub struct ReturnChecker<'t> {
    tree: &'t ScopeTree,
}

impl<'t> ReturnChecker<'t> {
    pub fn new(tree: &'t ScopeTree) -> Self {
        Self { tree }
    }

    /// Whether the scope ends in a terminating statement.
    pub fn all_paths_return(&self, scope: ScopeId) -> bool {
        self.tree
            .stmts(scope)
            .last()
            .is_some_and(|stmt| self.terminates(stmt))
    }

    fn terminates(&self, stmt: &TypedStmt) -> bool {
        match stmt {
            TypedStmt::Return(_) | TypedStmt::Goto(_) => true,
            TypedStmt::Block(scope) => self.all_paths_return(*scope),
            TypedStmt::If { branches, default } => {
                default.is_some_and(|scope| self.all_paths_return(scope))
                    && branches.iter().all(|(_, scope)| self.all_paths_return(*scope))
            }
            TypedStmt::Iter {
                construct,
                kind: TypedIter::Infinite,
                ..
            } => !self.tree.construct(*construct).broken,
            TypedStmt::Match {
                construct,
                cases,
                default,
                ..
            } => {
                let Some(default) = default else {
                    return false;
                };
                !self.tree.construct(*construct).broken
                    && self.all_paths_return(*default)
                    && cases.iter().all(|case| self.case_terminates(case.scope))
            }
            _ => false,
        }
    }

    /// A case that falls through continues in the next case.
    fn case_terminates(&self, scope: ScopeId) -> bool {
        matches!(self.tree.stmts(scope).last(), Some(TypedStmt::Fallthrough)) || self.all_paths_return(scope)
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use tern_ast::{AstBuilder, Case, Stmt};
    use tern_core::{DiagnosticKey, TypeKind};
    use tern_registry::SymbolRegistry;

    use super::*;
    use crate::stmt::tests::run_body;

    fn terminates(stmts: &[Stmt<'_>]) -> bool {
        let registry = SymbolRegistry::new();
        let (tree, diagnostics) = run_body(&registry, Some(TypeKind::int()), stmts);
        assert!(
            !diagnostics.contains(DiagnosticKey::IncompatibleTypes),
            "{diagnostics:?}"
        );
        ReturnChecker::new(&tree).all_paths_return(tree.root)
    }

    fn always<'a>(b: &AstBuilder<'a>, stmts: &[Stmt<'a>]) -> Case<'a> {
        b.case_exprs(&[b.bool_lit(true)], stmts)
    }

    #[test]
    fn return_and_goto_terminate() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        assert!(terminates(&[b.ret(&[b.int("1")])]));
        assert!(terminates(&[b.label("top"), b.goto("top")]));
        assert!(!terminates(&[]));
        assert!(!terminates(&[b.ret(&[b.int("1")]), b.expr_stmt(b.int("2"))]));
    }

    #[test]
    fn conditionals_need_a_default() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let ret = || b.ret(&[b.int("1")]);
        assert!(terminates(&[b.if_(b.bool_lit(true), &[ret()], Some(&[ret()]))]));
        assert!(!terminates(&[b.if_(b.bool_lit(true), &[ret()], None)]));
        assert!(!terminates(&[b.if_(b.bool_lit(true), &[ret()], Some(&[]))]));
        assert!(terminates(&[b.block_stmt(&[ret()])]));
    }

    #[test]
    fn infinite_iteration_terminates_unless_broken() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        assert!(terminates(&[b.loop_(&[])]));
        assert!(!terminates(&[b.loop_(&[b.brk()])]));
        assert!(terminates(&[b.loop_(&[b.loop_(&[b.brk()])])]));
        assert!(!terminates(&[b.while_(b.bool_lit(true), None, &[b.ret(&[b.int("1")])])]));
    }

    #[test]
    fn matches_need_a_default_and_terminating_cases() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let ret = || b.ret(&[b.int("1")]);
        assert!(terminates(&[b.match_(None, &[always(&b, &[ret()])], Some(&[ret()]))]));
        assert!(terminates(&[b.match_(None, &[always(&b, &[b.fallthrough()])], Some(&[ret()]))]));
        assert!(!terminates(&[b.match_(None, &[always(&b, &[ret()])], None)]));
        assert!(!terminates(&[b.match_(None, &[always(&b, &[b.brk()])], Some(&[ret()]))]));
    }
}
