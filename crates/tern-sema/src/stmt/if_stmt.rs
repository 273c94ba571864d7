//! Conditional chains.

use tern_ast::{Expr, IfStmt};
use tern_core::{DiagnosticKey, PrimKind, TypeKind};

use crate::checker::Checker;
use crate::scope::ScopeFlags;
use crate::typed::TypedStmt;
use crate::value::Value;

impl<'r> Checker<'r> {
    pub(super) fn check_if(&mut self, stmt: &IfStmt<'_>) -> TypedStmt {
        let mut branches = Vec::with_capacity(stmt.branches.len());
        for branch in stmt.branches {
            let cond = self.eval_condition(&branch.cond, DiagnosticKey::IfRequireBoolExpr);
            let body = self.check_block(&branch.body, ScopeFlags::empty());
            branches.push((cond.into_typed(), body));
        }
        let default = stmt
            .default
            .as_ref()
            .map(|block| self.check_block(block, ScopeFlags::empty()));
        TypedStmt::If { branches, default }
    }

    /// Evaluate a condition that must be `bool`, reporting `key` otherwise.
    pub(super) fn eval_condition(&mut self, expr: &Expr<'_>, key: DiagnosticKey) -> Value {
        let bool_kind = TypeKind::bool();
        let value = self.eval_single(expr, Some(&bool_kind));
        if value.is_invalid() {
            return value;
        }
        if !value.kind.as_ref().is_some_and(|k| k.is_prim(PrimKind::Bool)) {
            let shown = value.kind.as_ref().map(ToString::to_string).unwrap_or_default();
            self.error(expr.span(), key, vec![shown]);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use tern_ast::AstBuilder;
    use tern_core::BinaryOp;
    use tern_registry::SymbolRegistry;

    use super::*;
    use crate::stmt::tests::run_body;

    #[test]
    fn conditions_must_be_bool() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let stmts = [
            b.let_("n", None, Some(b.int("3"))),
            b.if_chain(
                &[
                    (b.binary(b.ident("n"), BinaryOp::Gt, b.int("1")), &[]),
                    (b.ident("n"), &[]),
                ],
                Some(&[]),
            ),
        ];
        let (tree, diagnostics) = run_body(&registry, None, &stmts);
        assert_eq!(diagnostics.count(DiagnosticKey::IfRequireBoolExpr), 1);
        let TypedStmt::If { branches, default } = &tree.stmts(tree.root)[1] else {
            panic!("expected a conditional")
        };
        assert_eq!(branches.len(), 2);
        assert!(default.is_some());
    }

    #[test]
    fn branch_scopes_are_independent() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let stmts = [b.if_(
            b.bool_lit(true),
            &[b.let_("x", None, Some(b.int("1"))), b.expr_stmt(b.ident("x"))],
            Some(&[b.let_("x", None, Some(b.int("2"))), b.expr_stmt(b.ident("x"))]),
        )];
        let (_, diagnostics) = run_body(&registry, None, &stmts);
        assert!(diagnostics.is_empty());
    }
}
