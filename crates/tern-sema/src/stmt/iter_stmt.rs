//! Infinite, conditional and range iterations.

use tern_ast::{IterKind, IterStmt, RangeVar};
use tern_core::{DiagnosticKey, PrimKind, TypeKind};

use crate::checker::Checker;
use crate::scope::{Construct, ConstructKind, Local, LocalId};
use crate::typed::{TypedIter, TypedStmt};

impl<'r> Checker<'r> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(super) fn check_iter(&mut self, stmt: &IterStmt<'_>) -> TypedStmt {
        let construct = self.tree.constructs.alloc(Construct {
            kind: ConstructKind::Iter,
            scope: self.current,
            index: self.next_index(),
            broken: false,
            span: stmt.span,
        });

        let (kind, body) = match &stmt.kind {
            IterKind::Infinite => {
                let body = self.enter_construct_body(&stmt.body, construct);
                self.walk_stmts(stmt.body.stmts);
                self.leave_scope();
                (TypedIter::Infinite, body)
            }
            IterKind::While { cond, next } => {
                let cond = self.eval_condition(cond, DiagnosticKey::IterWhileRequireBoolExpr);
                let body = self.enter_construct_body(&stmt.body, construct);
                self.walk_stmts(stmt.body.stmts);
                let next = next.map(|s| Box::new(self.check_stmt(s)));
                self.leave_scope();
                (
                    TypedIter::While {
                        cond: cond.into_typed(),
                        next,
                    },
                    body,
                )
            }
            IterKind::Range { key, value, expr } => {
                let subject = self.eval_single(expr, None);
                let (key_kind, value_kind) = match subject.kind.as_ref().map(TypeKind::deref) {
                    Some(kind) => match enumerated_kinds(kind) {
                        Some(kinds) => (Some(kinds.0), Some(kinds.1)),
                        None => {
                            self.error(
                                expr.span(),
                                DiagnosticKey::IterRangeRequireEnumerableExpr,
                                vec![kind.to_string()],
                            );
                            (None, None)
                        }
                    },
                    None => (None, None),
                };

                let body = self.enter_construct_body(&stmt.body, construct);
                let key = key.as_ref().and_then(|var| self.declare_range_var(var, key_kind));
                let value = value.as_ref().and_then(|var| self.declare_range_var(var, value_kind));
                self.walk_stmts(stmt.body.stmts);
                self.leave_scope();
                (
                    TypedIter::Range {
                        key,
                        value,
                        expr: subject.into_typed(),
                    },
                    body,
                )
            }
        };

        TypedStmt::Iter { construct, kind, body }
    }

    /// Declare a range binding in the body scope. A binding whose kind is
    /// unknown becomes an exempt `any` local.
    fn declare_range_var(&mut self, var: &RangeVar<'_>, kind: Option<TypeKind>) -> Option<LocalId> {
        if var.name.is_blank() {
            return None;
        }
        let scope = self.current;
        if self.tree.declared_here(scope, var.name.name) {
            self.error(var.name.span, DiagnosticKey::DuplicatedIdent, vec![var.name.name.to_string()]);
            return None;
        }
        let known = kind.is_some();
        Some(self.tree.declare_local(
            scope,
            Local {
                name: var.name.name.to_string(),
                kind: kind.unwrap_or(TypeKind::Prim(PrimKind::Any)),
                mutable: var.mutable,
                constant: None,
                used: !known,
                reportable: known,
                scope,
                span: var.name.span,
            },
        ))
    }
}

/// Key and value kinds produced by ranging over `kind`.
fn enumerated_kinds(kind: &TypeKind) -> Option<(TypeKind, TypeKind)> {
    match kind {
        TypeKind::Slice(elem) => Some((TypeKind::int(), elem.as_ref().clone())),
        TypeKind::Array(array) => Some((TypeKind::int(), array.elem.as_ref().clone())),
        TypeKind::Prim(PrimKind::Str) => Some((TypeKind::int(), PrimKind::U8.into())),
        TypeKind::Map(map) => Some((map.key.as_ref().clone(), map.val.as_ref().clone())),
        _ => None,
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

    fn local_kind(tree: &crate::scope::ScopeTree, name: &str) -> Option<TypeKind> {
        tree.locals
            .iter()
            .find(|(_, l)| l.name == name)
            .map(|(_, l)| l.kind.clone())
    }

    #[test]
    fn range_bindings_take_element_kinds() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let stmts = [
            b.let_("names", Some(b.map_ty(b.ty("str"), b.ty("f32"))), Some(b.nil())),
            b.range(
                Some("k"),
                Some("v"),
                b.ident("names"),
                &[b.expr_stmt(b.ident("k")), b.expr_stmt(b.ident("v"))],
            ),
            b.range(Some("i"), Some("c"), b.string("abc"), &[b.expr_stmt(b.ident("i")), b.expr_stmt(b.ident("c"))]),
        ];
        let (tree, diagnostics) = run_body(&registry, None, &stmts);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(local_kind(&tree, "k"), Some(TypeKind::str()));
        assert_eq!(local_kind(&tree, "v"), Some(PrimKind::F32.into()));
        assert_eq!(local_kind(&tree, "i"), Some(TypeKind::int()));
        assert_eq!(local_kind(&tree, "c"), Some(PrimKind::U8.into()));
    }

    #[test]
    fn ranging_over_scalars_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let stmts = [b.range(None, Some("x"), b.int("10"), &[b.expr_stmt(b.ident("x"))])];
        let (_, diagnostics) = run_body(&registry, None, &stmts);
        assert_eq!(diagnostics.count(DiagnosticKey::IterRangeRequireEnumerableExpr), 1);
        assert!(!diagnostics.contains(DiagnosticKey::IdentNotExist));
        assert!(!diagnostics.contains(DiagnosticKey::DeclaredButNotUsed));
    }

    #[test]
    fn while_condition_must_be_bool() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let stmts = [
            b.let_mut("i", None, Some(b.int("0"))),
            b.while_(
                b.binary(b.ident("i"), BinaryOp::Lt, b.int("10")),
                Some(b.inc(b.ident("i"))),
                &[],
            ),
            b.while_(b.ident("i"), None, &[]),
        ];
        let (tree, diagnostics) = run_body(&registry, None, &stmts);
        assert_eq!(diagnostics.count(DiagnosticKey::IterWhileRequireBoolExpr), 1);
        let TypedStmt::Iter { kind: TypedIter::While { next, .. }, .. } = &tree.stmts(tree.root)[1] else {
            panic!("expected a conditional iteration")
        };
        assert!(next.is_some());
    }

    #[test]
    fn body_scope_records_its_construct() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let stmts = [b.let_("n", None, Some(b.int("1"))), b.loop_(&[b.expr_stmt(b.ident("n"))])];
        let (tree, _) = run_body(&registry, None, &stmts);
        let TypedStmt::Iter { construct, body, .. } = &tree.stmts(tree.root)[1] else {
            panic!("expected an iteration")
        };
        assert_eq!(tree.node(*body).construct, Some(*construct));
        assert_eq!(tree.construct(*construct).index, 1);
        assert_eq!(tree.node(*body).parent_index, 1);
    }
}
