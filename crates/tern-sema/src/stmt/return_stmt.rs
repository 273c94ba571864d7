//! Return statements against the enclosing function's result.

use tern_ast::{Expr, ReturnStmt};
use tern_core::{DiagnosticKey, Span, TypeKind};

use crate::checker::Checker;
use crate::model::ExprModel;
use crate::typed::{TypedExpr, TypedStmt};
use crate::value::Value;

impl<'r> Checker<'r> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(super) fn check_return(&mut self, ret: &ReturnStmt<'_>) -> TypedStmt {
        if self.tree.is_deferred(self.current) {
            self.error(ret.span, DiagnosticKey::RetInDeferred, vec![]);
        }

        let Some(result) = self.frame.result.clone() else {
            if !ret.exprs.is_empty() {
                self.error(ret.span, DiagnosticKey::VoidFunctionReturnValue, vec![]);
            }
            let values = self.eval_unchecked(ret.exprs);
            return TypedStmt::Return(values);
        };
        if ret.exprs.is_empty() {
            return TypedStmt::Return(self.bare_return(&result, ret.span));
        }

        let values = match &result {
            TypeKind::Tuple(parts) => self.return_tuple(parts, ret),
            single => self.return_single(single, ret),
        };
        TypedStmt::Return(values)
    }

    /// A bare `return` yields the named results, or fails.
    fn bare_return(&mut self, result: &TypeKind, span: Span) -> Vec<TypedExpr> {
        if self.frame.named_results.is_empty() {
            self.error(span, DiagnosticKey::RequireReturnExpr, vec![result.to_string()]);
            return Vec::new();
        }
        let named = self.frame.named_results.clone();
        named
            .into_iter()
            .map(|(local, kind)| match local {
                Some(id) => {
                    self.tree.mark_used(id);
                    Value::lvalue(kind, true, ExprModel::Local(id)).into_typed()
                }
                None => Value::new(kind.clone(), ExprModel::Default(kind)).into_typed(),
            })
            .collect()
    }

    fn return_tuple(&mut self, parts: &[TypeKind], ret: &ReturnStmt<'_>) -> Vec<TypedExpr> {
        let expected = parts.len();
        if let [expr] = ret.exprs {
            let value = self.eval_expr(expr, None);
            match &value.kind {
                _ if value.is_invalid() => {}
                Some(TypeKind::Tuple(got)) if got.len() < expected => self.error(
                    expr.span(),
                    DiagnosticKey::MissingMultiReturn,
                    vec![expected.to_string(), got.len().to_string()],
                ),
                Some(TypeKind::Tuple(got)) if got.len() > expected => {
                    self.error(expr.span(), DiagnosticKey::OverflowReturn, vec![expected.to_string()]);
                }
                Some(TypeKind::Tuple(got)) => {
                    for (dest, part) in parts.iter().zip(got) {
                        let part = Value::new(part.clone(), value.model.clone());
                        self.check_value_against(dest, &part, expr.span());
                    }
                }
                Some(_) => self.error(
                    expr.span(),
                    DiagnosticKey::MissingMultiReturn,
                    vec![expected.to_string(), "1".to_string()],
                ),
                None => self.error(expr.span(), DiagnosticKey::VoidInValueContext, vec![]),
            }
            return vec![value.into_typed()];
        }

        let arity_ok = ret.exprs.len() == expected;
        if ret.exprs.len() < expected {
            self.error(
                ret.span,
                DiagnosticKey::MissingMultiReturn,
                vec![expected.to_string(), ret.exprs.len().to_string()],
            );
        } else if !arity_ok {
            self.error(ret.span, DiagnosticKey::OverflowReturn, vec![expected.to_string()]);
        }
        ret.exprs
            .iter()
            .zip(parts.iter().map(Some).chain(std::iter::repeat(None)))
            .map(|(expr, dest)| {
                let value = self.eval_single(expr, dest);
                if let (true, Some(dest)) = (arity_ok, dest) {
                    self.check_value_against(dest, &value, expr.span());
                }
                value.into_typed()
            })
            .collect()
    }

    fn return_single(&mut self, dest: &TypeKind, ret: &ReturnStmt<'_>) -> Vec<TypedExpr> {
        if ret.exprs.len() > 1 {
            self.error(ret.span, DiagnosticKey::OverflowReturn, vec!["1".to_string()]);
            return self.eval_unchecked(ret.exprs);
        }
        let expr = &ret.exprs[0];
        let value = self.eval_single(expr, Some(dest));
        self.check_value_against(dest, &value, expr.span());
        vec![value.into_typed()]
    }

    /// Evaluate expressions whose values are already known to be rejected,
    /// so the names they use still count as used.
    fn eval_unchecked(&mut self, exprs: &[Expr<'_>]) -> Vec<TypedExpr> {
        exprs.iter().map(|e| self.eval_expr(e, None).into_typed()).collect()
    }
}
