//! Expression checking.
//!
//! [`Checker::eval_expr`] turns an AST expression into a [`Value`]. The
//! optional hint is the kind the context expects; it only steers literal
//! and composite inference and never replaces a compatibility check.
//!
//! Submodules:
//! - [`identifiers`]: locals, globals, functions and package members
//! - [`calls`]: argument binding
//! - [`index`]: indexing and slicing
//! - [`composite`]: struct, slice, array and map literals
//! - [`member`]: fields, methods and enum items
//! - [`assignment`]: the checks shared by assignments, returns and calls

mod assignment;
mod calls;
mod composite;
mod identifiers;
mod index;
mod member;

use tern_ast::Expr;
use tern_core::{DiagnosticKey, Span, TypeKind};

use crate::checker::Checker;
use crate::eval::eval_literal;
use crate::value::Value;

impl<'r> Checker<'r> {
    /// Check an expression. Tuple and void results are returned as is.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn eval_expr(&mut self, expr: &Expr<'_>, hint: Option<&TypeKind>) -> Value {
        match expr {
            Expr::Literal(lit) => eval_literal(lit, hint),
            Expr::Ident(ident) => self.eval_ident(ident),
            Expr::Binary(binary) => {
                let left = self.eval_single(binary.left, None);
                let right = self.eval_single(binary.right, left.kind.as_ref());
                self.solve_binary(left, binary.op, right, binary.span)
            }
            Expr::Unary(unary) => {
                let operand = self.eval_single(unary.operand, hint);
                self.solve_unary(unary.op, operand, unary.operand.is_struct_literal(), unary.span)
            }
            Expr::Call(call) => self.eval_call(call),
            Expr::Index(index) => self.eval_index(index),
            Expr::Slice(slicing) => self.eval_slicing(slicing),
            Expr::Composite(composite) => self.eval_composite(composite, hint),
            Expr::Cast(cast) => {
                let Some(dest) = self.resolve_type(&cast.ty) else {
                    self.eval_expr(cast.expr, None);
                    return Value::invalid();
                };
                let value = self.eval_single(cast.expr, Some(&dest));
                if value.is_invalid() {
                    return value;
                }
                self.cast(&dest, value, cast.span)
            }
            Expr::Member(member) => self.eval_member(member),
        }
    }

    /// Check an expression that must produce exactly one value.
    pub(crate) fn eval_single(&mut self, expr: &Expr<'_>, hint: Option<&TypeKind>) -> Value {
        let value = self.eval_expr(expr, hint);
        self.require_single(value, expr.span())
    }

    /// Reject tuple and void values where one value is expected.
    pub(crate) fn require_single(&mut self, value: Value, span: Span) -> Value {
        match &value.kind {
            Some(TypeKind::Tuple(_)) => {
                let shown = value.kind.as_ref().map(ToString::to_string).unwrap_or_default();
                self.error(span, DiagnosticKey::TupleInSingleValueContext, vec![shown]);
                Value::invalid()
            }
            None if value.is_void() => {
                self.error(span, DiagnosticKey::VoidInValueContext, vec![]);
                Value::invalid()
            }
            _ => value,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use bumpalo::Bump;
    use tern_ast::AstBuilder;
    use tern_core::{BinaryOp, Constant, Diagnostics, PrimKind, UnaryOp};
    use tern_registry::SymbolRegistry;

    use super::*;
    use crate::config::SemaConfig;
    use crate::scope::{Local, ScopeFlags};

    /// Run `f` against a checker over `registry` with `flags` on the root.
    pub(crate) fn with_checker<R>(
        registry: &SymbolRegistry,
        flags: ScopeFlags,
        f: impl FnOnce(&mut Checker<'_>) -> R,
    ) -> (R, Diagnostics) {
        let config = SemaConfig::default();
        let mut diagnostics = Diagnostics::new();
        let result = {
            let mut checker = Checker::with_flags(registry, &config, &mut diagnostics, flags, Default::default());
            f(&mut checker)
        };
        (result, diagnostics)
    }

    /// Declare a used local in the current scope.
    pub(crate) fn declare(checker: &mut Checker<'_>, name: &str, kind: TypeKind, mutable: bool) {
        let scope = checker.current;
        checker.tree.declare_local(
            scope,
            Local {
                name: name.to_string(),
                kind,
                mutable,
                constant: None,
                used: true,
                reportable: false,
                scope,
                span: Default::default(),
            },
        );
    }

    #[test]
    fn constant_expression_folds() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let expr = b.binary(b.int("200"), BinaryOp::Add, b.int("100"));
        let (value, diagnostics) =
            with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&expr, None));
        assert!(diagnostics.is_empty());
        assert_eq!(value.kind, Some(TypeKind::Prim(PrimKind::U16)));
        assert_eq!(value.constant, Some(Constant::UInt(300)));
        assert!(value.untyped);
    }

    #[test]
    fn negative_literal_folds_through_unary() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let expr = b.unary(UnaryOp::Neg, b.int("129"));
        let (value, _) = with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&expr, None));
        assert_eq!(value.kind, Some(TypeKind::Prim(PrimKind::I16)));
        assert_eq!(value.constant, Some(Constant::Int(-129)));
    }

    #[test]
    fn cast_resolves_target_and_folds() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let expr = b.cast(b.ty("i8"), b.int("200"));
        let (value, diagnostics) =
            with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&expr, None));
        assert!(diagnostics.is_empty());
        assert_eq!(value.constant, Some(Constant::Int(-56)));
    }

    #[test]
    fn void_call_in_value_context() {
        use tern_core::{Span, TypeHash};
        use tern_registry::FnDef;

        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut registry = SymbolRegistry::new();
        registry
            .register_fn(FnDef::new(TypeHash::from_function(&[], "log"), "log", Span::default()))
            .unwrap();
        let expr = b.binary(b.call(b.ident("log"), &[]), BinaryOp::Add, b.int("1"));
        let (value, diagnostics) =
            with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&expr, None));
        assert!(value.is_invalid());
        assert!(diagnostics.contains(DiagnosticKey::VoidInValueContext));
    }
}
