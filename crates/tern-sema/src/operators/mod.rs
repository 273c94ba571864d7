//! Binary and unary operator solving.
//!
//! [`Checker::solve_binary`] dispatches on the category of the operand
//! kinds, first match wins:
//!
//! 1. Logical `&&`/`||`, both sides `bool`
//! 2. Functions, which only compare with `nil`
//! 3. Arrays and references, `==`/`!=` only
//! 4. Slices and maps, which only compare with `nil`
//! 5. Pointers, compared or offset by an integer in unsafe scopes
//! 6. Enums, solved through their underlying kind
//! 7. Structs, `==`/`!=` only
//! 8. Traits, `==`/`!=` only
//! 9. `nil` against nil-compatible kinds
//! 10. `any`, `==`/`!=` only
//! 11. Primitives: `bool`, `str`, floats and integers
//!
//! Every handler checks operand compatibility before fixing the result kind
//! and folds only when both operands are constant.

mod primitive;
mod structural;
mod unary;

use tern_core::{BinaryOp, Constant, DiagnosticKey, PrimKind, Span, TypeKind};

use crate::checker::Checker;
use crate::model::ExprModel;
use crate::value::Value;

type Operands = (Value, Value);

fn binary_model(op: BinaryOp, left: &Value, right: &Value) -> ExprModel {
    ExprModel::Binary {
        op,
        left: left.model.clone().boxed(),
        right: right.model.clone().boxed(),
    }
}

impl<'r> Checker<'r> {
    /// Solve `left op right`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn solve_binary(&mut self, left: Value, op: BinaryOp, right: Value, span: Span) -> Value {
        let (Some(l), Some(r)) = (left.kind.clone(), right.kind.clone()) else {
            return Value::invalid();
        };
        if left.is_invalid() || right.is_invalid() {
            return Value::invalid();
        }
        log::trace!("solve {l} {op} {r}");

        if matches!(l, TypeKind::Tuple(_)) || matches!(r, TypeKind::Tuple(_)) {
            let tuple = if matches!(l, TypeKind::Tuple(_)) { &l } else { &r };
            self.error(
                span,
                DiagnosticKey::TupleInSingleValueContext,
                vec![tuple.to_string()],
            );
            return Value::invalid();
        }
        let operands = (left, right);
        if op.is_logical() {
            return self.solve_logical(operands, op, &l, &r, span);
        }
        let either = |category: fn(&TypeKind) -> bool| category(&l) || category(&r);
        if either(|k| matches!(k, TypeKind::Fn(_))) {
            return self.solve_nil_only(operands, op, &l, &r, span);
        }
        if either(|k| matches!(k, TypeKind::Array(_) | TypeKind::Ref(_))) {
            return self.solve_equality_only(operands, op, &l, &r, span);
        }
        if either(|k| matches!(k, TypeKind::Slice(_) | TypeKind::Map(_))) {
            return self.solve_nil_only(operands, op, &l, &r, span);
        }
        if either(TypeKind::is_ptr) {
            return self.solve_pointer(operands, op, &l, &r, span);
        }
        if either(|k| matches!(k, TypeKind::Enum(_))) {
            return self.solve_enum(operands, op, &l, &r, span);
        }
        if either(|k| matches!(k, TypeKind::Struct(_))) || either(|k| matches!(k, TypeKind::Trait(_))) {
            return self.solve_equality_only(operands, op, &l, &r, span);
        }
        if either(TypeKind::is_nil) {
            return self.solve_nil(operands, op, &l, &r, span);
        }
        if either(TypeKind::is_any) {
            return self.solve_equality_only(operands, op, &l, &r, span);
        }
        match (&l, &r) {
            (TypeKind::Prim(lp), TypeKind::Prim(rp)) => self.solve_primitive(operands, op, *lp, *rp, span),
            _ => {
                self.incompatible(span, &l, &r);
                Value::invalid()
            }
        }
    }

    fn operator_not_for(&mut self, span: Span, op: BinaryOp, kind: &TypeKind) {
        self.error(
            span,
            DiagnosticKey::OperatorNotForType,
            vec![op.to_string(), kind.to_string()],
        );
    }

    fn solve_logical(
        &mut self,
        (left, right): Operands,
        op: BinaryOp,
        l: &TypeKind,
        r: &TypeKind,
        span: Span,
    ) -> Value {
        for kind in [l, r] {
            if !kind.is_prim(PrimKind::Bool) {
                self.operator_not_for(span, op, kind);
                return Value::invalid();
            }
        }
        let folded = match (
            left.constant.as_ref().and_then(|c| c.as_bool()),
            right.constant.as_ref().and_then(|c| c.as_bool()),
        ) {
            (Some(a), Some(b)) => Some(match op {
                BinaryOp::LogicalAnd => a && b,
                _ => a || b,
            }),
            _ => None,
        };
        match folded {
            Some(b) => Value {
                untyped: left.untyped && right.untyped,
                ..Value::constant(TypeKind::bool(), Constant::Bool(b))
            },
            None => Value::new(TypeKind::bool(), binary_model(op, &left, &right)),
        }
    }
}
