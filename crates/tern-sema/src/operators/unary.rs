//! Unary operators.

use tern_core::{Constant, DiagnosticKey, PrimKind, Span, TypeKind, UnaryOp};

use crate::checker::Checker;
use crate::eval::constant::{int_const, min_int_kind, wrap_int};
use crate::model::ExprModel;
use crate::value::Value;

fn unary_model(op: UnaryOp, operand: &Value) -> ExprModel {
    ExprModel::Unary {
        op,
        operand: operand.model.clone().boxed(),
    }
}

impl<'r> Checker<'r> {
    /// Solve `op operand`.
    ///
    /// `struct_literal` marks an operand written as a struct composite
    /// literal; `&` turns it into a heap allocation instead of taking an
    /// address.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn solve_unary(&mut self, op: UnaryOp, operand: Value, struct_literal: bool, span: Span) -> Value {
        let Some(kind) = operand.kind.clone() else {
            return Value::invalid();
        };
        if operand.is_invalid() {
            return Value::invalid();
        }
        match op {
            UnaryOp::Neg => self.solve_neg(operand, &kind, span),
            UnaryOp::Plus => {
                if !kind.is_numeric() {
                    return self.unary_not_for(span, op, &kind);
                }
                operand
            }
            UnaryOp::BitNot => self.solve_bit_not(operand, &kind, span),
            UnaryOp::LogicalNot => {
                if !kind.is_prim(PrimKind::Bool) {
                    return self.unary_not_for(span, op, &kind);
                }
                match operand.constant.as_ref().and_then(Constant::as_bool) {
                    Some(b) => Value {
                        untyped: operand.untyped,
                        ..Value::constant(kind, Constant::Bool(!b))
                    },
                    None => Value::new(kind, unary_model(op, &operand)),
                }
            }
            UnaryOp::Deref => match &kind {
                TypeKind::Ptr(Some(elem)) => {
                    self.require_unsafe(span);
                    Value::lvalue(elem.as_ref().clone(), true, unary_model(op, &operand))
                }
                TypeKind::Ref(elem) => {
                    Value::lvalue(elem.as_ref().clone(), operand.mutable, unary_model(op, &operand))
                }
                _ => self.unary_not_for(span, op, &kind),
            },
            UnaryOp::AddrOf => {
                if struct_literal && matches!(kind, TypeKind::Struct(_)) {
                    return Value::new(TypeKind::ref_to(kind), ExprModel::HeapAlloc(operand.model.boxed()));
                }
                if !operand.lvalue {
                    self.error(span, DiagnosticKey::InvalidExpr, vec![]);
                    return Value::invalid();
                }
                self.require_unsafe(span);
                Value::new(TypeKind::ptr_to(kind), unary_model(op, &operand))
            }
        }
    }

    fn unary_not_for(&mut self, span: Span, op: UnaryOp, kind: &TypeKind) -> Value {
        self.error(
            span,
            DiagnosticKey::OperatorNotForType,
            vec![op.to_string(), kind.to_string()],
        );
        Value::invalid()
    }

    /// Negation. A negated integer constant takes the narrowest kind holding
    /// the result when it was untyped or unsigned.
    fn solve_neg(&mut self, operand: Value, kind: &TypeKind, span: Span) -> Value {
        let Some(prim) = kind.prim().filter(|p| p.is_numeric()) else {
            return self.unary_not_for(span, UnaryOp::Neg, kind);
        };
        let untyped = operand.untyped;
        let result = match &operand.constant {
            Some(Constant::Float(f)) => Value::constant(kind.clone(), Constant::Float(-f)),
            Some(c) => {
                let v = -c.as_i128().unwrap_or_default();
                let reinfer = untyped || prim.is_unsigned_int();
                let target = if reinfer { min_int_kind(v) } else { Some(prim) };
                match target.filter(|k| k.fits_int(v, self.width())) {
                    Some(k) => Value::constant(k.into(), int_const(v, k)),
                    None => {
                        self.error(
                            span,
                            DiagnosticKey::OverflowLimits,
                            vec![v.to_string(), prim.to_string()],
                        );
                        Value::constant(kind.clone(), int_const(wrap_int(v, prim, self.width()), prim))
                    }
                }
            }
            None => return Value::new(kind.clone(), unary_model(UnaryOp::Neg, &operand)),
        };
        Value { untyped, ..result }
    }

    fn solve_bit_not(&mut self, operand: Value, kind: &TypeKind, span: Span) -> Value {
        let Some(prim) = kind.prim().filter(|p| p.is_integer()) else {
            return self.unary_not_for(span, UnaryOp::BitNot, kind);
        };
        match operand.constant.as_ref().and_then(Constant::as_i128) {
            Some(v) => Value {
                untyped: operand.untyped,
                ..Value::constant(kind.clone(), int_const(wrap_int(!v, prim, self.width()), prim))
            },
            None => Value::new(kind.clone(), unary_model(UnaryOp::BitNot, &operand)),
        }
    }
}
