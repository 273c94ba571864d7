//! Operators on primitive kinds, with constant folding.

use tern_core::{BinaryOp, Constant, DiagnosticKey, PrimKind, Span, TypeKind};

use super::{Operands, binary_model};
use crate::checker::Checker;
use crate::conversion::{ConstFit, const_fit, prim_accepts};
use crate::eval::constant::{
    compare, fold_float, fold_int, int_const, min_int_kind, shift_ladder, wider, widen_to_fit,
    wrap_int,
};
use crate::value::Value;

fn folded(kind: PrimKind, constant: Constant, untyped: bool) -> Value {
    Value {
        untyped,
        ..Value::constant(kind.into(), constant)
    }
}

impl<'r> Checker<'r> {
    pub(super) fn solve_primitive(
        &mut self,
        operands: Operands,
        op: BinaryOp,
        l: PrimKind,
        r: PrimKind,
        span: Span,
    ) -> Value {
        if op.is_shift() {
            return self.solve_shift(operands, op, l, r, span);
        }
        match (l, r) {
            (PrimKind::Bool, PrimKind::Bool) => self.solve_bool(operands, op, span),
            (PrimKind::Str, PrimKind::Str) => self.solve_str(operands, op, span),
            _ if l.is_numeric() && r.is_numeric() => self.solve_numeric(operands, op, l, r, span),
            _ => {
                self.incompatible(span, &l.into(), &r.into());
                Value::invalid()
            }
        }
    }

    fn solve_bool(&mut self, (left, right): Operands, op: BinaryOp, span: Span) -> Value {
        if !op.is_equality() {
            self.operator_not_for(span, op, &TypeKind::bool());
            return Value::invalid();
        }
        match (
            left.constant.as_ref().and_then(Constant::as_bool),
            right.constant.as_ref().and_then(Constant::as_bool),
        ) {
            (Some(a), Some(b)) => folded(
                PrimKind::Bool,
                Constant::Bool(compare(op, &a, &b)),
                left.untyped && right.untyped,
            ),
            _ => Value::new(TypeKind::bool(), binary_model(op, &left, &right)),
        }
    }

    fn solve_str(&mut self, (left, right): Operands, op: BinaryOp, span: Span) -> Value {
        let untyped = left.untyped && right.untyped;
        let consts = (
            left.constant.as_ref().and_then(Constant::as_bytes),
            right.constant.as_ref().and_then(Constant::as_bytes),
        );
        match op {
            BinaryOp::Add => match consts {
                (Some(a), Some(b)) => folded(PrimKind::Str, Constant::Str([a, b].concat()), untyped),
                _ => Value::new(TypeKind::str(), binary_model(op, &left, &right)),
            },
            BinaryOp::Eq | BinaryOp::NotEq => match consts {
                (Some(a), Some(b)) => folded(PrimKind::Bool, Constant::Bool(compare(op, a, b)), untyped),
                _ => Value::new(TypeKind::bool(), binary_model(op, &left, &right)),
            },
            _ => {
                self.operator_not_for(span, op, &TypeKind::str());
                Value::invalid()
            }
        }
    }

    /// Whether a numeric operand pair is compatible. A constant facing a
    /// non-constant operand must fit that operand's kind.
    fn numeric_operands_fit(&mut self, left: &Value, l: PrimKind, right: &Value, r: PrimKind, span: Span) -> bool {
        let width = self.width();
        let (constant, target, source) = match (&left.constant, &right.constant) {
            (Some(c), None) => (c, r, l),
            (None, Some(c)) => (c, l, r),
            _ => {
                if prim_accepts(l, r, true, width) || prim_accepts(r, l, true, width) {
                    return true;
                }
                self.incompatible(span, &l.into(), &r.into());
                return false;
            }
        };
        match const_fit(&target.into(), constant, width) {
            ConstFit::Fits => true,
            _ if prim_accepts(target, source, true, width) => true,
            ConstFit::Overflow => {
                self.error(
                    span,
                    DiagnosticKey::OverflowLimits,
                    vec![constant.to_string(), target.to_string()],
                );
                false
            }
            _ => {
                self.incompatible(span, &l.into(), &r.into());
                false
            }
        }
    }

    fn solve_numeric(&mut self, (left, right): Operands, op: BinaryOp, l: PrimKind, r: PrimKind, span: Span) -> Value {
        if !self.numeric_operands_fit(&left, l, &right, r, span) {
            return Value::invalid();
        }
        let operand_kind = match (left.is_constant(), right.is_constant()) {
            (true, false) => r,
            (false, true) => l,
            _ => wider(l, r, self.width()),
        };
        if (op.is_bitwise() || op == BinaryOp::Mod) && operand_kind.is_float() {
            self.operator_not_for(span, op, &operand_kind.into());
            return Value::invalid();
        }

        let untyped = left.untyped && right.untyped;
        if matches!(op, BinaryOp::Div | BinaryOp::Mod) && right.constant.as_ref().is_some_and(Constant::is_zero) {
            self.error(span, DiagnosticKey::DivideByZero, vec![]);
            let zero = if operand_kind.is_float() {
                Constant::Float(0.0)
            } else {
                int_const(0, operand_kind)
            };
            return folded(operand_kind, zero, untyped);
        }

        let (Some(a), Some(b)) = (&left.constant, &right.constant) else {
            let kind = if op.is_comparison() { PrimKind::Bool } else { operand_kind };
            return Value::new(kind.into(), binary_model(op, &left, &right));
        };

        if op.is_comparison() {
            let result = match (a.as_i128(), b.as_i128()) {
                (Some(x), Some(y)) => compare(op, &x, &y),
                _ => compare(op, &a.as_f64().unwrap_or_default(), &b.as_f64().unwrap_or_default()),
            };
            return folded(PrimKind::Bool, Constant::Bool(result), untyped);
        }

        if operand_kind.is_float() {
            let x = a.as_f64().unwrap_or_default();
            let y = b.as_f64().unwrap_or_default();
            let v = fold_float(op, x, y).unwrap_or_default();
            let v = if operand_kind == PrimKind::F32 { v as f32 as f64 } else { v };
            return folded(operand_kind, Constant::Float(v), untyped);
        }

        let x = a.as_i128().unwrap_or_default();
        let y = b.as_i128().unwrap_or_default();
        let v = fold_int(op, x, y).unwrap_or_default();
        self.fit_folded_int(v, operand_kind, untyped, span)
    }

    /// Give a folded integer the narrowest kind at least as wide as `base`
    /// that holds it, or report it and wrap it into `base`.
    fn fit_folded_int(&mut self, v: i128, base: PrimKind, untyped: bool, span: Span) -> Value {
        let width = self.width();
        match widen_to_fit(v, base, width) {
            Some(kind) => folded(kind, int_const(v, kind), untyped),
            None => {
                self.error(
                    span,
                    DiagnosticKey::OverflowLimits,
                    vec![v.to_string(), base.to_string()],
                );
                folded(base, int_const(wrap_int(v, base, width), base), untyped)
            }
        }
    }

    fn solve_shift(&mut self, (left, right): Operands, op: BinaryOp, l: PrimKind, r: PrimKind, span: Span) -> Value {
        for kind in [l, r] {
            if !kind.is_integer() {
                self.operator_not_for(span, op, &kind.into());
                return Value::invalid();
            }
        }
        let mut count = right.constant.as_ref().and_then(Constant::as_i128);
        if count.is_some_and(|n| n < 0) {
            self.error(span, DiagnosticKey::BitshiftMustUnsigned, vec![]);
            count = Some(0);
        }
        let untyped = left.untyped && right.untyped;
        let (Some(a), Some(n)) = (left.constant.as_ref().and_then(Constant::as_i128), count) else {
            return Value::new(l.into(), binary_model(op, &left, &right));
        };

        if op == BinaryOp::Shr {
            let v = fold_int(op, a, n).unwrap_or_default();
            return folded(l, int_const(wrap_int(v, l, self.width()), l), untyped);
        }

        let n = u64::try_from(n).unwrap_or(u64::MAX);
        let ladder = shift_ladder(n);
        if ladder.is_float() {
            let v = a as f64 * 2f64.powi(i32::try_from(n).unwrap_or(i32::MAX));
            return folded(PrimKind::F64, Constant::Float(v), untyped);
        }
        let width = self.width();
        let v = fold_int(op, a, n as i128).unwrap_or(i128::MAX);
        let mut base = ladder;
        if l.bits(width) > base.bits(width) {
            base = l;
        }
        if let Some(min) = min_int_kind(v) {
            if min.bits(width) > base.bits(width) {
                base = min;
            }
        }
        match widen_to_fit(v, base, width) {
            Some(kind) => folded(kind, int_const(v, kind), untyped),
            None => folded(PrimKind::F64, Constant::Float(a as f64 * 2f64.powi(n as i32)), untyped),
        }
    }
}
