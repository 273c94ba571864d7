//! Operators on non-primitive kinds.

use tern_core::{BinaryOp, Span, TypeKind};

use super::{Operands, binary_model};
use crate::checker::Checker;
use crate::conversion::{ConstFit, const_fit};
use crate::value::Value;

impl<'r> Checker<'r> {
    /// `nil` against another kind: only `==`/`!=` with nil-compatible kinds.
    pub(super) fn solve_nil(
        &mut self,
        (left, right): Operands,
        op: BinaryOp,
        l: &TypeKind,
        r: &TypeKind,
        span: Span,
    ) -> Value {
        let other = if l.is_nil() { r } else { l };
        if !op.is_equality() {
            self.operator_not_for(span, op, other);
            return Value::invalid();
        }
        if !other.is_nil_compatible() {
            self.incompatible(span, l, r);
            return Value::invalid();
        }
        Value::new(TypeKind::bool(), binary_model(op, &left, &right))
    }

    /// Functions, slices and maps: only `==`/`!=` against `nil`.
    pub(super) fn solve_nil_only(
        &mut self,
        operands: Operands,
        op: BinaryOp,
        l: &TypeKind,
        r: &TypeKind,
        span: Span,
    ) -> Value {
        if l.is_nil() || r.is_nil() {
            return self.solve_nil(operands, op, l, r, span);
        }
        let shown = if is_nil_only(l) { l } else { r };
        self.operator_not_for(span, op, shown);
        Value::invalid()
    }

    /// Comparison of two pointers, or pointer arithmetic with an integer.
    pub(super) fn solve_pointer(
        &mut self,
        (left, right): Operands,
        op: BinaryOp,
        l: &TypeKind,
        r: &TypeKind,
        span: Span,
    ) -> Value {
        if l.is_nil() || r.is_nil() {
            return self.solve_nil((left, right), op, l, r, span);
        }
        if l.is_ptr() && r.is_integer() {
            if !matches!(op, BinaryOp::Add | BinaryOp::Sub) {
                self.operator_not_for(span, op, l);
                return Value::invalid();
            }
            self.require_unsafe(span);
            return Value::new(l.clone(), binary_model(op, &left, &right));
        }
        if !(l.is_ptr() && r.is_ptr()) {
            self.incompatible(span, l, r);
            return Value::invalid();
        }
        if !op.is_equality() {
            self.operator_not_for(span, op, l);
            return Value::invalid();
        }
        if !self.either_compatible(l, r, span) {
            self.incompatible(span, l, r);
            return Value::invalid();
        }
        Value::new(TypeKind::bool(), binary_model(op, &left, &right))
    }

    /// Kinds that only support `==` and `!=`: arrays, references, structs,
    /// traits and `any`. A `nil` operand is solved as a nil comparison.
    pub(super) fn solve_equality_only(
        &mut self,
        (left, right): Operands,
        op: BinaryOp,
        l: &TypeKind,
        r: &TypeKind,
        span: Span,
    ) -> Value {
        if l.is_nil() || r.is_nil() {
            return self.solve_nil((left, right), op, l, r, span);
        }
        if !op.is_equality() {
            let shown = if l.prim().is_some() && r.prim().is_none() { r } else { l };
            self.operator_not_for(span, op, shown);
            return Value::invalid();
        }
        let compatible = l.is_any() || r.is_any() || self.either_compatible(l, r, span);
        if !compatible {
            self.incompatible(span, l, r);
            return Value::invalid();
        }
        Value::new(TypeKind::bool(), binary_model(op, &left, &right))
    }

    /// Enums compare with the same enum and with constants that fit the
    /// underlying kind. `|`, `&` and `^` keep the enum kind.
    pub(super) fn solve_enum(
        &mut self,
        (left, right): Operands,
        op: BinaryOp,
        l: &TypeKind,
        r: &TypeKind,
        span: Span,
    ) -> Value {
        let (enum_kind, other, other_value) = match l {
            TypeKind::Enum(_) => (l, r, &right),
            _ => (r, l, &left),
        };
        let TypeKind::Enum(e) = enum_kind else {
            return Value::invalid();
        };
        let fits = other == enum_kind
            || other_value.constant.as_ref().is_some_and(|c| {
                const_fit(&TypeKind::Prim(e.underlying), c, self.width()) == ConstFit::Fits
            });
        if !fits {
            self.incompatible(span, l, r);
            return Value::invalid();
        }
        if !op.is_comparison() && !op.is_bitwise() {
            self.operator_not_for(span, op, enum_kind);
            return Value::invalid();
        }

        let underlying = TypeKind::Prim(e.underlying);
        let as_underlying = |v: Value| Value {
            kind: Some(underlying.clone()),
            ..v
        };
        let enum_kind = enum_kind.clone();
        let mut result = self.solve_primitive(
            (as_underlying(left), as_underlying(right)),
            op,
            e.underlying,
            e.underlying,
            span,
        );
        if !result.is_invalid() && !op.is_comparison() {
            result.kind = Some(enum_kind);
            result.untyped = false;
        }
        result
    }

    /// Equality operands are comparable when either converts to the other.
    /// Trait operands are checked without reporting receiver mismatches.
    fn either_compatible(&mut self, a: &TypeKind, b: &TypeKind, span: Span) -> bool {
        if matches!(a, TypeKind::Trait(_)) || matches!(b, TypeKind::Trait(_)) {
            return self.trait_satisfied(a, b) || self.trait_satisfied(b, a);
        }
        self.compatible(a, b, true, false, span) || self.compatible(b, a, true, false, span)
    }
}

fn is_nil_only(kind: &TypeKind) -> bool {
    matches!(kind, TypeKind::Fn(_) | TypeKind::Slice(_) | TypeKind::Map(_))
}

#[cfg(test)]
mod tests {
    use tern_core::{Constant, DiagnosticKey, Diagnostics, EnumKind, FnKind, PrimKind, StructKind, TraitKind, TypeHash};
    use tern_registry::{StructDef, SymbolRegistry, TraitDef, TraitMethod};

    use super::super::tests::solve;
    use super::*;
    use crate::config::SemaConfig;
    use crate::model::ExprModel;

    /// `trait Shape { fn area(&self) int }` implemented by `struct Square`.
    fn shapes() -> SymbolRegistry {
        let mut registry = SymbolRegistry::new();
        let shape = TypeHash::from_decl(&[], "Shape");
        registry
            .register_trait(TraitDef {
                hash: shape,
                name: "Shape".into(),
                inherits: vec![],
                methods: vec![TraitMethod {
                    name: "area".into(),
                    kind: FnKind {
                        params: vec![],
                        result: Some(TypeKind::int()),
                        unsafety: false,
                    },
                    reference_receiver: true,
                }],
                span: Span::default(),
            })
            .unwrap();
        let mut square = StructDef::new(TypeHash::from_decl(&[], "Square"), "Square", Span::default());
        square.traits.push(shape);
        registry.register_struct(square).unwrap();
        registry
    }

    fn shape() -> TypeKind {
        TypeKind::Trait(TraitKind {
            decl: TypeHash::from_decl(&[], "Shape"),
            name: "Shape".into(),
        })
    }

    fn square() -> TypeKind {
        TypeKind::Struct(StructKind {
            decl: TypeHash::from_decl(&[], "Square"),
            name: "Square".into(),
            generics: vec![],
        })
    }

    fn solve_in(registry: &SymbolRegistry, left: TypeKind, op: BinaryOp, right: TypeKind) -> (Value, Diagnostics) {
        let config = SemaConfig::default();
        let mut diagnostics = Diagnostics::new();
        let value = {
            let mut checker = Checker::new(registry, &config, &mut diagnostics);
            checker.solve_binary(
                Value::new(left, ExprModel::Nil),
                op,
                Value::new(right, ExprModel::Nil),
                Span::default(),
            )
        };
        (value, diagnostics)
    }

    fn color() -> TypeKind {
        TypeKind::Enum(EnumKind {
            decl: TypeHash::from_decl(&[], "Color"),
            name: "Color".into(),
            underlying: PrimKind::U8,
        })
    }

    #[test]
    fn enum_bitwise_keeps_enum_kind() {
        let red = Value::constant(color(), Constant::UInt(1));
        let blue = Value::constant(color(), Constant::UInt(4));
        let (value, diagnostics) = solve(red, BinaryOp::BitOr, blue);
        assert!(diagnostics.is_empty());
        assert_eq!(value.kind, Some(color()));
        assert_eq!(value.constant, Some(Constant::UInt(5)));
    }

    #[test]
    fn enum_compares_with_fitting_constant() {
        let c = Value::new(color(), ExprModel::Nil);
        let (value, diagnostics) = solve(c.clone(), BinaryOp::Eq, Value::literal(PrimKind::U8, Constant::UInt(2)));
        assert!(diagnostics.is_empty());
        assert_eq!(value.kind, Some(TypeKind::bool()));

        let (_, diagnostics) = solve(c, BinaryOp::Add, Value::literal(PrimKind::U8, Constant::UInt(2)));
        assert!(diagnostics.contains(DiagnosticKey::OperatorNotForType));
    }

    #[test]
    fn pointer_arithmetic_requires_unsafe() {
        let p = Value::new(TypeKind::ptr_to(TypeKind::int()), ExprModel::Nil);
        let (value, diagnostics) = solve(p, BinaryOp::Add, Value::literal(PrimKind::U8, Constant::UInt(1)));
        assert_eq!(value.kind, Some(TypeKind::ptr_to(TypeKind::int())));
        assert!(diagnostics.contains(DiagnosticKey::UnsafeBehaviorAtOutOfUnsafeScope));
    }

    #[test]
    fn any_supports_equality_only() {
        let a = Value::new(TypeKind::Prim(PrimKind::Any), ExprModel::Nil);
        let (value, diagnostics) = solve(a.clone(), BinaryOp::Eq, Value::literal(PrimKind::U8, Constant::UInt(1)));
        assert!(diagnostics.is_empty());
        assert_eq!(value.kind, Some(TypeKind::bool()));

        let (_, diagnostics) = solve(a, BinaryOp::Lt, Value::literal(PrimKind::U8, Constant::UInt(1)));
        assert!(diagnostics.contains(DiagnosticKey::OperatorNotForType));
    }

    #[test]
    fn nil_against_non_nillable_is_incompatible() {
        let (_, diagnostics) = solve(
            Value::new(TypeKind::int(), ExprModel::Nil),
            BinaryOp::Eq,
            Value::new(TypeKind::Nil, ExprModel::Nil),
        );
        assert!(diagnostics.contains(DiagnosticKey::IncompatibleTypes));
    }

    #[test]
    fn trait_equality_does_not_report_receivers() {
        let registry = shapes();
        let (value, diagnostics) = solve_in(&registry, shape(), BinaryOp::Eq, TypeKind::ref_to(square()));
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        assert_eq!(value.kind, Some(TypeKind::bool()));

        let (value, diagnostics) = solve_in(&registry, square(), BinaryOp::NotEq, shape());
        assert!(value.is_invalid());
        assert!(diagnostics.contains(DiagnosticKey::IncompatibleTypes));
        assert!(!diagnostics.contains(DiagnosticKey::TraitHasReferenceParameteredFunction));
    }

    #[test]
    fn nil_comparisons_reach_every_nillable_category() {
        let registry = shapes();
        for kind in [shape(), TypeKind::ptr_to(TypeKind::int()), TypeKind::Prim(PrimKind::Any)] {
            let (value, diagnostics) = solve_in(&registry, kind.clone(), BinaryOp::Eq, TypeKind::Nil);
            assert!(diagnostics.is_empty(), "{kind}: {diagnostics:#?}");
            assert_eq!(value.kind, Some(TypeKind::bool()));
        }
        let (_, diagnostics) = solve_in(&registry, square(), BinaryOp::Eq, TypeKind::Nil);
        assert!(diagnostics.contains(DiagnosticKey::IncompatibleTypes));
    }

    #[test]
    fn function_kinds_win_over_later_categories() {
        let registry = shapes();
        let func = TypeKind::Fn(Box::new(FnKind {
            params: vec![],
            result: None,
            unsafety: false,
        }));
        let (_, diagnostics) = solve_in(&registry, square(), BinaryOp::Eq, func.clone());
        assert_eq!(diagnostics.count(DiagnosticKey::OperatorNotForType), 1);
        assert!(diagnostics.iter().any(|d| d.args.contains(&func.to_string())));
    }
}
