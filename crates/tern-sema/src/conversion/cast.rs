//! Explicit casts.
//!
//! Accepted conversions:
//! - numeric to numeric, including enums through their underlying kind
//! - `str` to and from `[]u8` and `[]i32`, and integers to `str`
//! - `any` and trait values to any kind, checked at run time
//! - pointers to `uintptr`
//! - integers and pointers to pointers, in unsafe scopes only
//!
//! Constant operands of numeric and string conversions stay constant.

use tern_core::{DiagnosticKey, PrimKind, Span, TypeKind};

use crate::checker::Checker;
use crate::eval::constant::convert;
use crate::model::ExprModel;
use crate::value::Value;

fn is_byte_or_rune_slice(kind: &TypeKind) -> bool {
    match kind {
        TypeKind::Slice(elem) => matches!(elem.prim(), Some(PrimKind::U8 | PrimKind::I32)),
        _ => false,
    }
}

impl<'r> Checker<'r> {
    /// Cast `value` to `dest`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn cast(&mut self, dest: &TypeKind, value: Value, span: Span) -> Value {
        let Some(src) = value.kind.clone() else {
            return Value::invalid();
        };
        if !self.castable(dest, &src, span) {
            self.error(
                span,
                DiagnosticKey::TypeNotSupportsCastingTo,
                vec![src.to_string(), dest.to_string()],
            );
            return Value::invalid();
        }

        let folded = match (&value.constant, dest.underlying_prim()) {
            (Some(c), Some(to)) if src.underlying_prim().is_some() => convert(c, to, self.width()),
            _ => None,
        };
        match folded {
            Some(c) => Value::constant(dest.clone(), c),
            None => Value::new(
                dest.clone(),
                ExprModel::Cast {
                    kind: dest.clone(),
                    expr: value.model.boxed(),
                },
            ),
        }
    }

    fn castable(&mut self, dest: &TypeKind, src: &TypeKind, span: Span) -> bool {
        if dest == src || dest.is_any() {
            return true;
        }
        if src.is_any() || matches!(src, TypeKind::Trait(_)) {
            return true;
        }
        match dest {
            TypeKind::Ptr(_) => {
                let from_int = src.is_integer();
                if from_int || src.is_ptr() {
                    self.require_unsafe(span);
                    return true;
                }
                false
            }
            TypeKind::Slice(_) if is_byte_or_rune_slice(dest) => src.is_prim(PrimKind::Str),
            TypeKind::Prim(PrimKind::Str) => is_byte_or_rune_slice(src) || src.is_integer(),
            TypeKind::Prim(PrimKind::Uintptr) if src.is_ptr() => true,
            _ => match (dest.underlying_prim(), src.underlying_prim()) {
                (Some(d), Some(s)) => d.is_numeric() && s.is_numeric(),
                _ => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use tern_core::{Constant, Diagnostics, EnumKind, TypeHash};
    use tern_registry::SymbolRegistry;

    use crate::config::SemaConfig;
    use crate::scope::ScopeFlags;

    use super::*;

    fn run(flags: ScopeFlags, f: impl FnOnce(&mut Checker<'_>) -> Value) -> (Value, Diagnostics) {
        let registry = SymbolRegistry::new();
        let config = SemaConfig::default();
        let mut diagnostics = Diagnostics::new();
        let value = {
            let mut checker = Checker::with_flags(&registry, &config, &mut diagnostics, flags, Span::default());
            f(&mut checker)
        };
        (value, diagnostics)
    }

    #[test]
    fn constant_numeric_casts_truncate() {
        let (value, diagnostics) = run(ScopeFlags::empty(), |c| {
            let v = Value::literal(PrimKind::U16, Constant::UInt(300));
            c.cast(&TypeKind::Prim(PrimKind::U8), v, Span::default())
        });
        assert!(diagnostics.is_empty());
        assert_eq!(value.constant, Some(Constant::UInt(44)));
        assert_eq!(value.kind, Some(TypeKind::Prim(PrimKind::U8)));
    }

    #[test]
    fn integer_to_enum_keeps_constant() {
        let color = TypeKind::Enum(EnumKind {
            decl: TypeHash::from_decl(&[], "Color"),
            name: "Color".into(),
            underlying: PrimKind::U8,
        });
        let (value, _) = run(ScopeFlags::empty(), |c| {
            c.cast(&color, Value::literal(PrimKind::U8, Constant::UInt(2)), Span::default())
        });
        assert_eq!(value.kind, Some(color));
        assert_eq!(value.constant, Some(Constant::UInt(2)));
    }

    #[test]
    fn string_and_byte_slices_convert() {
        let bytes = TypeKind::slice_of(PrimKind::U8.into());
        let (value, diagnostics) = run(ScopeFlags::empty(), |c| {
            let s = Value::literal(PrimKind::Str, Constant::Str(b"hi".to_vec()));
            c.cast(&bytes, s, Span::default())
        });
        assert!(diagnostics.is_empty());
        assert!(matches!(value.model, ExprModel::Cast { .. }));
    }

    #[test]
    fn integer_to_pointer_needs_unsafe() {
        let target = TypeKind::ptr_to(TypeKind::int());
        let (_, diagnostics) = run(ScopeFlags::empty(), |c| {
            c.cast(&target, Value::new(TypeKind::Prim(PrimKind::Uintptr), ExprModel::Nil), Span::default())
        });
        assert!(diagnostics.contains(DiagnosticKey::UnsafeBehaviorAtOutOfUnsafeScope));

        let (_, diagnostics) = run(ScopeFlags::UNSAFE, |c| {
            c.cast(&target, Value::new(TypeKind::Prim(PrimKind::Uintptr), ExprModel::Nil), Span::default())
        });
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unrelated_kinds_are_rejected() {
        let (value, diagnostics) = run(ScopeFlags::empty(), |c| {
            c.cast(&TypeKind::bool(), Value::literal(PrimKind::U8, Constant::UInt(1)), Span::default())
        });
        assert!(value.is_invalid());
        assert_eq!(diagnostics.count(DiagnosticKey::TypeNotSupportsCastingTo), 1);
    }
}
