//! Indexing and slicing.

use tern_ast::{Expr, IndexExpr, SliceExpr};
use tern_core::{Constant, DiagnosticKey, PrimKind, Span, TypeKind};

use crate::checker::Checker;
use crate::model::ExprModel;
use crate::value::Value;

impl<'r> Checker<'r> {
    pub(crate) fn eval_index(&mut self, index: &IndexExpr<'_>) -> Value {
        let base = self.eval_single(index.base, None);
        let Some(base_kind) = base.kind.clone() else {
            self.eval_expr(index.index, None);
            return Value::invalid();
        };
        let through_ref = base_kind.is_ref();
        let kind = base_kind.deref().clone();

        match &kind {
            TypeKind::Map(map) => {
                let key = self.eval_single(index.index, Some(map.key.as_ref()));
                if !self.check_value_against(&map.key, &key, index.index.span()) {
                    return Value::invalid();
                }
                Value::lvalue((*map.val).clone(), base.mutable, index_model(&base, &key))
            }
            TypeKind::Slice(elem) => {
                let Some(i) = self.eval_position(index.index, None) else {
                    return Value::invalid();
                };
                Value::lvalue((**elem).clone(), base.mutable, index_model(&base, &i))
            }
            TypeKind::Array(array) => {
                let Some(i) = self.eval_position(index.index, Some(array.len)) else {
                    return Value::invalid();
                };
                let lvalue = base.lvalue || through_ref;
                Value {
                    lvalue,
                    ..Value::lvalue((*array.elem).clone(), base.mutable, index_model(&base, &i))
                }
            }
            TypeKind::Prim(PrimKind::Str) => {
                let len = base.constant.as_ref().and_then(Constant::as_bytes).map(<[u8]>::len);
                let Some(i) = self.eval_position(index.index, len) else {
                    return Value::invalid();
                };
                let bytes = base.constant.as_ref().and_then(Constant::as_bytes);
                let at = i.constant.as_ref().and_then(Constant::as_i128);
                match (bytes, at) {
                    (Some(bytes), Some(at)) => {
                        Value::constant(PrimKind::U8.into(), Constant::UInt(u64::from(bytes[at as usize])))
                    }
                    _ => Value::new(PrimKind::U8.into(), index_model(&base, &i)),
                }
            }
            TypeKind::Ptr(Some(elem)) => {
                self.require_unsafe(index.span);
                let Some(i) = self.eval_position(index.index, None) else {
                    return Value::invalid();
                };
                Value::lvalue((**elem).clone(), true, index_model(&base, &i))
            }
            _ => {
                if !base.is_invalid() {
                    self.error(index.span, DiagnosticKey::TypeNotSupportsIndexing, vec![kind.to_string()]);
                }
                self.eval_expr(index.index, None);
                Value::invalid()
            }
        }
    }

    pub(crate) fn eval_slicing(&mut self, slicing: &SliceExpr<'_>) -> Value {
        let base = self.eval_single(slicing.base, None);
        let Some(base_kind) = base.kind.clone() else {
            return Value::invalid();
        };
        let kind = base_kind.deref().clone();
        let (result, len) = match &kind {
            TypeKind::Slice(_) => (kind.clone(), None),
            TypeKind::Array(array) => (TypeKind::slice_of((*array.elem).clone()), Some(array.len)),
            TypeKind::Prim(PrimKind::Str) => (
                kind.clone(),
                base.constant.as_ref().and_then(Constant::as_bytes).map(<[u8]>::len),
            ),
            _ => {
                if !base.is_invalid() {
                    self.error(slicing.span, DiagnosticKey::TypeNotSupportsSlicing, vec![kind.to_string()]);
                }
                return Value::invalid();
            }
        };

        // Slicing allows the end bound to equal the length.
        let bound = len.map(|n| n + 1);
        let start = match slicing.start {
            Some(expr) => Some(self.eval_position(expr, bound)),
            None => None,
        };
        let end = match slicing.end {
            Some(expr) => Some(self.eval_position(expr, bound)),
            None => None,
        };
        let (start, end) = match (start, end) {
            (Some(None), _) | (_, Some(None)) => return Value::invalid(),
            (start, end) => (start.flatten(), end.flatten()),
        };
        if let (Some(s), Some(e)) = (&start, &end) {
            let bounds = (
                s.constant.as_ref().and_then(Constant::as_i128),
                e.constant.as_ref().and_then(Constant::as_i128),
            );
            if let (Some(s), Some(e)) = bounds {
                if s > e {
                    self.error(slicing.span, DiagnosticKey::OverflowLimits, vec![s.to_string(), e.to_string()]);
                    return Value::invalid();
                }
            }
        }

        if let Some(bytes) = base.constant.as_ref().and_then(Constant::as_bytes) {
            let from = start.as_ref().map_or(Some(0), |v| v.constant.as_ref().and_then(Constant::as_i128));
            let to = end
                .as_ref()
                .map_or(Some(bytes.len() as i128), |v| v.constant.as_ref().and_then(Constant::as_i128));
            if let (Some(from), Some(to)) = (from, to) {
                let sliced = bytes[from as usize..to as usize].to_vec();
                return Value::constant(result, Constant::Str(sliced));
            }
        }

        let model = ExprModel::Slicing {
            base: base.model.boxed(),
            start: start.map(|v| v.model.boxed()),
            end: end.map(|v| v.model.boxed()),
        };
        Value::new(result, model)
    }

    /// Check an index or bound: an integer, non-negative and below `len`
    /// when constant.
    fn eval_position(&mut self, expr: &Expr<'_>, len: Option<usize>) -> Option<Value> {
        let value = self.eval_single(expr, Some(&TypeKind::int()));
        if value.is_invalid() {
            return None;
        }
        let kind = value.kind.clone().unwrap_or(TypeKind::Nil);
        if !kind.is_integer() {
            self.error(expr.span(), DiagnosticKey::InvalidIndexType, vec![kind.to_string()]);
            return None;
        }
        if let Some(v) = value.constant.as_ref().and_then(Constant::as_i128) {
            let out_of_range = v < 0 || len.is_some_and(|n| v >= n as i128);
            if out_of_range {
                self.overflow_position(expr.span(), v, len);
                return None;
            }
        }
        Some(value)
    }

    fn overflow_position(&mut self, span: Span, v: i128, len: Option<usize>) {
        let limit = len.map(|n| n.to_string()).unwrap_or_else(|| "0".to_string());
        self.error(span, DiagnosticKey::OverflowLimits, vec![v.to_string(), limit]);
    }
}

fn index_model(base: &Value, index: &Value) -> ExprModel {
    ExprModel::Index {
        base: base.model.clone().boxed(),
        index: index.model.clone().boxed(),
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use tern_ast::AstBuilder;
    use tern_registry::SymbolRegistry;

    use super::*;
    use crate::expr::tests::{declare, with_checker};
    use crate::scope::ScopeFlags;

    #[test]
    fn constant_array_index_is_range_checked() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let ok = b.index(b.ident("xs"), b.int("2"));
        let past = b.index(b.ident("xs"), b.int("3"));
        let negative = b.index(b.ident("xs"), b.int("-1"));
        let (value, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            declare(c, "xs", TypeKind::array_of(TypeKind::int(), 3), true);
            let value = c.eval_expr(&ok, None);
            c.eval_expr(&past, None);
            c.eval_expr(&negative, None);
            value
        });
        assert!(value.lvalue && value.mutable);
        assert_eq!(value.kind, Some(TypeKind::int()));
        assert_eq!(diagnostics.count(DiagnosticKey::OverflowLimits), 2);
    }

    #[test]
    fn index_must_be_integer() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let expr = b.index(b.ident("xs"), b.string("a"));
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            declare(c, "xs", TypeKind::slice_of(TypeKind::int()), false);
            c.eval_expr(&expr, None)
        });
        assert!(diagnostics.contains(DiagnosticKey::InvalidIndexType));
    }

    #[test]
    fn map_index_checks_key() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let good = b.index(b.ident("m"), b.string("k"));
        let bad = b.index(b.ident("m"), b.int("1"));
        let (value, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            declare(c, "m", TypeKind::map_of(PrimKind::Str.into(), TypeKind::int()), true);
            let value = c.eval_expr(&good, None);
            c.eval_expr(&bad, None);
            value
        });
        assert_eq!(value.kind, Some(TypeKind::int()));
        assert_eq!(diagnostics.count(DiagnosticKey::IncompatibleTypes), 1);
    }

    #[test]
    fn constant_strings_fold() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let byte = b.index(b.string("hello"), b.int("1"));
        let sub = b.slicing(b.string("hello"), Some(b.int("1")), Some(b.int("3")));
        let tail = b.slicing(b.string("hello"), Some(b.int("5")), None);
        let (values, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            (c.eval_expr(&byte, None), c.eval_expr(&sub, None), c.eval_expr(&tail, None))
        });
        assert!(diagnostics.is_empty());
        assert_eq!(values.0.constant, Some(Constant::UInt(u64::from(b'e'))));
        assert_eq!(values.1.constant, Some(Constant::Str(b"el".to_vec())));
        assert_eq!(values.2.constant, Some(Constant::Str(Vec::new())));
    }

    #[test]
    fn array_slicing_yields_slice() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let expr = b.slicing(b.ident("xs"), None, Some(b.int("4")));
        let reversed = b.slicing(b.ident("xs"), Some(b.int("2")), Some(b.int("1")));
        let (value, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            declare(c, "xs", TypeKind::array_of(PrimKind::U8.into(), 4), false);
            let value = c.eval_expr(&expr, None);
            c.eval_expr(&reversed, None);
            value
        });
        assert_eq!(value.kind, Some(TypeKind::slice_of(PrimKind::U8.into())));
        assert_eq!(diagnostics.count(DiagnosticKey::OverflowLimits), 1);
    }

    #[test]
    fn unsupported_bases() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let index = b.index(b.ident("n"), b.int("0"));
        let slicing = b.slicing(b.ident("n"), None, None);
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            declare(c, "n", TypeKind::int(), false);
            c.eval_expr(&index, None);
            c.eval_expr(&slicing, None);
        });
        assert!(diagnostics.contains(DiagnosticKey::TypeNotSupportsIndexing));
        assert!(diagnostics.contains(DiagnosticKey::TypeNotSupportsSlicing));
    }

    #[test]
    fn invalid_bounds_invalidate_the_slice() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let bad_start = b.slicing(b.ident("xs"), Some(b.string("a")), None);
        let bad_end = b.slicing(b.ident("xs"), Some(b.int("0")), Some(b.string("b")));
        let open = b.slicing(b.ident("xs"), None, None);
        let (values, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            declare(c, "xs", TypeKind::slice_of(TypeKind::int()), false);
            (
                c.eval_expr(&bad_start, None),
                c.eval_expr(&bad_end, None),
                c.eval_expr(&open, None),
            )
        });
        assert!(values.0.is_invalid());
        assert!(values.1.is_invalid());
        assert_eq!(values.2.kind, Some(TypeKind::slice_of(TypeKind::int())));
        assert_eq!(diagnostics.count(DiagnosticKey::InvalidIndexType), 2);
    }
}
