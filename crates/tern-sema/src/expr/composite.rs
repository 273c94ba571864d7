//! Composite literals: structs, slices, arrays and maps.

use tern_ast::{CompositeEntry, CompositeExpr, Expr, TypeExpr};
use tern_core::{DiagnosticKey, MapKind, Span, StructKind, TypeKind};

use crate::checker::Checker;
use crate::model::ExprModel;
use crate::value::Value;

impl<'r> Checker<'r> {
    pub(crate) fn eval_composite(&mut self, composite: &CompositeExpr<'_>, hint: Option<&TypeKind>) -> Value {
        let kind = match &composite.ty {
            Some(TypeExpr::Array(array)) if array.len.is_none() => {
                let Some(elem) = self.resolve_type(&array.elem) else {
                    return Value::invalid();
                };
                TypeKind::array_of(elem, composite.entries.len())
            }
            Some(ty) => match self.resolve_type(ty) {
                Some(kind) => kind,
                None => return Value::invalid(),
            },
            None => match self.infer_composite_kind(composite, hint) {
                Some(kind) => kind,
                None => return Value::invalid(),
            },
        };

        match &kind {
            TypeKind::Struct(s) => self.struct_literal(composite, s),
            TypeKind::Slice(elem) => {
                let elem = (**elem).clone();
                let Some(elems) = self.positional_entries(composite, &elem) else {
                    return Value::invalid();
                };
                Value::new(kind.clone(), ExprModel::SliceLit { elem, elems })
            }
            TypeKind::Array(array) => {
                if composite.entries.len() > array.len {
                    self.error(composite.span, DiagnosticKey::ArgumentOverflow, vec![array.len.to_string()]);
                    return Value::invalid();
                }
                let elem = (*array.elem).clone();
                let Some(elems) = self.positional_entries(composite, &elem) else {
                    return Value::invalid();
                };
                Value::new(kind.clone(), ExprModel::ArrayLit { elem, elems })
            }
            TypeKind::Map(map) => self.map_literal(composite, map, &kind),
            _ => {
                self.error(composite.span, DiagnosticKey::InvalidExpr, vec![]);
                Value::invalid()
            }
        }
    }

    /// Untyped `{...}`: a slice or array from the hint, otherwise a slice of
    /// the first element's kind.
    fn infer_composite_kind(&mut self, composite: &CompositeExpr<'_>, hint: Option<&TypeKind>) -> Option<TypeKind> {
        if let Some(kind @ (TypeKind::Slice(_) | TypeKind::Array(_))) = hint {
            return Some(kind.clone());
        }
        let Some(CompositeEntry::Positional(first)) = composite.entries.first() else {
            self.error(composite.span, DiagnosticKey::InvalidExpr, vec![]);
            return None;
        };
        let value = self.eval_single(first, None);
        if value.is_invalid() {
            return None;
        }
        let elem = self.defaulted_kind(&value)?;
        if elem.is_nil() {
            self.error(first.span(), DiagnosticKey::InvalidExpr, vec![]);
            return None;
        }
        Some(TypeKind::slice_of(elem))
    }

    fn positional_entries(&mut self, composite: &CompositeExpr<'_>, elem: &TypeKind) -> Option<Vec<ExprModel>> {
        let mut elems = Vec::with_capacity(composite.entries.len());
        let mut ok = true;
        for entry in composite.entries {
            let CompositeEntry::Positional(expr) = entry else {
                self.error(entry_span(entry), DiagnosticKey::InvalidExpr, vec![]);
                ok = false;
                continue;
            };
            match self.entry_value(expr, elem, true) {
                Some(model) => elems.push(model),
                None => ok = false,
            }
        }
        ok.then_some(elems)
    }

    fn entry_value(&mut self, expr: &Expr<'_>, dest: &TypeKind, dest_mutable: bool) -> Option<ExprModel> {
        let value = self.eval_single(expr, Some(dest));
        self.bind_value(dest, dest_mutable, &value, expr.span())
            .then_some(value.model)
    }

    fn map_literal(&mut self, composite: &CompositeExpr<'_>, map: &MapKind, kind: &TypeKind) -> Value {
        let mut entries = Vec::with_capacity(composite.entries.len());
        let mut ok = true;
        for entry in composite.entries {
            let CompositeEntry::KeyValue(key, val) = entry else {
                self.error(entry_span(entry), DiagnosticKey::InvalidExpr, vec![]);
                ok = false;
                continue;
            };
            let key = self.entry_value(key, &map.key, true);
            let val = self.entry_value(val, &map.val, true);
            match (key, val) {
                (Some(k), Some(v)) => entries.push((k, v)),
                _ => ok = false,
            }
        }
        if !ok {
            return Value::invalid();
        }
        Value::new(
            kind.clone(),
            ExprModel::MapLit {
                key: (*map.key).clone(),
                val: (*map.val).clone(),
                entries,
            },
        )
    }

    fn struct_literal(&mut self, composite: &CompositeExpr<'_>, s: &StructKind) -> Value {
        let registry = self.registry;
        let Some(def) = registry.get_struct(s.decl) else {
            self.error(composite.span, DiagnosticKey::IdentNotExist, vec![s.name.clone()]);
            return Value::invalid();
        };
        let fields: Vec<(String, TypeKind, bool, bool)> = def
            .fields
            .iter()
            .map(|f| {
                (
                    f.name.clone(),
                    f.kind.substitute(&def.generics, &s.generics),
                    f.mutable,
                    f.has_default,
                )
            })
            .collect();

        let mut assigned: Vec<Option<ExprModel>> = vec![None; fields.len()];
        let mut named_seen = false;
        let mut positional = 0;
        let mut ok = true;
        for entry in composite.entries {
            match entry {
                CompositeEntry::Field(name, expr) => {
                    named_seen = true;
                    let Some(index) = fields.iter().position(|f| f.0 == name.name) else {
                        self.error(
                            name.span,
                            DiagnosticKey::ObjHaveNotIdent,
                            vec![s.name.clone(), name.name.to_string()],
                        );
                        self.eval_expr(expr, None);
                        ok = false;
                        continue;
                    };
                    if assigned[index].is_some() {
                        self.error(name.span, DiagnosticKey::AlreadyHasExpr, vec![name.name.to_string()]);
                        ok = false;
                        continue;
                    }
                    let (_, field_kind, mutable, _) = &fields[index];
                    match self.entry_value(expr, &field_kind.clone(), *mutable) {
                        Some(model) => assigned[index] = Some(model),
                        None => ok = false,
                    }
                }
                CompositeEntry::Positional(expr) => {
                    if named_seen {
                        self.error(expr.span(), DiagnosticKey::ArgumentMustTargetToParameter, vec![]);
                        ok = false;
                        continue;
                    }
                    if positional >= fields.len() {
                        self.error(expr.span(), DiagnosticKey::ArgumentOverflow, vec![fields.len().to_string()]);
                        ok = false;
                        continue;
                    }
                    let (_, field_kind, mutable, _) = &fields[positional];
                    match self.entry_value(expr, &field_kind.clone(), *mutable) {
                        Some(model) => assigned[positional] = Some(model),
                        None => ok = false,
                    }
                    positional += 1;
                }
                CompositeEntry::KeyValue(key, _) => {
                    self.error(key.span(), DiagnosticKey::InvalidExpr, vec![]);
                    ok = false;
                }
            }
        }

        // The positional form names every field that has no default.
        if positional > 0 && !named_seen {
            for (index, (name, _, _, has_default)) in fields.iter().enumerate() {
                if assigned[index].is_none() && !has_default {
                    self.error(composite.span, DiagnosticKey::MissingExprFor, vec![name.clone()]);
                    ok = false;
                }
            }
        }
        if !ok {
            return Value::invalid();
        }

        let fields = fields
            .into_iter()
            .zip(assigned)
            .filter_map(|((name, ..), model)| model.map(|m| (name, m)))
            .collect();
        Value::new(
            TypeKind::Struct(s.clone()),
            ExprModel::StructLit { decl: s.decl, fields },
        )
    }
}

fn entry_span(entry: &CompositeEntry<'_>) -> Span {
    match entry {
        CompositeEntry::Positional(expr) => expr.span(),
        CompositeEntry::Field(name, _) => name.span,
        CompositeEntry::KeyValue(key, _) => key.span(),
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use tern_ast::AstBuilder;
    use tern_core::{PrimKind, TypeHash};
    use tern_registry::{FieldDef, StructDef, SymbolRegistry};

    use super::*;
    use crate::expr::tests::with_checker;
    use crate::scope::ScopeFlags;

    fn field(name: &str, kind: TypeKind, has_default: bool) -> FieldDef {
        FieldDef {
            name: name.into(),
            kind,
            mutable: true,
            has_default,
            span: Span::default(),
        }
    }

    fn registry() -> SymbolRegistry {
        let mut registry = SymbolRegistry::new();
        let mut point = StructDef::new(TypeHash::from_decl(&[], "Point"), "Point", Span::default());
        point.fields = vec![
            field("x", TypeKind::int(), false),
            field("y", TypeKind::int(), false),
            field("label", PrimKind::Str.into(), true),
        ];
        registry.register_struct(point).unwrap();

        let mut cell = StructDef::new(TypeHash::from_decl(&[], "Cell"), "Cell", Span::default());
        cell.generics = vec!["T".into()];
        cell.fields = vec![field("value", TypeKind::Generic("T".into()), false)];
        registry.register_struct(cell).unwrap();
        registry
    }

    #[test]
    fn struct_literal_by_field() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let expr = b.struct_lit("Point", &[("y", b.int("2")), ("x", b.int("1"))]);
        let (value, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&expr, None));
        assert!(diagnostics.is_empty());
        let ExprModel::StructLit { fields, .. } = value.model else { panic!("expected a struct literal") };
        let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn struct_field_errors() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let unknown = b.struct_lit("Point", &[("z", b.int("1"))]);
        let twice = b.struct_lit("Point", &[("x", b.int("1")), ("x", b.int("2"))]);
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            c.eval_expr(&unknown, None);
            c.eval_expr(&twice, None);
        });
        assert!(diagnostics.contains(DiagnosticKey::ObjHaveNotIdent));
        assert!(diagnostics.contains(DiagnosticKey::AlreadyHasExpr));
    }

    #[test]
    fn positional_struct_literal_requires_fields() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let full = b.composite(
            Some(b.ty("Point")),
            &[CompositeEntry::Positional(b.int("1")), CompositeEntry::Positional(b.int("2"))],
        );
        let short = b.composite(Some(b.ty("Point")), &[CompositeEntry::Positional(b.int("1"))]);
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&full, None));
        assert!(diagnostics.is_empty());
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&short, None));
        assert_eq!(diagnostics.by_key(DiagnosticKey::MissingExprFor).next().unwrap().args, vec!["y"]);
    }

    #[test]
    fn generic_fields_substitute() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let ok = b.composite(
            Some(b.generic_ty("Cell", &[b.ty("str")])),
            &[CompositeEntry::Field(b.name("value"), b.string("x"))],
        );
        let bad = b.composite(
            Some(b.generic_ty("Cell", &[b.ty("str")])),
            &[CompositeEntry::Field(b.name("value"), b.int("1"))],
        );
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&ok, None));
        assert!(diagnostics.is_empty());
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&bad, None));
        assert!(diagnostics.contains(DiagnosticKey::IncompatibleTypes));
    }

    #[test]
    fn untyped_literal_infers_slice() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let expr = b.composite(
            None,
            &[CompositeEntry::Positional(b.int("1")), CompositeEntry::Positional(b.int("300"))],
        );
        let empty = b.composite(None, &[]);
        let (value, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            let value = c.eval_expr(&expr, None);
            c.eval_expr(&empty, None);
            value
        });
        assert_eq!(value.kind, Some(TypeKind::slice_of(TypeKind::int())));
        assert!(diagnostics.contains(DiagnosticKey::InvalidExpr));
    }

    #[test]
    fn array_literals_take_length() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let inferred = b.composite(
            Some(b.array_ty(b.ty("u8"), None)),
            &[CompositeEntry::Positional(b.int("1")), CompositeEntry::Positional(b.int("2"))],
        );
        let overflow = b.composite(
            Some(b.array_ty(b.ty("u8"), Some(b.int("1")))),
            &[CompositeEntry::Positional(b.int("1")), CompositeEntry::Positional(b.int("2"))],
        );
        let (value, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            let value = c.eval_expr(&inferred, None);
            c.eval_expr(&overflow, None);
            value
        });
        assert_eq!(value.kind, Some(TypeKind::array_of(PrimKind::U8.into(), 2)));
        assert!(diagnostics.contains(DiagnosticKey::ArgumentOverflow));
    }

    #[test]
    fn map_literal_checks_entries() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let expr = b.composite(
            Some(b.map_ty(b.ty("str"), b.ty("int"))),
            &[
                CompositeEntry::KeyValue(b.string("a"), b.int("1")),
                CompositeEntry::KeyValue(b.int("2"), b.int("2")),
            ],
        );
        let (value, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&expr, None));
        assert!(value.is_invalid());
        assert_eq!(diagnostics.count(DiagnosticKey::IncompatibleTypes), 1);
    }
}
