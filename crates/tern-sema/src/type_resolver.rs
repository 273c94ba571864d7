//! Resolution of written type expressions into [`TypeKind`]s.
//!
//! Names are looked up in this order: generic parameters in scope,
//! primitives, local type aliases, then the registry (aliases, structs,
//! traits, enums). `pkg::Name` looks only inside the imported package.

use tern_ast::{FnType, NamedType, ResultDecl, TypeExpr};
use tern_core::{Constant, DiagnosticKey, FnKind, ParamKind, PrimKind, StructKind, TraitKind, TypeKind};
use tern_registry::{Lookup, SymbolRegistry};

use crate::checker::Checker;

impl<'r> Checker<'r> {
    /// Resolve a type expression. `None` when a diagnostic was reported.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve_type(&mut self, ty: &TypeExpr<'_>) -> Option<TypeKind> {
        match ty {
            TypeExpr::Named(named) => self.resolve_named(named),
            TypeExpr::Ptr(None, _) => Some(TypeKind::Ptr(None)),
            TypeExpr::Ptr(Some(elem), _) => Some(TypeKind::ptr_to(self.resolve_type(elem)?)),
            TypeExpr::Ref(elem, _) => Some(TypeKind::ref_to(self.resolve_type(elem)?)),
            TypeExpr::Slice(elem, _) => Some(TypeKind::slice_of(self.resolve_type(elem)?)),
            TypeExpr::Array(array) => {
                let elem = self.resolve_type(&array.elem)?;
                let Some(len_expr) = array.len else {
                    self.error(array.span, DiagnosticKey::ArrayLenNotConstant, vec![]);
                    return None;
                };
                let len = self.eval_expr(len_expr, Some(&TypeKind::int()));
                match len.constant.as_ref().and_then(Constant::as_i128) {
                    Some(n) if n >= 0 => Some(TypeKind::array_of(elem, n as usize)),
                    _ => {
                        if !len.is_invalid() {
                            self.error(len_expr.span(), DiagnosticKey::ArrayLenNotConstant, vec![]);
                        }
                        None
                    }
                }
            }
            TypeExpr::Map(map) => {
                let key = self.resolve_type(&map.key)?;
                let val = self.resolve_type(&map.val)?;
                Some(TypeKind::map_of(key, val))
            }
            TypeExpr::Fn(func) => Some(TypeKind::Fn(Box::new(self.resolve_fn_type(func)?))),
            TypeExpr::Tuple(parts, _) => {
                let kinds = parts
                    .iter()
                    .map(|p| self.resolve_type(p))
                    .collect::<Option<Vec<_>>>()?;
                Some(TypeKind::Tuple(kinds))
            }
        }
    }

    /// Resolve a declared result: `Some(None)` for no result, a tuple for
    /// several.
    pub(crate) fn resolve_result(&mut self, result: Option<&ResultDecl<'_>>) -> Option<Option<TypeKind>> {
        let Some(result) = result else {
            return Some(None);
        };
        let mut kinds = Vec::with_capacity(result.types.len());
        for ty in result.types {
            kinds.push(self.resolve_type(ty)?);
        }
        Some(match kinds.len() {
            0 => None,
            1 => kinds.pop(),
            _ => Some(TypeKind::Tuple(kinds)),
        })
    }

    fn resolve_fn_type(&mut self, func: &FnType<'_>) -> Option<FnKind> {
        let mut params = Vec::with_capacity(func.params.len());
        for param in func.params {
            params.push(ParamKind {
                kind: self.resolve_type(&param.ty)?,
                mutable: param.mutable,
                variadic: param.variadic,
                reference: param.reference,
            });
        }
        Some(FnKind {
            params,
            result: self.resolve_result(func.result.as_ref())?,
            unsafety: func.unsafety,
        })
    }

    fn resolve_named(&mut self, named: &NamedType<'_>) -> Option<TypeKind> {
        let name = named.name.name;
        if let Some(package) = named.package {
            let registry = self.registry;
            let Some(pkg) = registry.find_package(package.name) else {
                self.error(package.span, DiagnosticKey::IdentNotExist, vec![package.name.to_string()]);
                return None;
            };
            return self.resolve_in_registry(&pkg.registry, named);
        }

        if self.generics.iter().any(|g| g == name) {
            self.require_no_generics(named, 0)?;
            return Some(TypeKind::Generic(name.to_string()));
        }
        if let Some(prim) = PrimKind::from_name(name) {
            self.require_no_generics(named, 0)?;
            return Some(TypeKind::Prim(prim));
        }
        if let Some(kind) = self.tree.use_alias(self.current, name) {
            self.require_no_generics(named, 0)?;
            return Some(kind);
        }
        let registry = self.registry;
        self.resolve_in_registry(registry, named)
    }

    fn resolve_in_registry(&mut self, registry: &SymbolRegistry, named: &NamedType<'_>) -> Option<TypeKind> {
        let name = named.name.name;
        let cpp = named.cpp_linked;
        if let Some(alias) = registry.find_type_alias(name, cpp) {
            let kind = alias.kind.clone();
            self.require_no_generics(named, 0)?;
            return Some(kind);
        }
        if let Some(def) = registry.find_struct(name, cpp) {
            let (hash, def_name, expected) = (def.hash, def.name.clone(), def.generics.len());
            self.require_no_generics(named, expected)?;
            let generics = named
                .generics
                .iter()
                .map(|g| self.resolve_type(g))
                .collect::<Option<Vec<_>>>()?;
            return Some(TypeKind::Struct(StructKind {
                decl: hash,
                name: def_name,
                generics,
            }));
        }
        if let Some(def) = registry.find_trait(name, cpp) {
            let kind = TypeKind::Trait(TraitKind {
                decl: def.hash,
                name: def.name.clone(),
            });
            self.require_no_generics(named, 0)?;
            return Some(kind);
        }
        if let Some(def) = registry.find_enum(name, cpp) {
            let kind = def.kind();
            self.require_no_generics(named, 0)?;
            return Some(kind);
        }
        self.error(named.name.span, DiagnosticKey::IdentNotExist, vec![name.to_string()]);
        None
    }

    /// Check the number of written generic arguments.
    fn require_no_generics(&mut self, named: &NamedType<'_>, expected: usize) -> Option<()> {
        if named.generics.len() == expected {
            return Some(());
        }
        self.error(
            named.span,
            DiagnosticKey::GenericsCountMismatch,
            vec![named.name.name.to_string(), expected.to_string()],
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use tern_ast::AstBuilder;
    use tern_core::{Diagnostics, Span, TypeHash};
    use tern_registry::{FieldDef, StructDef};

    use super::*;
    use crate::config::SemaConfig;
    use crate::scope::LocalAlias;

    fn registry() -> SymbolRegistry {
        let mut registry = SymbolRegistry::new();
        let mut def = StructDef::new(TypeHash::from_decl(&[], "Box"), "Box", Span::default());
        def.generics = vec!["T".into()];
        def.fields.push(FieldDef {
            name: "value".into(),
            kind: TypeKind::Generic("T".into()),
            mutable: true,
            has_default: false,
            span: Span::default(),
        });
        registry.register_struct(def).unwrap();
        registry
    }

    #[test]
    fn composite_types_resolve() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let config = SemaConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut checker = Checker::new(&registry, &config, &mut diagnostics);

        let ty = b.map_ty(b.ty("str"), b.slice_ty(b.generic_ty("Box", &[b.ty("byte")])));
        let kind = checker.resolve_type(&ty).unwrap();
        assert_eq!(kind.to_string(), "[str:[]Box[u8]]");

        let array = b.array_ty(b.ty("int"), Some(b.binary(b.int("2"), tern_core::BinaryOp::Mul, b.int("3"))));
        assert_eq!(checker.resolve_type(&array), Some(TypeKind::array_of(TypeKind::int(), 6)));
    }

    #[test]
    fn generic_count_is_checked() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let config = SemaConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut checker = Checker::new(&registry, &config, &mut diagnostics);
        assert!(checker.resolve_type(&b.ty("Box")).is_none());
        assert!(checker.resolve_type(&b.ty("Missing")).is_none());
        drop(checker);
        assert!(diagnostics.contains(DiagnosticKey::GenericsCountMismatch));
        assert!(diagnostics.contains(DiagnosticKey::IdentNotExist));
    }

    #[test]
    fn local_alias_is_marked_used() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let config = SemaConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut checker = Checker::new(&registry, &config, &mut diagnostics);
        let root = checker.current;
        checker.tree.declare_alias(
            root,
            LocalAlias {
                name: "Bytes".into(),
                kind: TypeKind::slice_of(PrimKind::U8.into()),
                used: false,
                span: Span::default(),
            },
        );
        assert_eq!(
            checker.resolve_type(&b.ty("Bytes")),
            Some(TypeKind::slice_of(PrimKind::U8.into()))
        );
        assert!(checker.tree.unused_in(root).is_empty());
    }

    #[test]
    fn negative_array_length_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let config = SemaConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut checker = Checker::new(&registry, &config, &mut diagnostics);
        let ty = b.array_ty(b.ty("int"), Some(b.int("-1")));
        assert!(checker.resolve_type(&ty).is_none());
        drop(checker);
        assert!(diagnostics.contains(DiagnosticKey::ArrayLenNotConstant));
    }
}
