//! Registration pass - build the symbol registry of a compilation unit.
//!
//! The pass walks the unit's items twice. The first walk claims every global
//! name (structs, traits, enums, type aliases, functions) so declarations
//! may refer to each other regardless of source order. The second walk
//! resolves what the names stand for:
//!
//! 1. type aliases
//! 2. enums (underlying kind and item values), traits, struct fields
//! 3. function signatures and `impl` blocks
//! 4. trait conformance of every `impl Trait for S`
//! 5. global variables, in source order
//!
//! Type expressions go through the same [`Checker`] resolution used inside
//! bodies, so written types produce the same diagnostics everywhere.

use tern_ast::{
    CompilationUnit, EnumDecl, Expr, FnDecl, ImplDecl, Item, Stmt, StructDecl, TraitDecl, TypeAliasDecl,
    TypeExpr, VarDecl,
};
use tern_core::{Constant, DiagnosticKey, Diagnostics, PrimKind, RegistryError, Span, TypeHash, TypeKind};
use tern_registry::{
    EnumDef, EnumItem, FieldDef, FnDef, GlobalVar, Lookup, ParamDef, ReceiverDef, StructDef, SymbolRegistry,
    TraitDef, TraitMethod, TypeAliasDef,
};

use crate::checker::Checker;
use crate::config::SemaConfig;
use crate::eval::constant::int_const;
use crate::typed::{TypedGlobal, TypedStmt};

fn any() -> TypeKind {
    TypeKind::Prim(PrimKind::Any)
}

fn path(cpp_linked: bool) -> &'static [&'static str] {
    if cpp_linked { &["cpp"] } else { &[] }
}

/// Output of the registration pass.
#[derive(Debug)]
pub struct Registration<'ast> {
    pub registry: SymbolRegistry,
    /// Global variables with their checked initializers, in source order.
    pub globals: Vec<TypedGlobal>,
    /// Registered functions and methods with their declarations, in source
    /// order. Declarations rejected as duplicates are not listed.
    pub functions: Vec<(TypeHash, &'ast FnDecl<'ast>)>,
}

/// Declares every item of a unit into a [`SymbolRegistry`].
pub struct RegistrationPass<'a, 'ast> {
    registry: SymbolRegistry,
    config: &'a SemaConfig,
    diagnostics: &'a mut Diagnostics,
    functions: Vec<(TypeHash, &'ast FnDecl<'ast>)>,
    /// `(struct, trait, impl span)` to verify once every method is known.
    impls: Vec<(TypeHash, TypeHash, Span)>,
    globals: Vec<TypedGlobal>,
}

impl<'a, 'ast> RegistrationPass<'a, 'ast> {
    /// Create a pass over `registry`, which may already hold imported
    /// packages.
    pub fn new(registry: SymbolRegistry, config: &'a SemaConfig, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            registry,
            config,
            diagnostics,
            functions: Vec::new(),
            impls: Vec::new(),
            globals: Vec::new(),
        }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, unit: &CompilationUnit<'ast>) -> Registration<'ast> {
        let declared: Vec<Item<'ast>> = unit
            .items
            .iter()
            .copied()
            .filter(|item| self.declare_name(item))
            .collect();

        for item in &declared {
            if let Item::TypeAlias(decl) = *item {
                self.resolve_alias(decl);
            }
        }
        for item in &declared {
            match *item {
                Item::Enum(decl) => self.resolve_enum(decl),
                Item::Trait(decl) => self.resolve_trait(decl),
                Item::Struct(decl) => self.resolve_struct(decl),
                _ => {}
            }
        }
        for item in &declared {
            match *item {
                Item::Fn(decl) => self.resolve_fn(decl),
                Item::Impl(decl) => self.register_impl(decl),
                _ => {}
            }
        }
        self.verify_impls();
        for item in &declared {
            if let Item::Var(decl) = *item {
                self.register_global(decl);
            }
        }

        log::debug!(
            "registered {} items, {} functions, {} globals",
            declared.len(),
            self.functions.len(),
            self.globals.len()
        );
        Registration {
            registry: self.registry,
            globals: self.globals,
            functions: self.functions,
        }
    }

    // ==========================================================================
    // Names
    // ==========================================================================

    /// Claim the item's global name. `false` when it is already taken.
    fn declare_name(&mut self, item: &Item<'ast>) -> bool {
        let result = match *item {
            Item::Struct(decl) => {
                let name = decl.name.name;
                let hash = TypeHash::from_decl(path(decl.cpp_linked), name);
                let mut def = StructDef::new(hash, name, decl.name.span);
                def.generics = decl.generics.iter().map(|g| g.name.to_string()).collect();
                def.cpp_linked = decl.cpp_linked;
                self.registry.register_struct(def).map(drop)
            }
            Item::Trait(decl) => self
                .registry
                .register_trait(TraitDef {
                    hash: TypeHash::from_decl(&[], decl.name.name),
                    name: decl.name.name.to_string(),
                    inherits: Vec::new(),
                    methods: Vec::new(),
                    span: decl.name.span,
                })
                .map(drop),
            Item::Enum(decl) => self
                .registry
                .register_enum(EnumDef {
                    hash: TypeHash::from_decl(&[], decl.name.name),
                    name: decl.name.name.to_string(),
                    underlying: PrimKind::Int,
                    items: Vec::new(),
                    span: decl.name.span,
                })
                .map(drop),
            Item::TypeAlias(decl) => self
                .registry
                .register_type_alias(TypeAliasDef {
                    name: decl.name.name.to_string(),
                    kind: any(),
                    span: decl.name.span,
                })
                .map(drop),
            Item::Fn(decl) => {
                let hash = TypeHash::from_function(path(decl.cpp_linked), decl.name.name);
                let mut def = FnDef::new(hash, decl.name.name, decl.name.span);
                def.cpp_linked = decl.cpp_linked;
                self.registry.register_fn(def).map(drop)
            }
            Item::Impl(_) | Item::Var(_) => Ok(()),
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                self.registry_error(err);
                false
            }
        }
    }

    fn registry_error(&mut self, err: RegistryError) {
        match err {
            RegistryError::Duplicate { name, span } => {
                self.diagnostics.error(span, DiagnosticKey::DuplicatedIdent, vec![name]);
            }
            RegistryError::UnknownOwner { name, span } => {
                self.diagnostics.error(span, DiagnosticKey::IdentNotExist, vec![name]);
            }
            RegistryError::DuplicatePackage { name } => {
                self.diagnostics
                    .error(Span::default(), DiagnosticKey::DuplicatedIdent, vec![name]);
            }
        }
    }

    /// Run `f` with a checker over the registry built so far.
    fn with_checker<T>(&mut self, generics: &[String], f: impl FnOnce(&mut Checker<'_>) -> T) -> T {
        let mut checker = Checker::new(&self.registry, self.config, self.diagnostics);
        checker.generics = generics.to_vec();
        f(&mut checker)
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    fn resolve_alias(&mut self, decl: &TypeAliasDecl<'ast>) {
        let kind = self.with_checker(&[], |checker| checker.resolve_type(&decl.ty));
        if let (Some(kind), Some(alias)) = (kind, self.registry.alias_mut(decl.name.name)) {
            alias.kind = kind;
        }
    }

    fn resolve_enum(&mut self, decl: &EnumDecl<'ast>) {
        let name = decl.name.name;
        let underlying = match &decl.underlying {
            None => PrimKind::Int,
            Some(ty) => match self.with_checker(&[], |checker| checker.resolve_type(ty)) {
                Some(TypeKind::Prim(prim)) if prim.is_integer() => prim,
                Some(other) => {
                    self.diagnostics.error(
                        ty.span(),
                        DiagnosticKey::InvalidTypeForEnum,
                        vec![name.to_string(), other.to_string()],
                    );
                    PrimKind::Int
                }
                None => PrimKind::Int,
            },
        };

        let width = self.config.int_width;
        let mut items: Vec<EnumItem> = Vec::with_capacity(decl.items.len());
        let mut next: i128 = 0;
        for item in decl.items {
            let item_name = item.name.name;
            if items.iter().any(|i| i.name == item_name) {
                self.diagnostics
                    .error(item.name.span, DiagnosticKey::DuplicatedIdent, vec![item_name.to_string()]);
                continue;
            }
            let value = match &item.value {
                Some(expr) => self.enum_value(expr, underlying).unwrap_or(next),
                None => {
                    if !underlying.fits_int(next, width) {
                        self.diagnostics.error(
                            item.name.span,
                            DiagnosticKey::OverflowLimits,
                            vec![next.to_string(), underlying.name().to_string()],
                        );
                    }
                    next
                }
            };
            items.push(EnumItem {
                name: item_name.to_string(),
                value: int_const(value, underlying),
                span: item.name.span,
            });
            next = value + 1;
        }

        if let Some(def) = self.registry.enum_mut(TypeHash::from_decl(&[], name)) {
            def.underlying = underlying;
            def.items = items;
        }
    }

    /// Value of an explicitly valued enum item. `None` when a diagnostic was
    /// reported.
    fn enum_value(&mut self, expr: &Expr<'ast>, underlying: PrimKind) -> Option<i128> {
        self.with_checker(&[], |checker| {
            let kind = TypeKind::Prim(underlying);
            let value = checker.eval_single(expr, Some(&kind));
            if value.is_invalid() {
                return None;
            }
            if value.constant.is_none() {
                checker.error(expr.span(), DiagnosticKey::ExprNotConst, vec![]);
                return None;
            }
            if !checker.check_value_against(&kind, &value, expr.span()) {
                return None;
            }
            value.constant.as_ref().and_then(Constant::as_i128)
        })
    }

    fn resolve_trait(&mut self, decl: &TraitDecl<'ast>) {
        let hash = TypeHash::from_decl(&[], decl.name.name);
        let inherits = self.with_checker(&[], |checker| {
            decl.inherits
                .iter()
                .filter_map(|named| match checker.resolve_type(&TypeExpr::Named(*named))? {
                    TypeKind::Trait(parent) => Some(parent.decl),
                    other => {
                        checker.error(named.span, DiagnosticKey::IdentNotExist, vec![other.to_string()]);
                        None
                    }
                })
                .collect::<Vec<_>>()
        });

        let mut methods: Vec<TraitMethod> = Vec::with_capacity(decl.methods.len());
        for method in decl.methods {
            let method_name = method.name.name;
            if methods.iter().any(|m| m.name == method_name) {
                self.diagnostics
                    .error(method.name.span, DiagnosticKey::DuplicatedIdent, vec![method_name.to_string()]);
                continue;
            }
            let def = self.build_fn(method, TypeHash::from_method(hash, method_name), &[]);
            methods.push(TraitMethod {
                name: method_name.to_string(),
                kind: def.kind(),
                reference_receiver: method.receiver.is_some_and(|r| r.reference),
            });
        }

        if let Some(def) = self.registry.trait_mut(hash) {
            def.inherits = inherits;
            def.methods = methods;
        }
    }

    fn resolve_struct(&mut self, decl: &StructDecl<'ast>) {
        let hash = TypeHash::from_decl(path(decl.cpp_linked), decl.name.name);
        let generics: Vec<String> = decl.generics.iter().map(|g| g.name.to_string()).collect();
        let fields = self.with_checker(&generics, |checker| {
            let mut fields: Vec<FieldDef> = Vec::with_capacity(decl.fields.len());
            for field in decl.fields {
                let name = field.name.name;
                if fields.iter().any(|f| f.name == name) {
                    checker.error(field.name.span, DiagnosticKey::DuplicatedIdent, vec![name.to_string()]);
                    continue;
                }
                let kind = checker.resolve_type(&field.ty);
                if let (Some(kind), Some(default)) = (&kind, &field.default) {
                    let value = checker.eval_single(default, Some(kind));
                    checker.check_value_against(kind, &value, default.span());
                }
                fields.push(FieldDef {
                    name: name.to_string(),
                    kind: kind.unwrap_or_else(any),
                    mutable: field.mutable,
                    has_default: field.default.is_some(),
                    span: field.span,
                });
            }
            fields
        });
        if let Some(def) = self.registry.struct_mut(hash) {
            def.fields = fields;
        }
    }

    // ==========================================================================
    // Functions
    // ==========================================================================

    /// Resolve a function signature. Unresolvable kinds become `any` so
    /// calls do not cascade into further errors.
    fn build_fn(&mut self, decl: &FnDecl<'ast>, hash: TypeHash, generics: &[String]) -> FnDef {
        let (params, result) = self.with_checker(generics, |checker| {
            let params: Vec<ParamDef> = decl
                .params
                .iter()
                .map(|p| ParamDef {
                    name: p.name.map(|n| n.name.to_string()),
                    kind: checker.resolve_type(&p.ty).unwrap_or_else(any),
                    mutable: p.mutable,
                    variadic: p.variadic,
                    reference: p.reference,
                    has_default: p.default.is_some(),
                })
                .collect();
            let result = checker.resolve_result(decl.result.as_ref()).unwrap_or(Some(any()));
            (params, result)
        });

        let mut def = FnDef::new(hash, decl.name.name, decl.name.span);
        def.receiver = decl.receiver.map(|r| ReceiverDef {
            reference: r.reference,
            mutable: r.mutable,
        });
        def.params = params;
        def.result = result;
        def.result_names = decl
            .result
            .map(|r| r.names.iter().map(|n| n.name.to_string()).collect())
            .unwrap_or_default();
        def.unsafety = decl.unsafety;
        def.cpp_linked = decl.cpp_linked;
        def
    }

    fn resolve_fn(&mut self, decl: &'ast FnDecl<'ast>) {
        let hash = TypeHash::from_function(path(decl.cpp_linked), decl.name.name);
        let mut def = self.build_fn(decl, hash, &[]);
        def.receiver = None;
        if let Some(slot) = self.registry.fn_mut(hash) {
            *slot = def;
        }
        self.functions.push((hash, decl));
    }

    fn register_impl(&mut self, decl: &'ast ImplDecl<'ast>) {
        let target = decl.target.name;
        let Some((owner, generics)) = self
            .registry
            .find_struct(target, false)
            .map(|def| (def.hash, def.generics.clone()))
        else {
            self.diagnostics
                .error(decl.target.span, DiagnosticKey::IdentNotExist, vec![target.to_string()]);
            return;
        };

        if let Some(named) = &decl.trait_ {
            match self.with_checker(&[], |checker| checker.resolve_type(&TypeExpr::Named(*named))) {
                Some(TypeKind::Trait(tr)) => {
                    if let Some(def) = self.registry.struct_mut(owner) {
                        if !def.traits.contains(&tr.decl) {
                            def.traits.push(tr.decl);
                        }
                    }
                    self.impls.push((owner, tr.decl, decl.span));
                }
                Some(other) => {
                    self.diagnostics
                        .error(named.span, DiagnosticKey::IdentNotExist, vec![other.to_string()]);
                }
                None => {}
            }
        }

        for method in decl.methods {
            let hash = TypeHash::from_method(owner, method.name.name);
            let mut def = self.build_fn(method, hash, &generics);
            def.owner = Some(owner);
            match self.registry.register_fn(def) {
                Ok(_) => self.functions.push((hash, method)),
                Err(err) => self.registry_error(err),
            }
        }
    }

    /// Report trait methods an `impl Trait for S` block left out, including
    /// those of inherited traits.
    fn verify_impls(&mut self) {
        for (owner, trait_hash, span) in std::mem::take(&mut self.impls) {
            let Some(def) = self.registry.get_struct(owner) else {
                continue;
            };
            let struct_name = def.name.clone();
            for (method, trait_name) in self.missing_methods(def, trait_hash) {
                self.diagnostics.error(
                    span,
                    DiagnosticKey::NotImplTraitDef,
                    vec![struct_name.clone(), method, trait_name],
                );
            }
        }
    }

    fn missing_methods(&self, def: &StructDef, trait_hash: TypeHash) -> Vec<(String, String)> {
        let registry = &self.registry;
        let mut pending = vec![trait_hash];
        let mut seen = Vec::new();
        let mut missing = Vec::new();
        while let Some(hash) = pending.pop() {
            if seen.contains(&hash) {
                continue;
            }
            seen.push(hash);
            let Some(tr) = registry.get_trait(hash) else {
                continue;
            };
            pending.extend(tr.inherits.iter().copied());
            for method in &tr.methods {
                let implemented = def
                    .method(&method.name)
                    .and_then(|h| registry.get_fn(h))
                    .is_some_and(|f| {
                        f.kind() == method.kind
                            && f.receiver.is_some_and(|r| r.reference == method.reference_receiver)
                    });
                if !implemented {
                    missing.push((method.name.clone(), tr.name.clone()));
                }
            }
        }
        missing
    }

    // ==========================================================================
    // Globals
    // ==========================================================================

    /// Check a global declaration like a local one and register the
    /// resulting binding.
    fn register_global(&mut self, decl: &'ast VarDecl<'ast>) {
        let (stmt, local) = self.with_checker(&[], |checker| {
            let stmt = checker.check_stmt(&Stmt::VarDecl(decl));
            let local = match &stmt {
                TypedStmt::Var { local: Some(id), .. } => Some(checker.tree().local(*id).clone()),
                _ => None,
            };
            (stmt, local)
        });
        let (TypedStmt::Var { init, .. }, Some(local)) = (stmt, local) else {
            return;
        };

        let var = GlobalVar {
            name: local.name.clone(),
            kind: local.kind.clone(),
            mutable: local.mutable,
            constant: local.constant.clone(),
            cpp_linked: false,
            span: decl.name.span,
        };
        match self.registry.register_var(var) {
            Ok(_) => self.globals.push(TypedGlobal {
                name: local.name,
                kind: local.kind,
                init,
            }),
            Err(err) => self.registry_error(err),
        }
    }
}
