//! SymbolRegistry - declarations visible outside function bodies.
//!
//! Structs, traits, enums and functions are stored by [`TypeHash`]; global
//! variables and type aliases by name. A single name index per linkage
//! (native or cpp-linked) keeps global names unique. Imported packages are
//! nested registries reachable through [`Lookup::find_package`].
//!
//! The registry is populated by the registration pass and read-only while
//! function bodies are analyzed.

use rustc_hash::FxHashMap;

use tern_core::{RegistryError, Span, TypeHash};

use crate::entries::{EnumDef, FnDef, GlobalVar, StructDef, TraitDef, TypeAliasDef};

/// What a global name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Var(usize),
    TypeAlias(usize),
    Struct(TypeHash),
    Trait(TypeHash),
    Enum(TypeHash),
    Fn(TypeHash),
}

/// An imported package.
#[derive(Debug, Default)]
pub struct Package {
    pub name: String,
    pub registry: SymbolRegistry,
}

/// Identifier resolution outside the current function body.
pub trait Lookup {
    fn find_package(&self, ident: &str) -> Option<&Package>;
    fn find_var(&self, ident: &str, cpp_linked: bool) -> Option<&GlobalVar>;
    fn find_type_alias(&self, ident: &str, cpp_linked: bool) -> Option<&TypeAliasDef>;
    fn find_struct(&self, ident: &str, cpp_linked: bool) -> Option<&StructDef>;
    fn find_fn(&self, ident: &str, cpp_linked: bool) -> Option<&FnDef>;
    fn find_trait(&self, ident: &str, cpp_linked: bool) -> Option<&TraitDef>;
    fn find_enum(&self, ident: &str, cpp_linked: bool) -> Option<&EnumDef>;
}

#[derive(Debug, Default)]
pub struct SymbolRegistry {
    structs: FxHashMap<TypeHash, StructDef>,
    traits: FxHashMap<TypeHash, TraitDef>,
    enums: FxHashMap<TypeHash, EnumDef>,
    fns: FxHashMap<TypeHash, FnDef>,
    vars: Vec<GlobalVar>,
    aliases: Vec<TypeAliasDef>,
    /// `(name, cpp_linked)` to symbol.
    names: FxHashMap<(String, bool), Symbol>,
    packages: FxHashMap<String, Package>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    fn claim(&mut self, name: &str, cpp_linked: bool, span: Span, symbol: Symbol) -> Result<(), RegistryError> {
        let key = (name.to_string(), cpp_linked);
        if self.names.contains_key(&key) {
            return Err(RegistryError::Duplicate {
                name: name.to_string(),
                span,
            });
        }
        self.names.insert(key, symbol);
        Ok(())
    }

    pub fn register_struct(&mut self, def: StructDef) -> Result<TypeHash, RegistryError> {
        let hash = def.hash;
        self.claim(&def.name, def.cpp_linked, def.span, Symbol::Struct(hash))?;
        self.structs.insert(hash, def);
        Ok(hash)
    }

    pub fn register_trait(&mut self, def: TraitDef) -> Result<TypeHash, RegistryError> {
        let hash = def.hash;
        self.claim(&def.name, false, def.span, Symbol::Trait(hash))?;
        self.traits.insert(hash, def);
        Ok(hash)
    }

    pub fn register_enum(&mut self, def: EnumDef) -> Result<TypeHash, RegistryError> {
        let hash = def.hash;
        self.claim(&def.name, false, def.span, Symbol::Enum(hash))?;
        self.enums.insert(hash, def);
        Ok(hash)
    }

    /// Register a free function, or a method when `def.owner` is set.
    ///
    /// Methods are not globally named; they are attached to their struct.
    pub fn register_fn(&mut self, def: FnDef) -> Result<TypeHash, RegistryError> {
        let hash = def.hash;
        match def.owner {
            Some(owner) => {
                let Some(owner_def) = self.structs.get_mut(&owner) else {
                    return Err(RegistryError::UnknownOwner {
                        name: def.name.clone(),
                        span: def.span,
                    });
                };
                if owner_def.method(&def.name).is_some()
                    || owner_def.field(&def.name).is_some()
                {
                    return Err(RegistryError::Duplicate {
                        name: def.name.clone(),
                        span: def.span,
                    });
                }
                owner_def.methods.push((def.name.clone(), hash));
            }
            None => self.claim(&def.name, def.cpp_linked, def.span, Symbol::Fn(hash))?,
        }
        self.fns.insert(hash, def);
        Ok(hash)
    }

    pub fn register_var(&mut self, var: GlobalVar) -> Result<usize, RegistryError> {
        let index = self.vars.len();
        self.claim(&var.name, var.cpp_linked, var.span, Symbol::Var(index))?;
        self.vars.push(var);
        Ok(index)
    }

    pub fn register_type_alias(&mut self, alias: TypeAliasDef) -> Result<usize, RegistryError> {
        let index = self.aliases.len();
        self.claim(&alias.name, false, alias.span, Symbol::TypeAlias(index))?;
        self.aliases.push(alias);
        Ok(index)
    }

    pub fn add_package(&mut self, name: impl Into<String>, registry: SymbolRegistry) -> Result<(), RegistryError> {
        let name = name.into();
        if self.packages.contains_key(&name) {
            return Err(RegistryError::DuplicatePackage { name });
        }
        self.packages.insert(name.clone(), Package { name, registry });
        Ok(())
    }

    // ==========================================================================
    // Mutation after registration
    // ==========================================================================

    pub fn struct_mut(&mut self, hash: TypeHash) -> Option<&mut StructDef> {
        self.structs.get_mut(&hash)
    }

    pub fn trait_mut(&mut self, hash: TypeHash) -> Option<&mut TraitDef> {
        self.traits.get_mut(&hash)
    }

    pub fn enum_mut(&mut self, hash: TypeHash) -> Option<&mut EnumDef> {
        self.enums.get_mut(&hash)
    }

    pub fn fn_mut(&mut self, hash: TypeHash) -> Option<&mut FnDef> {
        self.fns.get_mut(&hash)
    }

    pub fn var_mut(&mut self, name: &str, cpp_linked: bool) -> Option<&mut GlobalVar> {
        match self.names.get(&(name.to_string(), cpp_linked)) {
            Some(Symbol::Var(index)) => self.vars.get_mut(*index),
            _ => None,
        }
    }

    pub fn alias_mut(&mut self, name: &str) -> Option<&mut TypeAliasDef> {
        match self.names.get(&(name.to_string(), false)) {
            Some(Symbol::TypeAlias(index)) => self.aliases.get_mut(*index),
            _ => None,
        }
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    pub fn symbol(&self, name: &str, cpp_linked: bool) -> Option<Symbol> {
        self.names.get(&(name.to_string(), cpp_linked)).copied()
    }

    /// Struct by hash, searching imported packages as well.
    pub fn get_struct(&self, hash: TypeHash) -> Option<&StructDef> {
        self.structs
            .get(&hash)
            .or_else(|| self.packages.values().find_map(|p| p.registry.get_struct(hash)))
    }

    pub fn get_trait(&self, hash: TypeHash) -> Option<&TraitDef> {
        self.traits
            .get(&hash)
            .or_else(|| self.packages.values().find_map(|p| p.registry.get_trait(hash)))
    }

    pub fn get_enum(&self, hash: TypeHash) -> Option<&EnumDef> {
        self.enums
            .get(&hash)
            .or_else(|| self.packages.values().find_map(|p| p.registry.get_enum(hash)))
    }

    pub fn get_fn(&self, hash: TypeHash) -> Option<&FnDef> {
        self.fns
            .get(&hash)
            .or_else(|| self.packages.values().find_map(|p| p.registry.get_fn(hash)))
    }

    /// Whether trait `child` is `ancestor` or inherits from it.
    pub fn trait_inherits(&self, child: TypeHash, ancestor: TypeHash) -> bool {
        let mut stack = vec![child];
        let mut seen = Vec::new();
        while let Some(hash) = stack.pop() {
            if hash == ancestor {
                return true;
            }
            if seen.contains(&hash) {
                continue;
            }
            seen.push(hash);
            if let Some(def) = self.get_trait(hash) {
                stack.extend(def.inherits.iter().copied());
            }
        }
        false
    }

    pub fn structs(&self) -> impl Iterator<Item = &StructDef> {
        self.structs.values()
    }

    pub fn fns(&self) -> impl Iterator<Item = &FnDef> {
        self.fns.values()
    }

    pub fn vars(&self) -> &[GlobalVar] {
        &self.vars
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }
}

impl Lookup for SymbolRegistry {
    fn find_package(&self, ident: &str) -> Option<&Package> {
        self.packages.get(ident)
    }

    fn find_var(&self, ident: &str, cpp_linked: bool) -> Option<&GlobalVar> {
        match self.symbol(ident, cpp_linked)? {
            Symbol::Var(index) => self.vars.get(index),
            _ => None,
        }
    }

    fn find_type_alias(&self, ident: &str, cpp_linked: bool) -> Option<&TypeAliasDef> {
        match self.symbol(ident, cpp_linked)? {
            Symbol::TypeAlias(index) => self.aliases.get(index),
            _ => None,
        }
    }

    fn find_struct(&self, ident: &str, cpp_linked: bool) -> Option<&StructDef> {
        match self.symbol(ident, cpp_linked)? {
            Symbol::Struct(hash) => self.structs.get(&hash),
            _ => None,
        }
    }

    fn find_fn(&self, ident: &str, cpp_linked: bool) -> Option<&FnDef> {
        match self.symbol(ident, cpp_linked)? {
            Symbol::Fn(hash) => self.fns.get(&hash),
            _ => None,
        }
    }

    fn find_trait(&self, ident: &str, cpp_linked: bool) -> Option<&TraitDef> {
        match self.symbol(ident, cpp_linked)? {
            Symbol::Trait(hash) => self.traits.get(&hash),
            _ => None,
        }
    }

    fn find_enum(&self, ident: &str, cpp_linked: bool) -> Option<&EnumDef> {
        match self.symbol(ident, cpp_linked)? {
            Symbol::Enum(hash) => self.enums.get(&hash),
            _ => None,
        }
    }
}
