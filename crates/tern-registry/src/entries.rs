//! Registered declaration entries.
//!
//! Entries hold fully resolved [`TypeKind`]s. They are produced by the
//! registration pass (or by whoever supplies an imported package) and are
//! read-only during function analysis.

use tern_core::{Constant, FnKind, ParamKind, PrimKind, Span, TypeHash, TypeKind};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub kind: TypeKind,
    pub mutable: bool,
    pub has_default: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub hash: TypeHash,
    pub name: String,
    /// Generic parameter names, in declaration order.
    pub generics: Vec<String>,
    pub fields: Vec<FieldDef>,
    /// Traits the struct implements.
    pub traits: Vec<TypeHash>,
    /// Method name to function hash.
    pub methods: Vec<(String, TypeHash)>,
    pub cpp_linked: bool,
    pub span: Span,
}

impl StructDef {
    pub fn new(hash: TypeHash, name: impl Into<String>, span: Span) -> Self {
        Self {
            hash,
            name: name.into(),
            generics: Vec::new(),
            fields: Vec::new(),
            traits: Vec::new(),
            methods: Vec::new(),
            cpp_linked: false,
            span,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<TypeHash> {
        self.methods
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, hash)| *hash)
    }

    pub fn implements(&self, trait_hash: TypeHash) -> bool {
        self.traits.contains(&trait_hash)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitMethod {
    pub name: String,
    pub kind: FnKind,
    /// Declared with a `&self` receiver.
    pub reference_receiver: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitDef {
    pub hash: TypeHash,
    pub name: String,
    pub inherits: Vec<TypeHash>,
    pub methods: Vec<TraitMethod>,
    pub span: Span,
}

impl TraitDef {
    pub fn has_reference_receiver(&self) -> bool {
        self.methods.iter().any(|m| m.reference_receiver)
    }

    pub fn method(&self, name: &str) -> Option<&TraitMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumItem {
    pub name: String,
    pub value: Constant,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub hash: TypeHash,
    pub name: String,
    pub underlying: PrimKind,
    pub items: Vec<EnumItem>,
    pub span: Span,
}

impl EnumDef {
    pub fn item(&self, name: &str) -> Option<&EnumItem> {
        self.items.iter().find(|i| i.name == name)
    }

    pub fn kind(&self) -> TypeKind {
        TypeKind::Enum(tern_core::EnumKind {
            decl: self.hash,
            name: self.name.clone(),
            underlying: self.underlying,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    pub name: Option<String>,
    pub kind: TypeKind,
    pub mutable: bool,
    pub variadic: bool,
    pub reference: bool,
    pub has_default: bool,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: Some(name.into()),
            kind,
            mutable: false,
            variadic: false,
            reference: false,
            has_default: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverDef {
    pub reference: bool,
    pub mutable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDef {
    pub hash: TypeHash,
    pub name: String,
    /// Struct the function is a method of.
    pub owner: Option<TypeHash>,
    pub receiver: Option<ReceiverDef>,
    pub params: Vec<ParamDef>,
    /// `None` for functions producing no value; a tuple for multi-value results.
    pub result: Option<TypeKind>,
    /// Names of the results, empty when unnamed.
    pub result_names: Vec<String>,
    pub unsafety: bool,
    pub cpp_linked: bool,
    pub span: Span,
}

impl FnDef {
    pub fn new(hash: TypeHash, name: impl Into<String>, span: Span) -> Self {
        Self {
            hash,
            name: name.into(),
            owner: None,
            receiver: None,
            params: Vec::new(),
            result: None,
            result_names: Vec::new(),
            unsafety: false,
            cpp_linked: false,
            span,
        }
    }

    /// Function type of the declaration, receiver excluded.
    pub fn kind(&self) -> FnKind {
        FnKind {
            params: self
                .params
                .iter()
                .map(|p| ParamKind {
                    kind: p.kind.clone(),
                    mutable: p.mutable,
                    variadic: p.variadic,
                    reference: p.reference,
                })
                .collect(),
            result: self.result.clone(),
            unsafety: self.unsafety,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalVar {
    pub name: String,
    pub kind: TypeKind,
    pub mutable: bool,
    /// Folded value of a `const` global.
    pub constant: Option<Constant>,
    pub cpp_linked: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDef {
    pub name: String,
    pub kind: TypeKind,
    pub span: Span,
}
