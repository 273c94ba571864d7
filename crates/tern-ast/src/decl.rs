//! Declaration nodes.

use tern_core::{FileId, Span};

use crate::expr::Expr;
use crate::node::{Ident, Receiver};
use crate::stmt::Block;
use crate::types::{NamedType, TypeExpr};

/// Top-level item of a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'ast> {
    Fn(&'ast FnDecl<'ast>),
    Struct(&'ast StructDecl<'ast>),
    Trait(&'ast TraitDecl<'ast>),
    Enum(&'ast EnumDecl<'ast>),
    Impl(&'ast ImplDecl<'ast>),
    Var(&'ast VarDecl<'ast>),
    TypeAlias(&'ast TypeAliasDecl<'ast>),
}

impl<'ast> Item<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Fn(d) => d.span,
            Self::Struct(d) => d.span,
            Self::Trait(d) => d.span,
            Self::Enum(d) => d.span,
            Self::Impl(d) => d.span,
            Self::Var(d) => d.span,
            Self::TypeAlias(d) => d.span,
        }
    }
}

/// `let`/`const` declaration, at global or local level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDecl<'ast> {
    pub name: Ident<'ast>,
    pub ty: Option<TypeExpr<'ast>>,
    pub init: Option<Expr<'ast>>,
    pub mutable: bool,
    pub constant: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeAliasDecl<'ast> {
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDecl<'ast> {
    pub name: Option<Ident<'ast>>,
    pub ty: TypeExpr<'ast>,
    pub mutable: bool,
    pub variadic: bool,
    pub reference: bool,
    pub default: Option<Expr<'ast>>,
    pub span: Span,
}

/// Result of a function: one type, or several forming a tuple.
///
/// `names` is either empty or parallel to `types`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultDecl<'ast> {
    pub types: &'ast [TypeExpr<'ast>],
    pub names: &'ast [Ident<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FnDecl<'ast> {
    pub name: Ident<'ast>,
    pub receiver: Option<Receiver>,
    pub params: &'ast [ParamDecl<'ast>],
    pub result: Option<ResultDecl<'ast>>,
    pub body: Option<Block<'ast>>,
    pub unsafety: bool,
    pub cpp_linked: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl<'ast> {
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    pub mutable: bool,
    pub default: Option<Expr<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructDecl<'ast> {
    pub name: Ident<'ast>,
    pub generics: &'ast [Ident<'ast>],
    pub fields: &'ast [FieldDecl<'ast>],
    pub cpp_linked: bool,
    pub span: Span,
}

/// A trait; its methods have no body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitDecl<'ast> {
    pub name: Ident<'ast>,
    pub inherits: &'ast [NamedType<'ast>],
    pub methods: &'ast [FnDecl<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumItemDecl<'ast> {
    pub name: Ident<'ast>,
    pub value: Option<Expr<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumDecl<'ast> {
    pub name: Ident<'ast>,
    /// Defaults to `int`.
    pub underlying: Option<TypeExpr<'ast>>,
    pub items: &'ast [EnumItemDecl<'ast>],
    pub span: Span,
}

/// `impl Trait for Struct { }` or `impl Struct { }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImplDecl<'ast> {
    pub trait_: Option<NamedType<'ast>>,
    pub target: Ident<'ast>,
    pub methods: &'ast [FnDecl<'ast>],
    pub span: Span,
}

/// All items of one source file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompilationUnit<'ast> {
    pub file: FileId,
    pub items: &'ast [Item<'ast>],
}
