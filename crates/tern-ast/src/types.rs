//! Type expressions as written in source.

use tern_core::Span;

use crate::expr::Expr;
use crate::node::Ident;
use crate::decl::{ParamDecl, ResultDecl};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeExpr<'ast> {
    /// Primitive, struct, trait, enum or alias name.
    Named(NamedType<'ast>),
    /// `*T`, or `*unsafe` when `elem` is `None`.
    Ptr(Option<&'ast TypeExpr<'ast>>, Span),
    Ref(&'ast TypeExpr<'ast>, Span),
    Slice(&'ast TypeExpr<'ast>, Span),
    Array(&'ast ArrayType<'ast>),
    Map(&'ast MapType<'ast>),
    Fn(&'ast FnType<'ast>),
    /// `(A, B)` multi-value result.
    Tuple(&'ast [TypeExpr<'ast>], Span),
}

impl<'ast> TypeExpr<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Named(n) => n.span,
            Self::Ptr(_, span) | Self::Ref(_, span) | Self::Slice(_, span) | Self::Tuple(_, span) => *span,
            Self::Array(a) => a.span,
            Self::Map(m) => m.span,
            Self::Fn(f) => f.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedType<'ast> {
    pub package: Option<Ident<'ast>>,
    pub name: Ident<'ast>,
    pub generics: &'ast [TypeExpr<'ast>],
    pub cpp_linked: bool,
    pub span: Span,
}

/// `[N]T`; `len` is `None` for `[...]T`, whose length comes from the
/// literal it types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayType<'ast> {
    pub elem: TypeExpr<'ast>,
    pub len: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapType<'ast> {
    pub key: TypeExpr<'ast>,
    pub val: TypeExpr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FnType<'ast> {
    pub params: &'ast [ParamDecl<'ast>],
    pub result: Option<ResultDecl<'ast>>,
    pub unsafety: bool,
    pub span: Span,
}
