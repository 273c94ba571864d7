//! Expression nodes.

use tern_core::{BinaryOp, Span, UnaryOp};

use crate::node::Ident;
use crate::types::TypeExpr;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    Literal(LiteralExpr<'ast>),
    Ident(IdentExpr<'ast>),
    Binary(&'ast BinaryExpr<'ast>),
    Unary(&'ast UnaryExpr<'ast>),
    Call(&'ast CallExpr<'ast>),
    Index(&'ast IndexExpr<'ast>),
    Slice(&'ast SliceExpr<'ast>),
    Composite(&'ast CompositeExpr<'ast>),
    Cast(&'ast CastExpr<'ast>),
    Member(&'ast MemberExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Call(e) => e.span,
            Self::Index(e) => e.span,
            Self::Slice(e) => e.span,
            Self::Composite(e) => e.span,
            Self::Cast(e) => e.span,
            Self::Member(e) => e.span,
        }
    }

    /// Whether this is a struct composite literal, the operand `&` turns
    /// into a heap allocation.
    pub fn is_struct_literal(&self) -> bool {
        matches!(self, Self::Composite(c) if matches!(c.ty, Some(TypeExpr::Named(_))))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Literal(LiteralExpr { kind: LiteralKind::Nil, .. }))
    }
}

/// The kind of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    /// Interpreted string, escapes are decoded.
    Str,
    /// Raw string, taken verbatim.
    RawStr,
    Rune,
    Bool(bool),
    Nil,
}

/// A literal as written in source.
///
/// `raw` holds the token text; for strings and runes it is the content
/// between the delimiters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub kind: LiteralKind,
    pub raw: &'ast str,
    pub span: Span,
}

/// A reference to a named entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentExpr<'ast> {
    /// `pkg::name` package qualifier.
    pub package: Option<Ident<'ast>>,
    pub ident: Ident<'ast>,
    /// Generic arguments for struct instantiation.
    pub generics: &'ast [TypeExpr<'ast>],
    /// Names a declaration linked from foreign code.
    pub cpp_linked: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub op: UnaryOp,
    pub operand: &'ast Expr<'ast>,
    pub span: Span,
}

/// A call argument, optionally targeting a parameter by name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arg<'ast> {
    pub name: Option<Ident<'ast>>,
    pub value: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub callee: &'ast Expr<'ast>,
    pub args: &'ast [Arg<'ast>],
    /// The last argument is spread into a variadic parameter (`xs...`).
    pub spread: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexExpr<'ast> {
    pub base: &'ast Expr<'ast>,
    pub index: &'ast Expr<'ast>,
    pub span: Span,
}

/// `base[start:end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceExpr<'ast> {
    pub base: &'ast Expr<'ast>,
    pub start: Option<&'ast Expr<'ast>>,
    pub end: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

/// One entry of a composite literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompositeEntry<'ast> {
    Positional(Expr<'ast>),
    Field(Ident<'ast>, Expr<'ast>),
    KeyValue(Expr<'ast>, Expr<'ast>),
}

/// `T{...}` for structs, `[]T{...}`, `[N]T{...}`, `[K:V]{...}`.
///
/// Without a type, the literal is a slice whose element kind comes from the
/// expected type or the first element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeExpr<'ast> {
    pub ty: Option<TypeExpr<'ast>>,
    pub entries: &'ast [CompositeEntry<'ast>],
    pub span: Span,
}

/// `(T)(expr)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastExpr<'ast> {
    pub ty: TypeExpr<'ast>,
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}

/// `base.member`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberExpr<'ast> {
    pub base: &'ast Expr<'ast>,
    pub member: Ident<'ast>,
    pub span: Span,
}
