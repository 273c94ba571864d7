//! Statement nodes.

use tern_core::{AssignOp, Span};

use crate::decl::{TypeAliasDecl, VarDecl};
use crate::expr::Expr;
use crate::node::Ident;
use crate::types::TypeExpr;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    VarDecl(&'ast VarDecl<'ast>),
    TypeAlias(&'ast TypeAliasDecl<'ast>),
    Expr(ExprStmt<'ast>),
    Block(&'ast Block<'ast>),
    If(&'ast IfStmt<'ast>),
    Iter(&'ast IterStmt<'ast>),
    Break(JumpStmt<'ast>),
    Continue(JumpStmt<'ast>),
    Label(Ident<'ast>),
    Goto(GotoStmt<'ast>),
    Assign(&'ast AssignStmt<'ast>),
    Match(&'ast MatchStmt<'ast>),
    Fallthrough(Span),
    Return(&'ast ReturnStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::VarDecl(s) => s.span,
            Self::TypeAlias(s) => s.span,
            Self::Expr(s) => s.span,
            Self::Block(s) => s.span,
            Self::If(s) => s.span,
            Self::Iter(s) => s.span,
            Self::Break(s) | Self::Continue(s) => s.span,
            Self::Label(l) => l.span,
            Self::Goto(s) => s.span,
            Self::Assign(s) => s.span,
            Self::Match(s) => s.span,
            Self::Fallthrough(span) => *span,
            Self::Return(s) => s.span,
        }
    }

    /// Whether the statement introduces a new binding in its scope.
    pub fn declares(&self) -> bool {
        match self {
            Self::VarDecl(_) => true,
            Self::Assign(a) => a.lhs.iter().any(|l| matches!(l, AssignLhs::Decl { .. })),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    pub expr: Expr<'ast>,
    pub span: Span,
}

/// A braced statement list. `unsafe { }` and `defer { }` set the flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    pub stmts: &'ast [Stmt<'ast>],
    pub unsafety: bool,
    pub deferred: bool,
    pub span: Span,
}

/// One `if`/`else if` arm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfBranch<'ast> {
    pub cond: Expr<'ast>,
    pub body: Block<'ast>,
    pub span: Span,
}

/// A conditional chain: `if`, any number of `else if`, optional `else`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub branches: &'ast [IfBranch<'ast>],
    pub default: Option<Block<'ast>>,
    pub span: Span,
}

/// Binding introduced by a range iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeVar<'ast> {
    pub name: Ident<'ast>,
    pub mutable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterKind<'ast> {
    /// `for { }`
    Infinite,
    /// `for cond; next { }`
    While {
        cond: Expr<'ast>,
        next: Option<&'ast Stmt<'ast>>,
    },
    /// `for key, value in expr { }`
    Range {
        key: Option<RangeVar<'ast>>,
        value: Option<RangeVar<'ast>>,
        expr: Expr<'ast>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterStmt<'ast> {
    pub kind: IterKind<'ast>,
    pub body: Block<'ast>,
    pub span: Span,
}

/// `break` / `continue`, optionally labeled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpStmt<'ast> {
    pub label: Option<Ident<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GotoStmt<'ast> {
    pub label: Ident<'ast>,
    pub span: Span,
}

/// Left-hand side slot of an assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssignLhs<'ast> {
    /// Existing storage.
    Expr(Expr<'ast>),
    /// New binding (`x :=`, `mut x :=`).
    Decl { name: Ident<'ast>, mutable: bool },
    /// `_` discards the value.
    Blank(Span),
}

impl<'ast> AssignLhs<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Expr(e) => e.span(),
            Self::Decl { name, .. } => name.span,
            Self::Blank(span) => *span,
        }
    }
}

/// Single, multi-value, compound and postfix assignment.
///
/// Postfix `x++` has one left slot and no right side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    pub lhs: &'ast [AssignLhs<'ast>],
    pub op: AssignOp,
    pub rhs: &'ast [Expr<'ast>],
    pub span: Span,
}

/// A case pattern: a value for value matches, a type for type matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CasePattern<'ast> {
    Expr(Expr<'ast>),
    Type(TypeExpr<'ast>),
}

impl<'ast> CasePattern<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Expr(e) => e.span(),
            Self::Type(t) => t.span(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Case<'ast> {
    pub patterns: &'ast [CasePattern<'ast>],
    pub stmts: &'ast [Stmt<'ast>],
    pub span: Span,
}

/// `match expr { case ...: }`, `match type expr { }` or the boolean
/// form `match { case cond: }` when `expr` is `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchStmt<'ast> {
    pub expr: Option<Expr<'ast>>,
    pub type_match: bool,
    pub cases: &'ast [Case<'ast>],
    pub default: Option<Case<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    pub exprs: &'ast [Expr<'ast>],
    pub span: Span,
}
