//! Typed output of analysis.
//!
//! Statements live in the [`ScopeTree`] of their function: each
//! [`ScopeNode`](crate::scope::ScopeNode) owns its statements, and nested
//! blocks are referred to by [`ScopeId`].

use tern_core::{AssignOp, Constant, Span, TypeHash, TypeKind};

use crate::model::ExprModel;
use crate::scope::{ConstructId, LocalId, ScopeId, ScopeTree};

/// A checked expression with its resolved kind.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    /// `None` for expressions without a value.
    pub kind: Option<TypeKind>,
    pub constant: Option<Constant>,
    pub model: ExprModel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Expr(TypedExpr),
    Decl(LocalId),
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedIter {
    Infinite,
    While {
        cond: TypedExpr,
        next: Option<Box<TypedStmt>>,
    },
    Range {
        key: Option<LocalId>,
        value: Option<LocalId>,
        expr: TypedExpr,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedPattern {
    Expr(TypedExpr),
    Type(TypeKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedCase {
    pub patterns: Vec<TypedPattern>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedStmt {
    /// `local` is `None` for a discarded `_` binding.
    Var {
        local: Option<LocalId>,
        init: Option<TypedExpr>,
        span: Span,
    },
    TypeAlias {
        name: String,
        kind: TypeKind,
    },
    Expr(TypedExpr),
    Block(ScopeId),
    If {
        branches: Vec<(TypedExpr, ScopeId)>,
        default: Option<ScopeId>,
    },
    Iter {
        construct: ConstructId,
        kind: TypedIter,
        body: ScopeId,
    },
    /// `target` is `None` when the jump could not be resolved.
    Break {
        target: Option<ConstructId>,
    },
    Continue {
        target: Option<ConstructId>,
    },
    Label(String),
    Goto(String),
    Assign {
        op: AssignOp,
        targets: Vec<AssignTarget>,
        values: Vec<TypedExpr>,
        span: Span,
    },
    Match {
        construct: ConstructId,
        type_match: bool,
        expr: Option<TypedExpr>,
        cases: Vec<TypedCase>,
        default: Option<ScopeId>,
    },
    Fallthrough,
    Return(Vec<TypedExpr>),
}

impl TypedStmt {
    /// Whether the statement introduces a variable.
    pub fn declares(&self) -> bool {
        self.declared_span().is_some()
    }

    pub(crate) fn declared_span(&self) -> Option<Span> {
        match self {
            TypedStmt::Var { local: Some(_), span, .. } => Some(*span),
            TypedStmt::Assign { targets, span, .. }
                if targets.iter().any(|t| matches!(t, AssignTarget::Decl(_))) =>
            {
                Some(*span)
            }
            _ => None,
        }
    }
}

/// A checked function body.
#[derive(Debug, Clone)]
pub struct TypedFunction {
    pub hash: TypeHash,
    pub name: String,
    pub owner: Option<TypeHash>,
    pub body: ScopeTree,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedGlobal {
    pub name: String,
    pub kind: TypeKind,
    pub init: Option<TypedExpr>,
}

/// Everything analysis produced for one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct TypedUnit {
    pub functions: Vec<TypedFunction>,
    pub globals: Vec<TypedGlobal>,
    /// Structs ordered so that by-value dependencies come first.
    pub struct_order: Vec<TypeHash>,
}

impl TypedUnit {
    pub fn function(&self, name: &str) -> Option<&TypedFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}
