//! Result of checking one expression.

use tern_core::{Constant, PrimKind, TypeKind};

use crate::model::ExprModel;
use crate::typed::TypedExpr;

/// A checked expression.
///
/// `kind` is `None` for calls of functions without a result. A value with a
/// constant payload is never an lvalue.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub kind: Option<TypeKind>,
    pub mutable: bool,
    pub lvalue: bool,
    pub constant: Option<Constant>,
    /// Constant built only from literals; declarations default its kind.
    pub untyped: bool,
    pub model: ExprModel,
}

impl Value {
    /// Fresh rvalue.
    pub fn new(kind: TypeKind, model: ExprModel) -> Self {
        Self {
            kind: Some(kind),
            mutable: true,
            lvalue: false,
            constant: None,
            untyped: false,
            model,
        }
    }

    pub fn lvalue(kind: TypeKind, mutable: bool, model: ExprModel) -> Self {
        Self {
            mutable,
            lvalue: true,
            ..Self::new(kind, model)
        }
    }

    pub fn constant(kind: TypeKind, constant: Constant) -> Self {
        Self {
            model: ExprModel::Const(constant.clone()),
            constant: Some(constant),
            ..Self::new(kind, ExprModel::Invalid)
        }
    }

    /// Constant produced by a literal.
    pub fn literal(kind: PrimKind, constant: Constant) -> Self {
        Self {
            untyped: true,
            ..Self::constant(kind.into(), constant)
        }
    }

    pub fn void(model: ExprModel) -> Self {
        Self {
            kind: None,
            mutable: false,
            lvalue: false,
            constant: None,
            untyped: false,
            model,
        }
    }

    /// Placeholder for an expression that already produced a diagnostic.
    pub fn invalid() -> Self {
        Self::void(ExprModel::Invalid)
    }

    pub fn is_invalid(&self) -> bool {
        self.model.is_invalid()
    }

    pub fn is_void(&self) -> bool {
        self.kind.is_none() && !self.is_invalid()
    }

    pub fn is_constant(&self) -> bool {
        self.constant.is_some()
    }

    pub fn kind(&self) -> Option<&TypeKind> {
        self.kind.as_ref()
    }

    pub fn prim(&self) -> Option<PrimKind> {
        self.kind.as_ref().and_then(TypeKind::prim)
    }

    pub fn into_typed(self) -> TypedExpr {
        TypedExpr {
            kind: self.kind,
            constant: self.constant,
            model: self.model,
        }
    }
}
