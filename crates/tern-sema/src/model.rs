//! Resolved expression payloads handed to later stages.

use tern_core::{BinaryOp, Constant, TypeHash, TypeKind, UnaryOp};

use crate::scope::LocalId;

/// What an expression evaluates to, with every name resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprModel {
    /// The expression failed to check.
    Invalid,
    Const(Constant),
    Nil,
    Local(LocalId),
    Global {
        name: String,
        cpp_linked: bool,
    },
    Fn(TypeHash),
    /// Bound method of a struct value.
    Method {
        base: Box<ExprModel>,
        method: TypeHash,
    },
    /// Method looked up dynamically through a trait value.
    TraitMethod {
        base: Box<ExprModel>,
        name: String,
    },
    Binary {
        op: BinaryOp,
        left: Box<ExprModel>,
        right: Box<ExprModel>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<ExprModel>,
    },
    /// `&T{...}`: a struct literal moved to the heap behind a reference.
    HeapAlloc(Box<ExprModel>),
    Call {
        callee: Box<ExprModel>,
        args: Vec<ExprModel>,
    },
    SliceLit {
        elem: TypeKind,
        elems: Vec<ExprModel>,
    },
    ArrayLit {
        elem: TypeKind,
        elems: Vec<ExprModel>,
    },
    MapLit {
        key: TypeKind,
        val: TypeKind,
        entries: Vec<(ExprModel, ExprModel)>,
    },
    /// Struct literal. Omitted fields are absent from `fields`.
    StructLit {
        decl: TypeHash,
        fields: Vec<(String, ExprModel)>,
    },
    Field {
        base: Box<ExprModel>,
        name: String,
    },
    Index {
        base: Box<ExprModel>,
        index: Box<ExprModel>,
    },
    Slicing {
        base: Box<ExprModel>,
        start: Option<Box<ExprModel>>,
        end: Option<Box<ExprModel>>,
    },
    Cast {
        kind: TypeKind,
        expr: Box<ExprModel>,
    },
    Tuple(Vec<ExprModel>),
    /// Default value of the kind.
    Default(TypeKind),
    /// The declared default of an omitted parameter.
    DefaultArg(usize),
}

impl ExprModel {
    pub fn is_invalid(&self) -> bool {
        matches!(self, ExprModel::Invalid)
    }

    pub(crate) fn boxed(self) -> Box<ExprModel> {
        Box::new(self)
    }
}
