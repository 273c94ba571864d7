//! Shared leaf nodes.

use tern_core::Span;

/// An identifier with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }

    /// The blank identifier `_` discards a value.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// The receiver of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receiver {
    /// `&self` receivers require a reference to the struct.
    pub reference: bool,
    pub mutable: bool,
    pub span: Span,
}
