//! Untyped syntax tree consumed by semantic analysis.
//!
//! Nodes are allocated in a [`bumpalo::Bump`] arena and borrowed for the
//! arena's lifetime `'ast`. Every node carries the [`Span`](tern_core::Span)
//! diagnostics point at. [`AstBuilder`] constructs trees programmatically.

pub mod builder;
pub mod decl;
pub mod expr;
pub mod node;
pub mod stmt;
pub mod types;

pub use builder::AstBuilder;
pub use decl::*;
pub use expr::*;
pub use node::*;
pub use stmt::*;
pub use types::*;
