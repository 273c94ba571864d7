//! Registry of declarations visible to function analysis.
//!
//! [`SymbolRegistry`] stores resolved structs, traits, enums, functions,
//! global variables, type aliases and imported packages, and implements the
//! [`Lookup`] interface used to resolve identifiers outside a function body.

pub mod dependency;
pub mod entries;
pub mod registry;

pub use dependency::StructCycle;
pub use entries::*;
pub use registry::{Lookup, Package, Symbol, SymbolRegistry};
