//! Core vocabulary shared by the tern analysis crates.
//!
//! - [`Span`], [`FileId`] and [`SourceFiles`] for source locations
//! - [`TypeHash`] for declaration identity
//! - [`PrimKind`] and [`TypeKind`] for resolved types
//! - [`Constant`] for folded constant payloads
//! - [`Diagnostic`] and [`Diagnostics`] for accumulated problems
//! - [`Arena`] and [`Id`] for stable handles into analysis trees

pub mod arena;
pub mod constant;
pub mod diagnostic;
pub mod error;
pub mod ops;
pub mod primitive;
pub mod span;
pub mod type_hash;
pub mod type_kind;

pub use arena::{Arena, Id};
pub use constant::Constant;
pub use diagnostic::{Diagnostic, DiagnosticKey, Diagnostics, Severity};
pub use error::{AnalysisError, RegistryError, SemaError};
pub use ops::{AssignOp, BinaryOp, UnaryOp};
pub use primitive::{IntWidth, PrimKind};
pub use span::{FileId, SourceFiles, Span};
pub use type_hash::TypeHash;
pub use type_kind::{ArrayKind, EnumKind, FnKind, MapKind, ParamKind, StructKind, TraitKind, TypeKind};
