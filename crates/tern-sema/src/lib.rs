//! Semantic analysis for tern compilation units.
//!
//! Takes the untyped AST of a unit and produces a typed scope tree per
//! function, with every expression's [`TypeKind`](tern_core::TypeKind),
//! folded constants and an output model for code generation. Problems are
//! accumulated as [`Diagnostic`](tern_core::Diagnostic)s rather than
//! returned, so one run reports everything wrong with a unit.
//!
//! # Architecture
//!
//! ```text
//! CompilationUnit
//!      │
//!      ▼
//! RegistrationPass ──► SymbolRegistry (names, then signatures)
//!      │
//!      ▼
//! Analyzer ──► struct order, FunctionChecker per body
//!                  │
//!                  ▼
//!              Checker: statements, expressions, operators, conversions
//!                  │
//!                  ▼
//!              ScopeTree (typed statements, locals, constructs)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let output = Analyzer::new(SemaConfig::default()).analyze(&unit);
//! if output.is_ok() {
//!     codegen(&output.unit);
//! }
//! ```

pub mod checker;
pub mod config;
pub mod conversion;
pub mod eval;
pub mod expr;
pub mod function_checker;
pub mod model;
pub mod operators;
pub mod passes;
pub mod return_checker;
pub mod scope;
pub mod stmt;
pub mod type_resolver;
pub mod typed;
pub mod value;

pub use checker::Checker;
pub use config::SemaConfig;
pub use function_checker::{FunctionChecker, check_function};
pub use model::ExprModel;
pub use passes::{AnalysisOutput, Analyzer, Registration, RegistrationPass};
pub use return_checker::ReturnChecker;
pub use scope::{
    Construct, ConstructId, ConstructKind, Local, LocalId, ScopeFlags, ScopeId, ScopeNode, ScopeTree,
};
pub use typed::{TypedExpr, TypedFunction, TypedGlobal, TypedStmt, TypedUnit};
pub use value::Value;
