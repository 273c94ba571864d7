//! Semantic analysis for tern compilation units.
//!
//! This crate ties the workspace together:
//!
//! - [`ast`]: the untyped tree produced by the parser
//! - [`registry`]: declarations visible to a unit, packages included
//! - [`sema`]: scope trees, typed trees and the analysis passes
//!
//! # Example
//!
//! ```ignore
//! use tern::prelude::*;
//!
//! let typed = tern::analyze(&unit, SemaConfig::default())?;
//! for function in &typed.functions {
//!     println!("{}", function.name);
//! }
//! ```

pub use tern_ast as ast;
pub use tern_registry as registry;
pub use tern_sema as sema;

pub use tern_core::{
    AnalysisError, Constant, Diagnostic, DiagnosticKey, Diagnostics, RegistryError, SemaError, Severity, Span,
    TypeHash, TypeKind,
};

use tern_ast::CompilationUnit;
use tern_registry::SymbolRegistry;
use tern_sema::{AnalysisOutput, Analyzer, SemaConfig, TypedUnit};

pub mod prelude {
    pub use tern_ast::{AstBuilder, CompilationUnit};
    pub use tern_core::{AnalysisError, Diagnostic, DiagnosticKey, Diagnostics, Severity, Span, TypeHash, TypeKind};
    pub use tern_registry::{Lookup, SymbolRegistry};
    pub use tern_sema::{AnalysisOutput, Analyzer, SemaConfig, TypedFunction, TypedGlobal, TypedUnit};
}

/// Analyze a unit that imports no packages.
///
/// Returns the typed unit when no error was reported. Warnings do not
/// reject a unit; use [`Analyzer`] directly to inspect them.
pub fn analyze(unit: &CompilationUnit<'_>, config: SemaConfig) -> Result<TypedUnit, AnalysisError> {
    analyze_with_packages(unit, config, std::iter::empty())
}

/// Analyze a unit with already analyzed packages in scope.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn analyze_with_packages(
    unit: &CompilationUnit<'_>,
    config: SemaConfig,
    packages: impl IntoIterator<Item = (String, SymbolRegistry)>,
) -> Result<TypedUnit, AnalysisError> {
    let mut analyzer = Analyzer::new(config);
    for (name, package) in packages {
        analyzer = analyzer.with_package(name, package)?;
    }
    into_result(analyzer.analyze(unit))
}

fn into_result(output: AnalysisOutput) -> Result<TypedUnit, AnalysisError> {
    if output.is_ok() {
        log::debug!("unit accepted with {} warning(s)", output.diagnostics.warning_count());
        Ok(output.unit)
    } else {
        Err(AnalysisError::rejected(output.diagnostics))
    }
}
