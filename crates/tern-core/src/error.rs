//! Error types.
//!
//! User-facing problems are [`Diagnostic`]s and are accumulated, not
//! returned. The types here cover the remaining fallible paths:
//!
//! ```text
//! AnalysisError (returned by the driver)
//! ├── RegistryError - declaration table misuse
//! └── SemaError     - aborts the declaration being analyzed
//! ```

use thiserror::Error;

use crate::{Diagnostic, Diagnostics, Span};

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors raised while building the symbol registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// A declaration with the same name is already registered.
    #[error("at {span}: duplicate declaration '{name}'")]
    Duplicate { name: String, span: Span },

    /// A method names a struct that is not registered.
    #[error("at {span}: method '{name}' has no registered owner")]
    UnknownOwner { name: String, span: Span },

    /// A package alias was registered twice.
    #[error("package '{name}' is already imported")]
    DuplicatePackage { name: String },
}

impl RegistryError {
    pub fn span(&self) -> Option<Span> {
        match self {
            RegistryError::Duplicate { span, .. } | RegistryError::UnknownOwner { span, .. } => {
                Some(*span)
            }
            RegistryError::DuplicatePackage { .. } => None,
        }
    }
}

// ============================================================================
// Semantic Errors
// ============================================================================

/// Conditions that stop analysis of the current declaration.
///
/// The diagnostic describing the problem has already been pushed when one
/// of these is returned; siblings in the unit are still analyzed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemaError {
    /// A function declaration without a body.
    #[error("at {span}: function '{name}' has no body")]
    MissingBody { name: String, span: Span },
}

impl SemaError {
    pub fn span(&self) -> Option<Span> {
        match self {
            SemaError::MissingBody { span, .. } => Some(*span),
        }
    }
}

// ============================================================================
// Analysis Errors
// ============================================================================

/// Top-level error returned when a unit cannot be handed to code generation.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// At least one error-severity diagnostic was produced.
    #[error("analysis failed with {error_count} error(s)")]
    Rejected {
        error_count: usize,
        diagnostics: Vec<Diagnostic>,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl AnalysisError {
    pub fn rejected(diagnostics: Diagnostics) -> Self {
        AnalysisError::Rejected {
            error_count: diagnostics.error_count(),
            diagnostics: diagnostics.into_vec(),
        }
    }

    /// Diagnostics carried by a rejection, empty otherwise.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            AnalysisError::Rejected { diagnostics, .. } => diagnostics,
            AnalysisError::Registry(_) => &[],
        }
    }
}
