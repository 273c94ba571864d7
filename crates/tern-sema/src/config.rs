//! Analysis configuration.

use tern_core::{IntWidth, Severity};

/// Settings consulted by every checker.
///
/// Built with chained `with_*` calls:
///
/// ```
/// use tern_core::{IntWidth, Severity};
/// use tern_sema::SemaConfig;
///
/// let config = SemaConfig::new()
///     .with_int_width(IntWidth::W32)
///     .with_unused_severity(Severity::Warning);
/// assert_eq!(config.int_width, IntWidth::W32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemaConfig {
    /// Report locals, aliases and labels that are never used.
    pub report_unused: bool,
    /// Severity of unused-declaration diagnostics.
    pub unused_severity: Severity,
    /// Width of `int`, `uint` and `uintptr`.
    pub int_width: IntWidth,
    /// Stop recording diagnostics after this many.
    pub max_diagnostics: Option<usize>,
}

impl SemaConfig {
    pub fn new() -> Self {
        Self {
            report_unused: true,
            unused_severity: Severity::Error,
            int_width: IntWidth::W64,
            max_diagnostics: None,
        }
    }

    pub fn with_report_unused(mut self, report: bool) -> Self {
        self.report_unused = report;
        self
    }

    pub fn with_unused_severity(mut self, severity: Severity) -> Self {
        self.unused_severity = severity;
        self
    }

    pub fn with_int_width(mut self, width: IntWidth) -> Self {
        self.int_width = width;
        self
    }

    pub fn with_max_diagnostics(mut self, limit: usize) -> Self {
        self.max_diagnostics = Some(limit);
        self
    }
}

impl Default for SemaConfig {
    fn default() -> Self {
        Self::new()
    }
}
