//! Unit driver - register, order and check a whole compilation unit.
//!
//! [`Analyzer::analyze`] never stops at the first problem. A function that
//! cannot be checked (a missing body) is skipped and the rest of the unit is
//! still analyzed, so one run reports every diagnostic of the unit.

use tern_ast::CompilationUnit;
use tern_core::{DiagnosticKey, Diagnostics, RegistryError};
use tern_registry::SymbolRegistry;

use crate::config::SemaConfig;
use crate::function_checker::check_function;
use crate::passes::registration::RegistrationPass;
use crate::typed::TypedUnit;

/// Everything one analysis run produced.
#[derive(Debug)]
pub struct AnalysisOutput {
    pub unit: TypedUnit,
    /// Declarations of the unit, imported packages included.
    pub registry: SymbolRegistry,
    pub diagnostics: Diagnostics,
}

impl AnalysisOutput {
    /// Whether code generation may proceed.
    pub fn is_ok(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Analyzes compilation units.
///
/// ```ignore
/// let output = Analyzer::new(SemaConfig::default())
///     .with_package("fmt", fmt_registry)?
///     .analyze(&unit);
/// ```
#[derive(Debug, Default)]
pub struct Analyzer {
    config: SemaConfig,
    registry: SymbolRegistry,
}

impl Analyzer {
    pub fn new(config: SemaConfig) -> Self {
        Self {
            config,
            registry: SymbolRegistry::new(),
        }
    }

    /// Make an already analyzed package available as `name::`.
    pub fn with_package(mut self, name: impl Into<String>, package: SymbolRegistry) -> Result<Self, RegistryError> {
        self.registry.add_package(name, package)?;
        Ok(self)
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn analyze(self, unit: &CompilationUnit<'_>) -> AnalysisOutput {
        let Analyzer { config, registry } = self;
        let mut diagnostics = Diagnostics::with_limit(config.max_diagnostics);

        let registration = RegistrationPass::new(registry, &config, &mut diagnostics).run(unit);
        let registry = registration.registry;

        let struct_order = match registry.struct_order() {
            Ok(order) => order,
            Err(cycle) => {
                log::debug!("struct '{}' stores itself by value", cycle.name);
                diagnostics.error(cycle.span, DiagnosticKey::IllegalCycleRefersItself, vec![cycle.name]);
                Vec::new()
            }
        };

        let mut functions = Vec::with_capacity(registration.functions.len());
        for (hash, decl) in registration.functions {
            let Some(def) = registry.get_fn(hash) else {
                continue;
            };
            let owner = def.owner.and_then(|owner| registry.get_struct(owner));
            log::debug!("analyzing function '{}'", def.name);
            match check_function(&registry, &config, &mut diagnostics, decl, def, owner) {
                Ok(Some(function)) => functions.push(function),
                Ok(None) => {}
                Err(err) => log::debug!("skipped: {err}"),
            }
        }

        log::debug!(
            "analysis finished with {} error(s), {} warning(s)",
            diagnostics.error_count(),
            diagnostics.warning_count()
        );
        AnalysisOutput {
            unit: TypedUnit {
                functions,
                globals: registration.globals,
                struct_order,
            },
            registry,
            diagnostics,
        }
    }
}
