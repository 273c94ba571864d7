//! Shared helpers for whole-unit analysis tests.

#![allow(dead_code)]

use tern::ast::{AstBuilder, CompilationUnit, Item, Stmt};
use tern::prelude::*;

/// Run the analyzer on a unit with the default configuration.
pub fn run(unit: &CompilationUnit<'_>) -> AnalysisOutput {
    Analyzer::new(SemaConfig::default()).analyze(unit)
}

/// Analyze a unit that must be accepted.
pub fn accept(unit: &CompilationUnit<'_>) -> TypedUnit {
    match tern::analyze(unit, SemaConfig::default()) {
        Ok(typed) => typed,
        Err(err) => panic!("{err}: {:#?}", err.diagnostics()),
    }
}

/// Diagnostics produced for a unit.
pub fn diagnose(unit: &CompilationUnit<'_>) -> Diagnostics {
    run(unit).diagnostics
}

/// A unit holding `items` followed by `fn main() { stmts }`.
pub fn with_main<'a>(b: &AstBuilder<'a>, items: &[Item<'a>], stmts: &[Stmt<'a>]) -> CompilationUnit<'a> {
    let mut all = items.to_vec();
    all.push(b.fn_item(b.func("main", &[], None, stmts)));
    b.unit(&all)
}

pub fn assert_reported_once(diagnostics: &Diagnostics, key: DiagnosticKey) {
    assert_eq!(diagnostics.count(key), 1, "expected one {key:?} in {diagnostics:#?}");
}
