//! Whole-unit analysis tests.
//!
//! Each test builds a compilation unit, runs it through [`tern::analyze`] or
//! the [`Analyzer`], and checks the typed output or the reported keys.

mod common;

use bumpalo::Bump;
use tern::ast::AstBuilder;
use tern::prelude::*;
use tern::RegistryError;
use tern::registry::{FnDef, ParamDef};
use tern::sema::{ConstructId, ScopeId, ScopeTree, TypedStmt};
use tern_core::{BinaryOp, UnaryOp};

use common::*;

fn break_target(tree: &ScopeTree, scope: ScopeId, index: usize) -> Option<ConstructId> {
    match &tree.stmts(scope)[index] {
        TypedStmt::Break { target } => *target,
        other => panic!("expected a break, found {other:?}"),
    }
}

fn iteration(tree: &ScopeTree, scope: ScopeId, index: usize) -> (ConstructId, ScopeId) {
    match &tree.stmts(scope)[index] {
        TypedStmt::Iter { construct, body, .. } => (*construct, *body),
        other => panic!("expected an iteration, found {other:?}"),
    }
}

// ============================================================================
// Constants and ranges
// ============================================================================

#[test]
fn constant_division_by_zero_is_reported_once() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = with_main(
        &b,
        &[],
        &[
            b.let_("x", None, Some(b.binary(b.int("5"), BinaryOp::Div, b.int("0")))),
            b.expr_stmt(b.ident("x")),
        ],
    );
    let diagnostics = diagnose(&unit);
    assert_reported_once(&diagnostics, DiagnosticKey::DivideByZero);
    assert_eq!(diagnostics.error_count(), 1);
}

#[test]
fn runtime_division_is_not_diagnosed() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = b.unit(&[b.fn_item(b.func(
        "div",
        &[b.param("a", b.ty("int")), b.param("z", b.ty("int"))],
        Some(b.result(&[b.ty("int")])),
        &[b.ret(&[b.binary(b.ident("a"), BinaryOp::Div, b.ident("z"))])],
    ))]);
    accept(&unit);
}

#[test]
fn narrow_destinations_check_their_range() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = with_main(
        &b,
        &[],
        &[
            b.let_("fits", Some(b.ty("u8")), Some(b.int("255"))),
            b.let_("wide", Some(b.ty("u8")), Some(b.int("300"))),
            b.expr_stmt(b.ident("fits")),
            b.expr_stmt(b.ident("wide")),
        ],
    );
    let diagnostics = diagnose(&unit);
    assert_reported_once(&diagnostics, DiagnosticKey::OverflowLimits);
    assert_eq!(diagnostics.error_count(), 1);
}

#[test]
fn any_holds_composites_and_nil() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = with_main(
        &b,
        &[],
        &[
            b.let_("xs", Some(b.ty("any")), Some(b.slice_lit(b.ty("int"), &[b.int("1")]))),
            b.let_("none", Some(b.ty("any")), Some(b.nil())),
            b.expr_stmt(b.ident("xs")),
            b.expr_stmt(b.ident("none")),
        ],
    );
    accept(&unit);
}

// ============================================================================
// Assignment arity
// ============================================================================

#[test]
fn multi_assign_matches_the_result_arity() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let pair = b.fn_item(b.func(
        "pair",
        &[],
        Some(b.result(&[b.ty("int"), b.ty("int")])),
        &[b.ret(&[b.int("1"), b.int("2")])],
    ));
    let triple = b.fn_item(b.func(
        "triple",
        &[],
        Some(b.result(&[b.ty("int"), b.ty("int"), b.ty("int")])),
        &[b.ret(&[b.int("1"), b.int("2"), b.int("3")])],
    ));

    let ok = with_main(
        &b,
        &[pair, triple],
        &[
            b.define(&["a", "b"], &[b.call(b.ident("pair"), &[])]),
            b.expr_stmt(b.ident("a")),
            b.expr_stmt(b.ident("b")),
        ],
    );
    let typed = accept(&ok);
    let body = &typed.function("main").unwrap().body;
    assert!(body.lookup_local(body.root, "a").is_some());
    assert!(body.lookup_local(body.root, "b").is_some());

    let short = with_main(
        &b,
        &[pair, triple],
        &[
            b.define(&["a", "b"], &[b.call(b.ident("triple"), &[])]),
            b.expr_stmt(b.ident("a")),
            b.expr_stmt(b.ident("b")),
        ],
    );
    assert_reported_once(&diagnose(&short), DiagnosticKey::MissingMultiAssignIdents);
}

// ============================================================================
// Jumps
// ============================================================================

#[test]
fn goto_may_not_skip_a_used_declaration() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let skipping = with_main(
        &b,
        &[],
        &[
            b.goto("end"),
            b.let_("x", None, Some(b.int("1"))),
            b.label("end"),
            b.expr_stmt(b.ident("x")),
        ],
    );
    assert_reported_once(&diagnose(&skipping), DiagnosticKey::GotoJumpsDeclarations);

    let before = with_main(
        &b,
        &[],
        &[
            b.label("start"),
            b.let_("y", None, Some(b.int("1"))),
            b.expr_stmt(b.ident("y")),
            b.goto("start"),
        ],
    );
    accept(&before);
}

#[test]
fn labeled_break_targets_the_outer_iteration() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = with_main(
        &b,
        &[],
        &[
            b.label("outer"),
            b.loop_(&[b.loop_(&[b.brk_to("outer")]), b.brk()]),
        ],
    );
    let typed = accept(&unit);
    let tree = &typed.function("main").unwrap().body;
    let (outer, outer_body) = iteration(tree, tree.root, 1);
    let (inner, inner_body) = iteration(tree, outer_body, 0);
    assert_ne!(outer, inner);
    assert_eq!(break_target(tree, inner_body, 0), Some(outer));
    assert_eq!(break_target(tree, outer_body, 1), Some(outer));
}

#[test]
fn unlabeled_break_targets_the_innermost_iteration() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = with_main(&b, &[], &[b.loop_(&[b.loop_(&[b.brk()]), b.brk()])]);
    let typed = accept(&unit);
    let tree = &typed.function("main").unwrap().body;
    let (outer, outer_body) = iteration(tree, tree.root, 0);
    let (inner, inner_body) = iteration(tree, outer_body, 0);
    assert_eq!(break_target(tree, inner_body, 0), Some(inner));
    assert_eq!(break_target(tree, outer_body, 1), Some(outer));
}

// ============================================================================
// Traits
// ============================================================================

#[test]
fn value_receivers_accept_struct_values() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let mut message = b.prototype("message", &[], Some(b.result(&[b.ty("str")])));
    message.receiver = Some(b.receiver(false, false));
    let mut method = b.func("message", &[], Some(b.result(&[b.ty("str")])), &[b.ret(&[b.string("failed")])]);
    method.receiver = Some(b.receiver(false, false));
    let unit = with_main(
        &b,
        &[
            b.trait_("Error", &[], &[message]),
            b.struct_("Failure", &[]),
            b.impl_(Some("Error"), "Failure", &[method]),
        ],
        &[
            b.let_("err", Some(b.ty("Error")), Some(b.struct_lit("Failure", &[]))),
            b.expr_stmt(b.ident("err")),
        ],
    );
    accept(&unit);
}

#[test]
fn reference_receivers_need_a_reference() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let mut message = b.prototype("message", &[], Some(b.result(&[b.ty("str")])));
    message.receiver = Some(b.receiver(true, false));
    let mut method = b.func("message", &[], Some(b.result(&[b.ty("str")])), &[b.ret(&[b.string("failed")])]);
    method.receiver = Some(b.receiver(true, false));
    let unit = with_main(
        &b,
        &[
            b.trait_("Error", &[], &[message]),
            b.struct_("Failure", &[]),
            b.impl_(Some("Error"), "Failure", &[method]),
        ],
        &[
            b.let_(
                "by_ref",
                Some(b.ty("Error")),
                Some(b.unary(UnaryOp::AddrOf, b.struct_lit("Failure", &[]))),
            ),
            b.let_("by_value", Some(b.ty("Error")), Some(b.struct_lit("Failure", &[]))),
            b.expr_stmt(b.ident("by_ref")),
            b.expr_stmt(b.ident("by_value")),
        ],
    );
    let diagnostics = diagnose(&unit);
    assert_reported_once(&diagnostics, DiagnosticKey::TraitHasReferenceParameteredFunction);
    assert!(!diagnostics.contains(DiagnosticKey::IncompatibleTypes), "{diagnostics:#?}");
}

// ============================================================================
// Facade
// ============================================================================

#[test]
fn rejected_units_carry_their_diagnostics() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = with_main(&b, &[], &[b.let_("idle", None, Some(b.int("1"))), b.brk()]);
    let Err(err) = tern::analyze(&unit, SemaConfig::default()) else {
        panic!("expected a rejection")
    };
    let AnalysisError::Rejected { error_count, .. } = &err else {
        panic!("expected rejected diagnostics, got {err}")
    };
    assert_eq!(*error_count, 2);
    let keys: Vec<_> = err.diagnostics().iter().map(|d| d.key).collect();
    assert!(keys.contains(&DiagnosticKey::BreakAtOutOfValidScope));
    assert!(keys.contains(&DiagnosticKey::DeclaredButNotUsed));
}

#[test]
fn warnings_do_not_reject_a_unit() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = with_main(&b, &[], &[b.let_("idle", None, Some(b.int("1")))]);
    let config = SemaConfig::default().with_unused_severity(Severity::Warning);
    let output = Analyzer::new(config.clone()).analyze(&unit);
    assert!(output.is_ok());
    assert_eq!(output.diagnostics.warning_count(), 1);
    assert!(tern::analyze(&unit, config).is_ok());
}

#[test]
fn packages_are_visible_by_name() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let package = || {
        let mut registry = SymbolRegistry::new();
        let mut print = FnDef::new(TypeHash::from_function(&["io"], "print"), "print", Span::default());
        print.params = vec![ParamDef::new("s", TypeKind::str())];
        registry.register_fn(print).unwrap();
        registry
    };
    let unit = with_main(
        &b,
        &[],
        &[b.expr_stmt(b.call(b.pkg_ident("io", "print"), &[b.string("hello")]))],
    );

    let typed = tern::analyze_with_packages(&unit, SemaConfig::default(), [("io".to_string(), package())]);
    assert!(typed.is_ok(), "{typed:?}");

    let missing = tern::analyze(&unit, SemaConfig::default());
    assert!(matches!(missing, Err(AnalysisError::Rejected { .. })));

    let twice = tern::analyze_with_packages(
        &unit,
        SemaConfig::default(),
        [("io".to_string(), package()), ("io".to_string(), package())],
    );
    assert!(matches!(twice, Err(AnalysisError::Registry(RegistryError::DuplicatePackage { .. }))));
}

#[test]
fn struct_order_is_part_of_the_typed_unit() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = b.unit(&[
        b.struct_("Outer", &[b.field("inner", b.ty("Inner"))]),
        b.struct_("Inner", &[b.field("n", b.ty("int"))]),
    ]);
    let output = run(&unit);
    assert!(output.is_ok(), "{:#?}", output.diagnostics);
    let names: Vec<_> = output
        .unit
        .struct_order
        .iter()
        .map(|hash| output.registry.get_struct(*hash).unwrap().name.clone())
        .collect();
    assert_eq!(names, vec!["Inner", "Outer"]);
}
