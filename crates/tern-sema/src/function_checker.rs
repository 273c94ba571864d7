//! Function checker for one function or method body.
//!
//! [`FunctionChecker`] binds the receiver, parameters and named results in
//! the root scope, walks the body, resolves labeled jumps and gotos, and
//! verifies that functions with a result return on every path.
//!
//! # Example
//!
//! ```ignore
//! let mut checker = FunctionChecker::new(&registry, &config, &mut diagnostics, decl, def, owner);
//! checker.setup_parameters();
//! checker.check_body(&body);
//! checker.verify_returns();
//! let function = checker.finish();
//! ```

use tern_ast::{Block, FnDecl};
use tern_core::{DiagnosticKey, Diagnostics, SemaError, Span, StructKind, TypeKind};
use tern_registry::{FnDef, StructDef, SymbolRegistry};

use crate::checker::Checker;
use crate::config::SemaConfig;
use crate::return_checker::ReturnChecker;
use crate::scope::{Local, LocalId, ScopeFlags};
use crate::typed::TypedFunction;

/// Check a declared function against its registered signature.
///
/// Cpp-linked prototypes have nothing to check and yield `Ok(None)`. Any
/// other function without a body is reported and aborts with
/// [`SemaError::MissingBody`].
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn check_function(
    registry: &SymbolRegistry,
    config: &SemaConfig,
    diagnostics: &mut Diagnostics,
    decl: &FnDecl<'_>,
    def: &FnDef,
    owner: Option<&StructDef>,
) -> Result<Option<TypedFunction>, SemaError> {
    let Some(body) = decl.body.as_ref() else {
        if def.cpp_linked {
            return Ok(None);
        }
        diagnostics.error(decl.span, DiagnosticKey::MissingFunctionBody, vec![def.name.clone()]);
        return Err(SemaError::MissingBody {
            name: def.name.clone(),
            span: decl.span,
        });
    };

    log::trace!("checking function '{}'", def.name);
    let mut checker = FunctionChecker::new(registry, config, diagnostics, decl, def, owner);
    checker.setup_parameters();
    checker.check_body(body);
    checker.verify_returns();
    Ok(Some(checker.finish()))
}

/// Checks a single function body.
pub struct FunctionChecker<'a, 'r> {
    checker: Checker<'r>,
    decl: &'a FnDecl<'a>,
    def: &'a FnDef,
    owner: Option<&'a StructDef>,
}

impl<'a, 'r> FunctionChecker<'a, 'r> {
    pub fn new(
        registry: &'r SymbolRegistry,
        config: &'r SemaConfig,
        diagnostics: &'r mut Diagnostics,
        decl: &'a FnDecl<'a>,
        def: &'a FnDef,
        owner: Option<&'a StructDef>,
    ) -> Self {
        let flags = if def.unsafety {
            ScopeFlags::UNSAFE
        } else {
            ScopeFlags::empty()
        };
        let mut checker = Checker::with_flags(registry, config, diagnostics, flags, decl.span);
        if let Some(owner) = owner {
            checker.generics = owner.generics.clone();
        }
        Self {
            checker,
            decl,
            def,
            owner,
        }
    }

    /// Declare `self`, parameters and named results in the root scope.
    ///
    /// These bindings are never reported as unused.
    pub fn setup_parameters(&mut self) {
        if let (Some(receiver), Some(owner)) = (self.def.receiver, self.owner) {
            let kind = TypeKind::Struct(StructKind {
                decl: owner.hash,
                name: owner.name.clone(),
                generics: owner.generics.iter().map(|g| TypeKind::Generic(g.clone())).collect(),
            });
            let kind = if receiver.reference {
                TypeKind::ref_to(kind)
            } else {
                kind
            };
            let span = self.decl.receiver.map_or(self.decl.span, |r| r.span);
            self.bind("self", kind, receiver.mutable, span);
        }

        for (param, written) in self.def.params.iter().zip(self.decl.params) {
            if let Some(default) = &written.default {
                let value = self.checker.eval_single(default, Some(&param.kind));
                self.checker.check_value_against(&param.kind, &value, default.span());
            }
            let Some(name) = written.name.filter(|n| !n.is_blank()) else {
                continue;
            };
            let kind = if param.variadic {
                TypeKind::slice_of(param.kind.clone())
            } else {
                param.kind.clone()
            };
            self.bind(name.name, kind, param.mutable, name.span);
        }

        self.checker.frame.result = self.def.result.clone();
        let Some(result) = self.decl.result.as_ref().filter(|r| !r.names.is_empty()) else {
            return;
        };
        let kinds = match &self.def.result {
            Some(TypeKind::Tuple(parts)) if result.names.len() > 1 => parts.clone(),
            Some(single) => vec![single.clone()],
            None => Vec::new(),
        };
        for (name, kind) in result.names.iter().zip(kinds) {
            let local = if name.is_blank() {
                None
            } else {
                self.bind(name.name, kind.clone(), true, name.span)
            };
            self.checker.frame.named_results.push((local, kind));
        }
    }

    fn bind(&mut self, name: &str, kind: TypeKind, mutable: bool, span: Span) -> Option<LocalId> {
        let root = self.checker.tree.root;
        if self.checker.tree.declared_here(root, name) {
            self.checker
                .error(span, DiagnosticKey::DuplicatedIdent, vec![name.to_string()]);
            return None;
        }
        Some(self.checker.tree.declare_local(
            root,
            Local {
                name: name.to_string(),
                kind,
                mutable,
                constant: None,
                used: false,
                reportable: false,
                scope: root,
                span,
            },
        ))
    }

    /// Walk the body in the root scope and resolve its jumps.
    pub fn check_body(&mut self, body: &Block<'_>) {
        if body.unsafety {
            self.checker.tree.node_mut(self.checker.tree.root).flags |= ScopeFlags::UNSAFE;
        }
        self.checker.walk_stmts(body.stmts);
        self.checker.resolve_jumps();
    }

    /// Report `missing_ret` when a function with a result can fall off its
    /// end.
    pub fn verify_returns(&mut self) {
        if self.def.result.is_none() {
            return;
        }
        let tree = self.checker.tree();
        if !ReturnChecker::new(tree).all_paths_return(tree.root) {
            self.checker
                .error(self.decl.span, DiagnosticKey::MissingRet, vec![self.def.name.clone()]);
        }
    }

    pub fn finish(mut self) -> TypedFunction {
        let root = self.checker.tree.root;
        self.checker.report_unused(root);
        TypedFunction {
            hash: self.def.hash,
            name: self.def.name.clone(),
            owner: self.def.owner,
            body: self.checker.into_tree(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use tern_ast::AstBuilder;
    use tern_core::TypeHash;
    use tern_registry::{ParamDef, ReceiverDef};

    use super::*;

    fn def_for(decl: &FnDecl<'_>, params: Vec<ParamDef>, result: Option<TypeKind>) -> FnDef {
        let mut def = FnDef::new(TypeHash::from_function(&[], decl.name.name), decl.name.name, decl.span);
        def.params = params;
        def.result = result;
        def.result_names = decl
            .result
            .map(|r| r.names.iter().map(|n| n.name.to_string()).collect())
            .unwrap_or_default();
        def
    }

    fn check(
        decl: &FnDecl<'_>,
        def: &FnDef,
        owner: Option<&StructDef>,
    ) -> (Result<Option<TypedFunction>, SemaError>, Diagnostics) {
        let registry = SymbolRegistry::new();
        let config = SemaConfig::default();
        let mut diagnostics = Diagnostics::new();
        let result = check_function(&registry, &config, &mut diagnostics, decl, def, owner);
        (result, diagnostics)
    }

    #[test]
    fn named_results_allow_bare_return() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let decl = b.func(
            "split",
            &[],
            Some(b.named_result(&["lo", "_"], &[b.ty("int"), b.ty("int")])),
            &[b.assign(b.ident("lo"), b.int("1")), b.ret(&[])],
        );
        let def = def_for(&decl, vec![], Some(TypeKind::Tuple(vec![TypeKind::int(), TypeKind::int()])));
        let (result, diagnostics) = check(&decl, &def, None);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let function = result.unwrap().unwrap();
        assert_eq!(function.name, "split");
    }

    #[test]
    fn falling_off_the_end_is_missing_ret() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let decl = b.func("f", &[], Some(b.result(&[b.ty("int")])), &[]);
        let def = def_for(&decl, vec![], Some(TypeKind::int()));
        let (result, diagnostics) = check(&decl, &def, None);
        assert!(result.is_ok());
        assert_eq!(diagnostics.count(DiagnosticKey::MissingRet), 1);

        let decl = b.func("g", &[], None, &[]);
        let def = def_for(&decl, vec![], None);
        let (_, diagnostics) = check(&decl, &def, None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn missing_body_aborts_unless_cpp_linked() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let decl = b.prototype("extern_fn", &[], None);
        let mut def = def_for(&decl, vec![], None);
        let (result, diagnostics) = check(&decl, &def, None);
        assert!(matches!(result, Err(SemaError::MissingBody { .. })));
        assert_eq!(diagnostics.count(DiagnosticKey::MissingFunctionBody), 1);

        def.cpp_linked = true;
        let (result, diagnostics) = check(&decl, &def, None);
        assert!(matches!(result, Ok(None)));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn parameters_are_bound_and_exempt_from_unused() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut rest = b.param("rest", b.ty("str"));
        rest.variadic = true;
        let decl = b.func(
            "f",
            &[b.param("n", b.ty("int")), rest],
            Some(b.result(&[b.ty("str")])),
            &[b.ret(&[b.index(b.ident("rest"), b.int("0"))])],
        );
        let mut variadic = ParamDef::new("rest", TypeKind::str());
        variadic.variadic = true;
        let def = def_for(&decl, vec![ParamDef::new("n", TypeKind::int()), variadic], Some(TypeKind::str()));
        let (result, diagnostics) = check(&decl, &def, None);
        assert!(!diagnostics.contains(DiagnosticKey::DeclaredButNotUsed), "{diagnostics:?}");
        let function = result.unwrap().unwrap();
        let rest = function.body.lookup_local(function.body.root, "rest").unwrap();
        assert_eq!(function.body.local(rest).kind, TypeKind::slice_of(TypeKind::str()));
    }

    #[test]
    fn duplicate_parameter_names_are_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let decl = b.func("f", &[b.param("a", b.ty("int")), b.param("a", b.ty("int"))], None, &[]);
        let def = def_for(
            &decl,
            vec![ParamDef::new("a", TypeKind::int()), ParamDef::new("a", TypeKind::int())],
            None,
        );
        let (_, diagnostics) = check(&decl, &def, None);
        assert_eq!(diagnostics.count(DiagnosticKey::DuplicatedIdent), 1);
    }

    #[test]
    fn receiver_binds_self() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let owner = StructDef::new(TypeHash::from_decl(&[], "Point"), "Point", Span::default());
        let mut decl = b.func("reset", &[], None, &[]);
        decl.receiver = Some(b.receiver(true, true));
        let mut def = def_for(&decl, vec![], None);
        def.owner = Some(owner.hash);
        def.receiver = Some(ReceiverDef {
            reference: true,
            mutable: true,
        });
        let (result, diagnostics) = check(&decl, &def, Some(&owner));
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let body = result.unwrap().unwrap().body;
        let this = body.lookup_local(body.root, "self").unwrap();
        assert!(body.local(this).kind.is_ref());
        assert!(body.local(this).mutable);
    }
}
