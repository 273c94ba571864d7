//! Local `let` and `const` declarations.

use tern_ast::VarDecl;
use tern_core::{Constant, DiagnosticKey, PrimKind, TypeKind};

use crate::checker::Checker;
use crate::eval::constant::convert;
use crate::scope::Local;
use crate::typed::TypedStmt;
use crate::value::Value;

impl<'r> Checker<'r> {
    pub(super) fn check_var_decl(&mut self, decl: &VarDecl<'_>) -> TypedStmt {
        let (kind, init) = self.declared_value(decl);
        let constant = if decl.constant {
            self.folded_constant(decl, kind.as_ref(), init.as_ref())
        } else {
            None
        };
        let init = init.map(Value::into_typed);

        let name = decl.name.name;
        if decl.name.is_blank() {
            return TypedStmt::Var {
                local: None,
                init,
                span: decl.span,
            };
        }
        if self.tree.declared_here(self.current, name) {
            self.error(decl.name.span, DiagnosticKey::DuplicatedIdent, vec![name.to_string()]);
            return TypedStmt::Var {
                local: None,
                init,
                span: decl.span,
            };
        }

        // A failed declaration still binds the name, as `any`, so later uses
        // do not cascade into unknown-identifier errors.
        let failed = kind.is_none();
        let scope = self.current;
        let local = self.tree.declare_local(
            scope,
            Local {
                name: name.to_string(),
                kind: kind.unwrap_or(TypeKind::Prim(PrimKind::Any)),
                mutable: decl.mutable,
                constant,
                used: failed,
                reportable: !failed,
                scope,
                span: decl.name.span,
            },
        );
        TypedStmt::Var {
            local: Some(local),
            init,
            span: decl.span,
        }
    }

    /// Kind of the declared binding and its checked initializer.
    fn declared_value(&mut self, decl: &VarDecl<'_>) -> (Option<TypeKind>, Option<Value>) {
        let declared = match &decl.ty {
            Some(ty) => match self.resolve_type(ty) {
                Some(kind) => Some(kind),
                None => {
                    let init = decl.init.map(|e| self.eval_expr(&e, None));
                    return (None, init);
                }
            },
            None => None,
        };
        let init = decl.init.map(|e| self.eval_single(&e, declared.as_ref()));

        let kind = match (declared, &init) {
            (Some(kind), Some(value)) => {
                self.bind_value(&kind, decl.mutable, value, decl.span);
                Some(kind)
            }
            (Some(kind), None) => Some(kind),
            (None, Some(value)) if value.is_invalid() => None,
            (None, Some(value)) => match self.defaulted_kind(value) {
                Some(TypeKind::Nil) | None => {
                    self.error(decl.span, DiagnosticKey::InvalidExpr, vec![]);
                    None
                }
                Some(kind) => Some(kind),
            },
            (None, None) => {
                self.error(decl.span, DiagnosticKey::InvalidExpr, vec![]);
                None
            }
        };
        (kind, init)
    }

    /// Value of a `const` declaration, converted to its kind.
    fn folded_constant(&mut self, decl: &VarDecl<'_>, kind: Option<&TypeKind>, init: Option<&Value>) -> Option<Constant> {
        let init = init.filter(|v| !v.is_invalid());
        let Some(c) = init.and_then(|v| v.constant.clone()) else {
            if init.is_some() || decl.init.is_none() {
                self.error(decl.span, DiagnosticKey::ExprNotConst, vec![]);
            }
            return None;
        };
        match kind.and_then(TypeKind::underlying_prim) {
            Some(prim) if prim.is_numeric() => convert(&c, prim, self.width()).or(Some(c)),
            _ => Some(c),
        }
    }
}
