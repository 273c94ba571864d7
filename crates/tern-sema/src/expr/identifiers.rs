//! Identifier resolution: locals first, then the registry.

use tern_ast::IdentExpr;
use tern_core::{DiagnosticKey, TypeKind};
use tern_registry::{Lookup, SymbolRegistry};

use crate::checker::Checker;
use crate::model::ExprModel;
use crate::value::Value;

impl<'r> Checker<'r> {
    pub(crate) fn eval_ident(&mut self, ident: &IdentExpr<'_>) -> Value {
        let name = ident.ident.name;
        if !ident.generics.is_empty() {
            self.error(
                ident.span,
                DiagnosticKey::GenericsCountMismatch,
                vec![name.to_string(), "0".to_string()],
            );
            return Value::invalid();
        }

        if let Some(package) = ident.package {
            let registry = self.registry;
            let Some(pkg) = registry.find_package(package.name) else {
                self.error(package.span, DiagnosticKey::IdentNotExist, vec![package.name.to_string()]);
                return Value::invalid();
            };
            return self.ident_in_registry(&pkg.registry, ident);
        }

        if !ident.cpp_linked {
            if let Some(id) = self.tree.lookup_local(self.current, name) {
                self.tree.mark_used(id);
                let local = self.tree.local(id);
                return match &local.constant {
                    Some(c) => Value::constant(local.kind.clone(), c.clone()),
                    None => Value::lvalue(local.kind.clone(), local.mutable, ExprModel::Local(id)),
                };
            }
        }
        let registry = self.registry;
        self.ident_in_registry(registry, ident)
    }

    fn ident_in_registry(&mut self, registry: &SymbolRegistry, ident: &IdentExpr<'_>) -> Value {
        let name = ident.ident.name;
        if let Some(var) = registry.find_var(name, ident.cpp_linked) {
            return match &var.constant {
                Some(c) => Value::constant(var.kind.clone(), c.clone()),
                None => Value::lvalue(
                    var.kind.clone(),
                    var.mutable,
                    ExprModel::Global {
                        name: var.name.clone(),
                        cpp_linked: var.cpp_linked,
                    },
                ),
            };
        }
        if let Some(def) = registry.find_fn(name, ident.cpp_linked) {
            return Value::new(TypeKind::Fn(Box::new(def.kind())), ExprModel::Fn(def.hash));
        }
        self.error(ident.ident.span, DiagnosticKey::IdentNotExist, vec![name.to_string()]);
        Value::invalid()
    }
}
