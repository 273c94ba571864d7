//! Member access: struct fields, methods, trait methods and enum items.

use tern_ast::{Expr, IdentExpr, MemberExpr};
use tern_core::{DiagnosticKey, TypeKind};
use tern_registry::{EnumDef, Lookup};

use crate::checker::Checker;
use crate::model::ExprModel;
use crate::value::Value;

impl<'r> Checker<'r> {
    pub(crate) fn eval_member(&mut self, member: &MemberExpr<'_>) -> Value {
        if let Expr::Ident(ident) = member.base {
            if let Some(def) = self.enum_named(ident) {
                return self.enum_item(def, member);
            }
        }

        let base = self.eval_single(member.base, None);
        let Some(base_kind) = base.kind.clone() else {
            return Value::invalid();
        };
        let through_ref = base_kind.is_ref();
        let name = member.member.name;

        match base_kind.deref() {
            TypeKind::Struct(s) => {
                let registry = self.registry;
                if let Some(def) = registry.get_struct(s.decl) {
                    if let Some(field) = def.field(name) {
                        let kind = field.kind.substitute(&def.generics, &s.generics);
                        let model = ExprModel::Field {
                            base: base.model.boxed(),
                            name: name.to_string(),
                        };
                        return Value {
                            lvalue: base.lvalue || through_ref,
                            ..Value::lvalue(kind, base.mutable, model)
                        };
                    }
                    if let Some(hash) = def.method(name) {
                        if let Some(method) = registry.get_fn(hash) {
                            let kind = TypeKind::Fn(Box::new(method.kind())).substitute(&def.generics, &s.generics);
                            let model = ExprModel::Method {
                                base: base.model.boxed(),
                                method: hash,
                            };
                            return Value::new(kind, model);
                        }
                    }
                }
            }
            TypeKind::Trait(t) => {
                let registry = self.registry;
                if let Some(method) = registry.get_trait(t.decl).and_then(|def| def.method(name)) {
                    let model = ExprModel::TraitMethod {
                        base: base.model.boxed(),
                        name: name.to_string(),
                    };
                    return Value::new(TypeKind::Fn(Box::new(method.kind.clone())), model);
                }
            }
            _ => {}
        }

        self.error(
            member.member.span,
            DiagnosticKey::ObjHaveNotIdent,
            vec![base_kind.to_string(), name.to_string()],
        );
        Value::invalid()
    }

    /// The enum an identifier names, unless a local shadows it.
    fn enum_named(&self, ident: &IdentExpr<'_>) -> Option<&'r EnumDef> {
        let registry = self.registry;
        match ident.package {
            Some(package) => registry
                .find_package(package.name)
                .and_then(|pkg| pkg.registry.find_enum(ident.ident.name, ident.cpp_linked)),
            None => {
                if self.tree.lookup_local(self.current, ident.ident.name).is_some() {
                    return None;
                }
                registry.find_enum(ident.ident.name, ident.cpp_linked)
            }
        }
    }

    fn enum_item(&mut self, def: &EnumDef, member: &MemberExpr<'_>) -> Value {
        match def.item(member.member.name) {
            Some(item) => Value::constant(def.kind(), item.value.clone()),
            None => {
                self.error(
                    member.member.span,
                    DiagnosticKey::ObjHaveNotIdent,
                    vec![def.name.clone(), member.member.name.to_string()],
                );
                Value::invalid()
            }
        }
    }
}
