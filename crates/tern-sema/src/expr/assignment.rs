//! Checks shared by every place a value is bound to a destination:
//! assignments, declarations, returns, arguments and composite entries.

use tern_core::{Constant, DiagnosticKey, PrimKind, Span, TypeKind};
use tern_registry::SymbolRegistry;

use crate::checker::Checker;
use crate::conversion::{ConstFit, const_fit};
use crate::model::ExprModel;
use crate::value::Value;

/// Whether binding a value of `kind` shares mutable state with its source,
/// so that an immutable source may not flow into a mutable destination.
pub(crate) fn needs_mut(registry: &SymbolRegistry, kind: &TypeKind) -> bool {
    needs_mut_guarded(registry, kind, 0)
}

fn needs_mut_guarded(registry: &SymbolRegistry, kind: &TypeKind, depth: usize) -> bool {
    // Recursive structs are only reachable through references.
    if depth > 32 {
        return false;
    }
    match kind {
        TypeKind::Ref(_) | TypeKind::Slice(_) | TypeKind::Map(_) | TypeKind::Ptr(Some(_)) => true,
        TypeKind::Array(array) => needs_mut_guarded(registry, &array.elem, depth + 1),
        TypeKind::Struct(s) => registry.get_struct(s.decl).is_some_and(|def| {
            def.fields.iter().any(|f| {
                let field = f.kind.substitute(&def.generics, &s.generics);
                needs_mut_guarded(registry, &field, depth + 1)
            })
        }),
        _ => false,
    }
}

impl<'r> Checker<'r> {
    /// Check that `value` may be stored where `dest` is expected. Reports
    /// and returns `false` otherwise.
    pub(crate) fn check_value_against(&mut self, dest: &TypeKind, value: &Value, span: Span) -> bool {
        if value.is_invalid() {
            return false;
        }
        let Some(src) = value.kind.as_ref() else {
            self.error(span, DiagnosticKey::VoidInValueContext, vec![]);
            return false;
        };
        if let Some(c) = &value.constant {
            match const_fit(dest, c, self.width()) {
                ConstFit::Fits => return true,
                ConstFit::Overflow => {
                    self.error(
                        span,
                        DiagnosticKey::OverflowLimits,
                        vec![c.to_string(), dest.to_string()],
                    );
                    return false;
                }
                ConstFit::FloatToInt | ConstFit::NotApplicable => {}
            }
        }
        let before = self.diagnostics.len();
        if self.compatible(dest, src, false, true, span) {
            return true;
        }
        if self.diagnostics.len() == before {
            self.incompatible(span, dest, src);
        }
        false
    }

    /// Check that `value` can be the target of an assignment.
    pub(crate) fn check_assignable(&mut self, value: &Value, span: Span) -> bool {
        if value.is_invalid() {
            return false;
        }
        if value.is_constant() {
            self.error(span, DiagnosticKey::AssignConst, vec![]);
            return false;
        }
        if !value.lvalue {
            self.error(span, DiagnosticKey::AssignRequireLvalue, vec![]);
            return false;
        }
        if !value.mutable {
            let name = self.value_name(value);
            self.error(span, DiagnosticKey::AssignToNonMut, vec![name]);
            return false;
        }
        true
    }

    /// Bind `value` to a fresh destination of `dest` kind.
    pub(crate) fn bind_value(&mut self, dest: &TypeKind, dest_mutable: bool, value: &Value, span: Span) -> bool {
        if value.is_invalid() {
            return false;
        }
        if dest_mutable && value.lvalue && !value.mutable && needs_mut(self.registry, dest) {
            self.error(span, DiagnosticKey::AssignmentNonMutToMut, vec![dest.to_string()]);
            return false;
        }
        self.check_value_against(dest, value, span)
    }

    /// Kind a declaration without a written type takes from its value.
    /// Untyped integers default to `int` and untyped floats to `f64`.
    pub(crate) fn defaulted_kind(&self, value: &Value) -> Option<TypeKind> {
        let kind = value.kind.clone()?;
        if !value.untyped {
            return Some(kind);
        }
        match &value.constant {
            Some(c @ (Constant::Int(_) | Constant::UInt(_))) => {
                let v = c.as_i128().unwrap_or_default();
                if PrimKind::Int.fits_int(v, self.width()) {
                    Some(TypeKind::int())
                } else {
                    Some(kind)
                }
            }
            Some(Constant::Float(_)) => Some(PrimKind::F64.into()),
            _ => Some(kind),
        }
    }

    fn value_name(&self, value: &Value) -> String {
        match &value.model {
            ExprModel::Local(id) => self.tree.local(*id).name.clone(),
            ExprModel::Global { name, .. } => name.clone(),
            ExprModel::Field { name, .. } => name.clone(),
            _ => value
                .kind
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}
