//! Trait satisfaction.

use tern_core::{DiagnosticKey, Span, StructKind, TraitKind, TypeKind};

use crate::checker::Checker;

/// How a value relates to a trait it is converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraitFit {
    Satisfied,
    /// The struct implements the trait, but only a reference to it does.
    NeedsReference,
    Unrelated,
}

impl<'r> Checker<'r> {
    /// Whether a `src` value satisfies trait `tr`.
    ///
    /// A struct satisfies a trait it implements. When the trait has methods
    /// with a `&self` receiver only a reference to the struct does, and a
    /// struct value is reported with `trait_has_reference_parametered_function`.
    pub(crate) fn trait_accepts(&mut self, tr: &TraitKind, src: &TypeKind, span: Span) -> bool {
        match self.trait_fit(tr, src) {
            TraitFit::Satisfied => true,
            TraitFit::NeedsReference => {
                let struct_name = match src {
                    TypeKind::Struct(s) => s.name.clone(),
                    other => other.to_string(),
                };
                self.error(
                    span,
                    DiagnosticKey::TraitHasReferenceParameteredFunction,
                    vec![tr.name.clone(), struct_name],
                );
                false
            }
            TraitFit::Unrelated => false,
        }
    }

    /// Whether `src` satisfies `dest` when `dest` is a trait, without
    /// reporting anything. Non-trait destinations are never satisfied.
    pub(crate) fn trait_satisfied(&self, dest: &TypeKind, src: &TypeKind) -> bool {
        match dest {
            TypeKind::Trait(tr) => self.trait_fit(tr, src) == TraitFit::Satisfied,
            _ => false,
        }
    }

    fn trait_fit(&self, tr: &TraitKind, src: &TypeKind) -> TraitFit {
        let registry = self.registry;
        let fit = |ok: bool| if ok { TraitFit::Satisfied } else { TraitFit::Unrelated };
        match src {
            TypeKind::Trait(other) => fit(other.decl == tr.decl || registry.trait_inherits(other.decl, tr.decl)),
            TypeKind::Struct(s) => {
                if !self.struct_implements(s, tr) {
                    return TraitFit::Unrelated;
                }
                let by_reference = registry
                    .get_trait(tr.decl)
                    .is_some_and(|def| def.has_reference_receiver());
                if by_reference {
                    TraitFit::NeedsReference
                } else {
                    TraitFit::Satisfied
                }
            }
            TypeKind::Ref(inner) => match inner.as_ref() {
                TypeKind::Struct(s) => fit(self.struct_implements(s, tr)),
                _ => TraitFit::Unrelated,
            },
            _ => TraitFit::Unrelated,
        }
    }

    fn struct_implements(&self, s: &StructKind, tr: &TraitKind) -> bool {
        let registry = self.registry;
        registry.get_struct(s.decl).is_some_and(|def| {
            def.implements(tr.decl)
                || def
                    .traits
                    .iter()
                    .any(|implemented| registry.trait_inherits(*implemented, tr.decl))
        })
    }
}
