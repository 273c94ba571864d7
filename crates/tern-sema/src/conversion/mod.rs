//! Type compatibility.
//!
//! [`Checker::compatible`] decides whether a value of one kind may be used
//! where another is expected. Checks run in this order:
//! 1. Tuples, which are never compatible
//! 2. `nil` against nil-compatible kinds
//! 3. `any`, which accepts every single value unless `ignore_any` is set
//! 4. Traits, which accept implementing structs and inheriting traits
//! 5. Reference against non-reference, optionally dereferencing once
//! 6. Raw pointers, where `*unsafe` matches any pointer
//! 7. Structs, by declaration and generic arguments
//! 8. Primitives, through the table in [`primitive`]
//! 9. Everything else by exact kind equality
//!
//! The check only records a diagnostic for the trait receiver rule; callers
//! report `incompatible_types` themselves.

mod cast;
mod primitive;
mod traits;

pub use primitive::{ConstFit, const_fit, prim_accepts};

use tern_core::{Span, TypeKind};

use crate::checker::Checker;

impl<'r> Checker<'r> {
    /// Whether `src` may be used where `dest` is expected.
    ///
    /// `ignore_any` makes `any` accept only `any`. `allow_deref` lets a
    /// reference match a non-reference kind by dereferencing once.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compatible(
        &mut self,
        dest: &TypeKind,
        src: &TypeKind,
        ignore_any: bool,
        allow_deref: bool,
        span: Span,
    ) -> bool {
        if matches!(dest, TypeKind::Tuple(_)) || matches!(src, TypeKind::Tuple(_)) {
            return false;
        }
        if dest == src {
            return true;
        }
        if ignore_any && (dest.is_any() || src.is_any()) {
            return false;
        }
        if src.is_nil() {
            return dest.is_nil_compatible();
        }
        if dest.is_nil() {
            return src.is_nil_compatible();
        }
        if dest.is_any() {
            return true;
        }
        if let TypeKind::Trait(tr) = dest {
            return self.trait_accepts(tr, src, span);
        }
        if dest.is_ref() != src.is_ref() {
            return allow_deref && self.compatible(dest.deref(), src.deref(), ignore_any, false, span);
        }
        match (dest, src) {
            (TypeKind::Ptr(_), TypeKind::Ptr(_)) => dest.is_unsafe_ptr() || src.is_unsafe_ptr(),
            (TypeKind::Struct(d), TypeKind::Struct(s)) => {
                d.decl == s.decl
                    && d.generics.len() == s.generics.len()
                    && d.generics
                        .iter()
                        .zip(&s.generics)
                        .all(|(dg, sg)| self.compatible(dg, sg, true, false, span))
            }
            (TypeKind::Prim(d), TypeKind::Prim(s)) => prim_accepts(*d, *s, ignore_any, self.width()),
            _ => false,
        }
    }
}
