//! Primitive compatibility table and constant range checks.

use tern_core::{Constant, IntWidth, PrimKind, TypeKind};

/// Whether a `src` value may be used where `dest` is expected.
///
/// - `any` accepts everything unless `ignore_any` is set
/// - integers widen losslessly within their signedness, and unsigned values
///   widen into strictly larger signed kinds
/// - `f32` accepts `f32`, `i8`, `i16`, `u8` and `u16`
/// - `f64` accepts both float kinds and integers of at most 32 bits
/// - `bool` and `str` accept only themselves
pub fn prim_accepts(dest: PrimKind, src: PrimKind, ignore_any: bool, width: IntWidth) -> bool {
    if dest == src {
        return true;
    }
    if dest == PrimKind::Any || src == PrimKind::Any {
        return dest == PrimKind::Any && !ignore_any;
    }
    let d = dest.normalize(width);
    let s = src.normalize(width);
    if d == s {
        return true;
    }
    match d {
        PrimKind::F32 => matches!(
            s,
            PrimKind::F32 | PrimKind::I8 | PrimKind::I16 | PrimKind::U8 | PrimKind::U16
        ),
        PrimKind::F64 => s.is_float() || (s.is_integer() && s.bits(width) <= 32),
        _ if d.is_signed_int() && s.is_signed_int() => s.bits(width) <= d.bits(width),
        _ if d.is_unsigned_int() && s.is_unsigned_int() => s.bits(width) <= d.bits(width),
        _ if d.is_signed_int() && s.is_unsigned_int() => s.bits(width) < d.bits(width),
        _ => false,
    }
}

/// Outcome of checking a constant against a destination kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstFit {
    /// The constant is representable in the destination.
    Fits,
    /// Numeric destination, numeric constant, value out of range.
    Overflow,
    /// Float constant into an integer destination.
    FloatToInt,
    /// The range check does not apply; fall back to the kind table.
    NotApplicable,
}

/// Range-check a numeric constant against `dest` (a primitive or an enum's
/// underlying kind).
pub fn const_fit(dest: &TypeKind, value: &Constant, width: IntWidth) -> ConstFit {
    let Some(prim) = dest.underlying_prim() else {
        return ConstFit::NotApplicable;
    };
    if !prim.is_numeric() || matches!(dest, TypeKind::Enum(_)) {
        return ConstFit::NotApplicable;
    }
    match value {
        Constant::Int(_) | Constant::UInt(_) => {
            let v = value.as_i128().unwrap_or_default();
            if prim.fits_int(v, width) {
                ConstFit::Fits
            } else {
                ConstFit::Overflow
            }
        }
        Constant::Float(f) if prim.is_float() => {
            if prim.fits_float(*f) {
                ConstFit::Fits
            } else {
                ConstFit::Overflow
            }
        }
        Constant::Float(_) => ConstFit::FloatToInt,
        _ => ConstFit::NotApplicable,
    }
}
