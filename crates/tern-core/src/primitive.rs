//! Primitive type kinds.
//!
//! The numeric id of each kind is fixed (`#[repr(u8)]`) and is what the
//! compatibility table in the checker is keyed by. `int`, `uint` and
//! `uintptr` are platform sized: their width comes from [`IntWidth`].

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Bit width used for the platform-sized integer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntWidth {
    W32,
    #[default]
    W64,
}

impl IntWidth {
    pub const fn bits(self) -> u32 {
        match self {
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }
}

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum PrimKind {
    I8 = 1,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Int,
    Uint,
    Uintptr,
    F32,
    F64,
    Bool,
    Str,
    Any,
}

impl PrimKind {
    /// Signed ladder used for literal width inference.
    pub const SIGNED_LADDER: [PrimKind; 4] = [PrimKind::I8, PrimKind::I16, PrimKind::I32, PrimKind::I64];
    /// Unsigned ladder used for literal width inference.
    pub const UNSIGNED_LADDER: [PrimKind; 4] = [PrimKind::U8, PrimKind::U16, PrimKind::U32, PrimKind::U64];

    pub const fn name(self) -> &'static str {
        match self {
            PrimKind::I8 => "i8",
            PrimKind::I16 => "i16",
            PrimKind::I32 => "i32",
            PrimKind::I64 => "i64",
            PrimKind::U8 => "u8",
            PrimKind::U16 => "u16",
            PrimKind::U32 => "u32",
            PrimKind::U64 => "u64",
            PrimKind::Int => "int",
            PrimKind::Uint => "uint",
            PrimKind::Uintptr => "uintptr",
            PrimKind::F32 => "f32",
            PrimKind::F64 => "f64",
            PrimKind::Bool => "bool",
            PrimKind::Str => "str",
            PrimKind::Any => "any",
        }
    }

    /// Look a primitive up by its source spelling, including the `byte` and
    /// `rune` aliases.
    pub fn from_name(name: &str) -> Option<PrimKind> {
        Some(match name {
            "i8" => PrimKind::I8,
            "i16" => PrimKind::I16,
            "i32" | "rune" => PrimKind::I32,
            "i64" => PrimKind::I64,
            "u8" | "byte" => PrimKind::U8,
            "u16" => PrimKind::U16,
            "u32" => PrimKind::U32,
            "u64" => PrimKind::U64,
            "int" => PrimKind::Int,
            "uint" => PrimKind::Uint,
            "uintptr" => PrimKind::Uintptr,
            "f32" => PrimKind::F32,
            "f64" => PrimKind::F64,
            "bool" => PrimKind::Bool,
            "str" => PrimKind::Str,
            "any" => PrimKind::Any,
            _ => return None,
        })
    }

    /// Numeric id of this kind.
    #[inline]
    pub fn id(self) -> u8 {
        self.into()
    }

    /// Replace the platform-sized kinds with their fixed-width equivalent.
    pub const fn normalize(self, width: IntWidth) -> PrimKind {
        match (self, width) {
            (PrimKind::Int, IntWidth::W32) => PrimKind::I32,
            (PrimKind::Int, IntWidth::W64) => PrimKind::I64,
            (PrimKind::Uint | PrimKind::Uintptr, IntWidth::W32) => PrimKind::U32,
            (PrimKind::Uint | PrimKind::Uintptr, IntWidth::W64) => PrimKind::U64,
            (other, _) => other,
        }
    }

    /// Bit width of a numeric kind, 0 for non-numeric kinds.
    pub const fn bits(self, width: IntWidth) -> u32 {
        match self.normalize(width) {
            PrimKind::I8 | PrimKind::U8 => 8,
            PrimKind::I16 | PrimKind::U16 => 16,
            PrimKind::I32 | PrimKind::U32 | PrimKind::F32 => 32,
            PrimKind::I64 | PrimKind::U64 | PrimKind::F64 => 64,
            _ => 0,
        }
    }

    pub const fn is_signed_int(self) -> bool {
        matches!(self, PrimKind::I8 | PrimKind::I16 | PrimKind::I32 | PrimKind::I64 | PrimKind::Int)
    }

    pub const fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            PrimKind::U8 | PrimKind::U16 | PrimKind::U32 | PrimKind::U64 | PrimKind::Uint | PrimKind::Uintptr
        )
    }

    pub const fn is_integer(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    pub const fn is_float(self) -> bool {
        matches!(self, PrimKind::F32 | PrimKind::F64)
    }

    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Narrowest signed kind holding `v`.
    pub fn min_signed_for(v: i64) -> PrimKind {
        if i8::try_from(v).is_ok() {
            PrimKind::I8
        } else if i16::try_from(v).is_ok() {
            PrimKind::I16
        } else if i32::try_from(v).is_ok() {
            PrimKind::I32
        } else {
            PrimKind::I64
        }
    }

    /// Narrowest unsigned kind holding `v`.
    pub fn min_unsigned_for(v: u64) -> PrimKind {
        if u8::try_from(v).is_ok() {
            PrimKind::U8
        } else if u16::try_from(v).is_ok() {
            PrimKind::U16
        } else if u32::try_from(v).is_ok() {
            PrimKind::U32
        } else {
            PrimKind::U64
        }
    }

    /// Inclusive signed range of an integer kind.
    pub fn int_range(self, width: IntWidth) -> Option<(i128, i128)> {
        let bits = self.bits(width);
        if self.is_signed_int() {
            let half = 1i128 << (bits - 1);
            Some((-half, half - 1))
        } else if self.is_unsigned_int() {
            Some((0, (1i128 << bits) - 1))
        } else {
            None
        }
    }

    /// Whether the integer `v` is representable in this kind.
    pub fn fits_int(self, v: i128, width: IntWidth) -> bool {
        match self.normalize(width) {
            PrimKind::F32 => v.unsigned_abs() <= 1u128 << 24 || (v as f32) as i128 == v,
            PrimKind::F64 => v.unsigned_abs() <= 1u128 << 53 || (v as f64) as i128 == v,
            _ => self
                .int_range(width)
                .is_some_and(|(lo, hi)| (lo..=hi).contains(&v)),
        }
    }

    /// Whether the float `v` is within the finite range of this float kind.
    pub fn fits_float(self, v: f64) -> bool {
        match self {
            PrimKind::F32 => v.is_nan() || v.abs() <= f32::MAX as f64,
            PrimKind::F64 => true,
            _ => false,
        }
    }
}

impl fmt::Display for PrimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve() {
        assert_eq!(PrimKind::from_name("byte"), Some(PrimKind::U8));
        assert_eq!(PrimKind::from_name("rune"), Some(PrimKind::I32));
        assert_eq!(PrimKind::from_name("float"), None);
    }

    #[test]
    fn ids_round_trip_through_num_enum() {
        for id in 1u8..=16 {
            let kind = PrimKind::try_from(id).unwrap();
            assert_eq!(kind.id(), id);
        }
        assert!(PrimKind::try_from(0u8).is_err());
    }

    #[test]
    fn platform_kinds_follow_width() {
        assert_eq!(PrimKind::Int.bits(IntWidth::W32), 32);
        assert_eq!(PrimKind::Uintptr.bits(IntWidth::W64), 64);
        assert_eq!(PrimKind::Uint.normalize(IntWidth::W32), PrimKind::U32);
    }

    #[test]
    fn narrowest_kinds() {
        assert_eq!(PrimKind::min_unsigned_for(200), PrimKind::U8);
        assert_eq!(PrimKind::min_unsigned_for(256), PrimKind::U16);
        assert_eq!(PrimKind::min_signed_for(-200), PrimKind::I16);
        assert_eq!(PrimKind::min_signed_for(-128), PrimKind::I8);
        assert_eq!(PrimKind::min_signed_for(i64::MIN), PrimKind::I64);
    }

    #[test]
    fn range_checks() {
        let w = IntWidth::W64;
        assert!(PrimKind::U8.fits_int(255, w));
        assert!(!PrimKind::U8.fits_int(300, w));
        assert!(!PrimKind::U8.fits_int(-1, w));
        assert!(PrimKind::I8.fits_int(-128, w));
        assert!(!PrimKind::Int.fits_int(i64::MAX as i128 + 1, w));
        assert!(!PrimKind::Int.fits_int(1 << 40, IntWidth::W32));
        assert!(!PrimKind::F32.fits_float(1e300));
    }
}
