//! Constant folding arithmetic.
//!
//! Integer arithmetic runs in `i128` so overflow of the 64-bit kinds is
//! observable; the caller decides the resulting kind and reports values that
//! fit nothing.

use tern_core::{BinaryOp, Constant, IntWidth, PrimKind};

/// Store `v` in the payload class matching `kind`'s signedness.
pub fn int_const(v: i128, kind: PrimKind) -> Constant {
    if kind.is_unsigned_int() {
        Constant::UInt(v as u64)
    } else {
        Constant::Int(v as i64)
    }
}

/// The wider of two numeric kinds. Floats outrank integers; ties keep `a`.
pub fn wider(a: PrimKind, b: PrimKind, width: IntWidth) -> PrimKind {
    match (a.is_float(), b.is_float()) {
        (true, false) => a,
        (false, true) => b,
        _ if b.bits(width) > a.bits(width) => b,
        _ => a,
    }
}

/// Narrowest integer kind holding `v`, unsigned for non-negative values.
pub fn min_int_kind(v: i128) -> Option<PrimKind> {
    if v >= 0 {
        u64::try_from(v).ok().map(PrimKind::min_unsigned_for)
    } else {
        i64::try_from(v).ok().map(PrimKind::min_signed_for)
    }
}

/// Kind for a folded integer: `base` when `v` fits it, otherwise the
/// narrowest kind holding `v` that is at least as wide as `base`.
///
/// `None` when no 64-bit kind holds `v`.
pub fn widen_to_fit(v: i128, base: PrimKind, width: IntWidth) -> Option<PrimKind> {
    if base.fits_int(v, width) {
        return Some(base);
    }
    let min_bits = base.bits(width);
    let ladders: [&[PrimKind]; 2] = if v < 0 {
        [&PrimKind::SIGNED_LADDER, &[]]
    } else if base.is_signed_int() {
        [&PrimKind::SIGNED_LADDER, &PrimKind::UNSIGNED_LADDER]
    } else {
        [&PrimKind::UNSIGNED_LADDER, &PrimKind::SIGNED_LADDER]
    };
    ladders
        .iter()
        .flat_map(|ladder| ladder.iter())
        .copied()
        .find(|k| k.bits(width) >= min_bits && k.fits_int(v, width))
        .or_else(|| min_int_kind(v))
}

/// Minimum kind for `value << count` before the value itself is considered.
///
/// Counts up to 6 stay in `i8`, up to 14 in `i16`, up to 30 in `i32`, up to
/// 62 in `i64`; 63 needs `u64` and anything larger only fits `f64`.
pub fn shift_ladder(count: u64) -> PrimKind {
    match count {
        0..=6 => PrimKind::I8,
        7..=14 => PrimKind::I16,
        15..=30 => PrimKind::I32,
        31..=62 => PrimKind::I64,
        63 => PrimKind::U64,
        _ => PrimKind::F64,
    }
}

/// Fold an integer arithmetic, bitwise or shift operator.
///
/// Returns `None` for division or modulo by zero.
pub fn fold_int(op: BinaryOp, a: i128, b: i128) -> Option<i128> {
    Some(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a.checked_mul(b).unwrap_or(i128::MAX),
        BinaryOp::Div => a.checked_div(b)?,
        BinaryOp::Mod => a.checked_rem(b)?,
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::Shl => match u32::try_from(b) {
            Ok(n) if n < 64 => a.checked_mul(1i128 << n).unwrap_or(i128::MAX),
            _ => i128::MAX,
        },
        BinaryOp::Shr => match u32::try_from(b) {
            Ok(n) if n < 127 => a >> n,
            _ if a < 0 => -1,
            _ => 0,
        },
        _ => return None,
    })
}

pub fn fold_float(op: BinaryOp, a: f64, b: f64) -> Option<f64> {
    match op {
        BinaryOp::Add => Some(a + b),
        BinaryOp::Sub => Some(a - b),
        BinaryOp::Mul => Some(a * b),
        BinaryOp::Div if b == 0.0 => None,
        BinaryOp::Div => Some(a / b),
        _ => None,
    }
}

/// Evaluate a comparison operator.
pub fn compare<T: PartialOrd + ?Sized>(op: BinaryOp, a: &T, b: &T) -> bool {
    match op {
        BinaryOp::Eq => a == b,
        BinaryOp::NotEq => a != b,
        BinaryOp::Lt => a < b,
        BinaryOp::LtEq => a <= b,
        BinaryOp::Gt => a > b,
        BinaryOp::GtEq => a >= b,
        _ => false,
    }
}

/// Truncate `v` to the bits of integer kind `to`, two's complement.
pub fn wrap_int(v: i128, to: PrimKind, width: IntWidth) -> i128 {
    let bits = to.bits(width);
    if bits == 0 || bits >= 128 {
        return v;
    }
    let mask = (1i128 << bits) - 1;
    let truncated = v & mask;
    if to.is_signed_int() && truncated >> (bits - 1) & 1 == 1 {
        truncated - (1i128 << bits)
    } else {
        truncated
    }
}

/// Convert a constant for an explicit cast to primitive `to`.
///
/// `None` when the conversion does not produce a constant.
pub fn convert(value: &Constant, to: PrimKind, width: IntWidth) -> Option<Constant> {
    match value {
        Constant::Int(_) | Constant::UInt(_) => {
            let v = value.as_i128()?;
            if to.is_integer() {
                Some(int_const(wrap_int(v, to, width), to))
            } else if to == PrimKind::F32 {
                Some(Constant::Float(v as f32 as f64))
            } else if to == PrimKind::F64 {
                Some(Constant::Float(v as f64))
            } else if to == PrimKind::Str {
                let c = u32::try_from(v)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                Some(Constant::Str(c.to_string().into_bytes()))
            } else {
                None
            }
        }
        Constant::Float(f) => {
            if to.is_integer() {
                Some(int_const(wrap_int(*f as i128, to, width), to))
            } else if to == PrimKind::F32 {
                Some(Constant::Float(*f as f32 as f64))
            } else if to == PrimKind::F64 {
                Some(Constant::Float(*f))
            } else {
                None
            }
        }
        Constant::Bool(_) if to == PrimKind::Bool => Some(value.clone()),
        Constant::Str(_) if to == PrimKind::Str => Some(value.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const W: IntWidth = IntWidth::W64;

    #[test]
    fn ladder_boundaries() {
        assert_eq!(shift_ladder(6), PrimKind::I8);
        assert_eq!(shift_ladder(7), PrimKind::I16);
        assert_eq!(shift_ladder(14), PrimKind::I16);
        assert_eq!(shift_ladder(15), PrimKind::I32);
        assert_eq!(shift_ladder(30), PrimKind::I32);
        assert_eq!(shift_ladder(31), PrimKind::I64);
        assert_eq!(shift_ladder(62), PrimKind::I64);
        assert_eq!(shift_ladder(63), PrimKind::U64);
        assert_eq!(shift_ladder(64), PrimKind::F64);
    }

    #[test]
    fn widening_keeps_fitting_base() {
        assert_eq!(widen_to_fit(100, PrimKind::U8, W), Some(PrimKind::U8));
        assert_eq!(widen_to_fit(300, PrimKind::U8, W), Some(PrimKind::U16));
        assert_eq!(widen_to_fit(-2, PrimKind::U8, W), Some(PrimKind::I8));
        assert_eq!(widen_to_fit(-2, PrimKind::U16, W), Some(PrimKind::I16));
        assert_eq!(widen_to_fit(1 << 63, PrimKind::I64, W), Some(PrimKind::U64));
        assert_eq!(widen_to_fit(1 << 64, PrimKind::U64, W), None);
    }

    #[test]
    fn division_by_zero_does_not_fold() {
        assert_eq!(fold_int(BinaryOp::Div, 5, 0), None);
        assert_eq!(fold_int(BinaryOp::Mod, 5, 0), None);
        assert_eq!(fold_float(BinaryOp::Div, 5.0, 0.0), None);
        assert_eq!(fold_int(BinaryOp::Div, 7, 2), Some(3));
    }

    #[test]
    fn wrap_is_twos_complement() {
        assert_eq!(wrap_int(300, PrimKind::U8, W), 44);
        assert_eq!(wrap_int(255, PrimKind::I8, W), -1);
        assert_eq!(wrap_int(-1, PrimKind::U16, W), 65535);
    }

    #[test]
    fn int_to_str_conversion_encodes_scalar() {
        assert_eq!(
            convert(&Constant::Int(65), PrimKind::Str, W),
            Some(Constant::Str(b"A".to_vec()))
        );
        assert_eq!(convert(&Constant::Float(2.9), PrimKind::I32, W), Some(Constant::Int(2)));
    }

    proptest! {
        #[test]
        fn widened_kind_always_holds_value(v in any::<i64>()) {
            let kind = widen_to_fit(v as i128, PrimKind::U8, W).unwrap();
            prop_assert!(kind.fits_int(v as i128, W));
        }

        #[test]
        fn one_shifted_fits_its_ladder_kind(n in 0u64..=63) {
            let folded = fold_int(BinaryOp::Shl, 1, n as i128).unwrap();
            prop_assert!(shift_ladder(n).fits_int(folded, W));
        }
    }
}
