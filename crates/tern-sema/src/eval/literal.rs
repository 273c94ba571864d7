//! Literal evaluation.
//!
//! Literals become typed constants:
//! - integers take the narrowest unsigned kind (`u8` to `u64`), or the
//!   narrowest signed kind when written with a leading `-`
//! - floats are `f64`, narrowed to `f32` when the context asks for `f32` and
//!   the value survives the round trip
//! - strings decode escapes into bytes
//! - a rune written as a single ASCII byte, `\xHH` or `\NNN` is a `u8`;
//!   every other rune is an `i32` Unicode scalar
//!
//! Malformed literals evaluate to zero of the literal's default kind; the
//! parser is responsible for rejecting them.

use tern_ast::{LiteralExpr, LiteralKind};
use tern_core::{Constant, PrimKind, TypeKind};

use crate::model::ExprModel;
use crate::value::Value;

/// Evaluate a literal. `hint` is the kind the context expects, if any.
pub fn eval_literal(lit: &LiteralExpr<'_>, hint: Option<&TypeKind>) -> Value {
    match lit.kind {
        LiteralKind::Int => int_literal(lit.raw),
        LiteralKind::Float => float_literal(lit.raw, hint.and_then(TypeKind::prim)),
        LiteralKind::Str => Value::literal(PrimKind::Str, Constant::Str(decode_string(lit.raw))),
        LiteralKind::RawStr => {
            Value::literal(PrimKind::Str, Constant::Str(lit.raw.as_bytes().to_vec()))
        }
        LiteralKind::Rune => rune_literal(lit.raw),
        LiteralKind::Bool(b) => Value::literal(PrimKind::Bool, Constant::Bool(b)),
        LiteralKind::Nil => Value::new(TypeKind::Nil, ExprModel::Nil),
    }
}

// ============================================================================
// Integers
// ============================================================================

/// Split an integer literal into sign and magnitude.
///
/// Accepts `0x`/`0X` hex, `0b`/`0B` binary, `0o`/`0O` or leading-zero octal
/// and decimal digits, with `_` separators.
pub fn parse_int(raw: &str) -> Option<(bool, u64)> {
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let digits: String = body.chars().filter(|c| *c != '_').collect();
    let (radix, digits) = if let Some(hex) = digits.strip_prefix("0x").or(digits.strip_prefix("0X")) {
        (16, hex.to_string())
    } else if let Some(bin) = digits.strip_prefix("0b").or(digits.strip_prefix("0B")) {
        (2, bin.to_string())
    } else if let Some(oct) = digits.strip_prefix("0o").or(digits.strip_prefix("0O")) {
        (8, oct.to_string())
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, digits[1..].to_string())
    } else {
        (10, digits)
    };
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(&digits, radix)
        .ok()
        .map(|magnitude| (negative, magnitude))
}

pub fn int_literal(raw: &str) -> Value {
    match parse_int(raw) {
        Some((false, magnitude)) => {
            let kind = PrimKind::min_unsigned_for(magnitude);
            Value::literal(kind, Constant::UInt(magnitude))
        }
        Some((true, magnitude)) => match i64::try_from(-(magnitude as i128)) {
            Ok(v) => Value::literal(PrimKind::min_signed_for(v), Constant::Int(v)),
            Err(_) => Value::literal(PrimKind::I8, Constant::Int(0)),
        },
        None => Value::literal(PrimKind::U8, Constant::UInt(0)),
    }
}

// ============================================================================
// Floats
// ============================================================================

pub fn float_literal(raw: &str, hint: Option<PrimKind>) -> Value {
    let text: String = raw.chars().filter(|c| *c != '_').collect();
    let value = text.parse::<f64>().unwrap_or(0.0);
    if hint == Some(PrimKind::F32) && narrows_to_f32(value) {
        return Value::literal(PrimKind::F32, Constant::Float(value as f32 as f64));
    }
    Value::literal(PrimKind::F64, Constant::Float(value))
}

/// Whether printing `v` as `f32` and reading it back yields `v`.
fn narrows_to_f32(v: f64) -> bool {
    let narrow = v as f32;
    narrow.is_finite() && format!("{narrow}").parse::<f64>() == Ok(v)
}

// ============================================================================
// Strings and runes
// ============================================================================

/// Decode the escapes of an interpreted string body.
pub fn decode_string(raw: &str) -> Vec<u8> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        match decode_escape(&bytes[i..]) {
            Some((Escape::Byte(b), len)) => {
                out.push(b);
                i += len;
            }
            Some((Escape::Scalar(c), len)) => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                i += len;
            }
            None => {
                out.push(b'\\');
                i += 1;
            }
        }
    }
    out
}

pub fn rune_literal(raw: &str) -> Value {
    let bytes = raw.as_bytes();
    if bytes.len() == 1 && bytes[0].is_ascii() {
        return Value::literal(PrimKind::U8, Constant::UInt(bytes[0] as u64));
    }
    if bytes.first() == Some(&b'\\') {
        return match decode_escape(bytes) {
            Some((Escape::Byte(b), len)) if len == bytes.len() && is_byte_escape(bytes) => {
                Value::literal(PrimKind::U8, Constant::UInt(b as u64))
            }
            Some((Escape::Byte(b), _)) => Value::literal(PrimKind::I32, Constant::Int(b as i64)),
            Some((Escape::Scalar(c), _)) => {
                Value::literal(PrimKind::I32, Constant::Int(c as u32 as i64))
            }
            None => Value::literal(PrimKind::I32, Constant::Int(0)),
        };
    }
    let scalar = raw.chars().next().map_or(0, |c| c as u32 as i64);
    Value::literal(PrimKind::I32, Constant::Int(scalar))
}

fn is_byte_escape(bytes: &[u8]) -> bool {
    match bytes.get(1) {
        Some(b'x') => bytes.len() == 4,
        Some(b'0'..=b'7') => bytes.len() == 4,
        _ => false,
    }
}

enum Escape {
    Byte(u8),
    Scalar(char),
}

/// Decode the escape at the start of `bytes` (which begins with `\`).
/// Returns the decoded unit and the number of input bytes consumed.
fn decode_escape(bytes: &[u8]) -> Option<(Escape, usize)> {
    let simple = |b: u8| Some((Escape::Byte(b), 2));
    match *bytes.get(1)? {
        b'n' => simple(b'\n'),
        b't' => simple(b'\t'),
        b'r' => simple(b'\r'),
        b'a' => simple(0x07),
        b'b' => simple(0x08),
        b'f' => simple(0x0c),
        b'v' => simple(0x0b),
        b'\\' => simple(b'\\'),
        b'\'' => simple(b'\''),
        b'"' => simple(b'"'),
        b'x' => {
            let hex = std::str::from_utf8(bytes.get(2..4)?).ok()?;
            u8::from_str_radix(hex, 16).ok().map(|b| (Escape::Byte(b), 4))
        }
        b'0'..=b'7' => {
            let oct = std::str::from_utf8(bytes.get(1..4)?).ok()?;
            u8::from_str_radix(oct, 8).ok().map(|b| (Escape::Byte(b), 4))
        }
        b'u' => scalar_escape(bytes, 4),
        b'U' => scalar_escape(bytes, 8),
        _ => None,
    }
}

fn scalar_escape(bytes: &[u8], digits: usize) -> Option<(Escape, usize)> {
    let hex = std::str::from_utf8(bytes.get(2..2 + digits)?).ok()?;
    let code = u32::from_str_radix(hex, 16).ok()?;
    let c = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
    Some((Escape::Scalar(c), 2 + digits))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tern_core::IntWidth;

    use super::*;

    fn kind_of(v: &Value) -> PrimKind {
        v.prim().unwrap()
    }

    #[test]
    fn integers_pick_narrowest_unsigned() {
        assert_eq!(kind_of(&int_literal("0")), PrimKind::U8);
        assert_eq!(kind_of(&int_literal("255")), PrimKind::U8);
        assert_eq!(kind_of(&int_literal("256")), PrimKind::U16);
        assert_eq!(kind_of(&int_literal("65536")), PrimKind::U32);
        assert_eq!(kind_of(&int_literal("4294967296")), PrimKind::U64);
        assert_eq!(int_literal("200").constant, Some(Constant::UInt(200)));
    }

    #[test]
    fn negative_integers_pick_narrowest_signed() {
        assert_eq!(kind_of(&int_literal("-1")), PrimKind::I8);
        assert_eq!(kind_of(&int_literal("-128")), PrimKind::I8);
        assert_eq!(kind_of(&int_literal("-129")), PrimKind::I16);
        assert_eq!(kind_of(&int_literal("-200")), PrimKind::I16);
        assert_eq!(int_literal("-9223372036854775808").constant, Some(Constant::Int(i64::MIN)));
    }

    #[test]
    fn integer_bases() {
        assert_eq!(parse_int("0xff"), Some((false, 255)));
        assert_eq!(parse_int("0b101"), Some((false, 5)));
        assert_eq!(parse_int("0o17"), Some((false, 15)));
        assert_eq!(parse_int("017"), Some((false, 15)));
        assert_eq!(parse_int("1_000"), Some((false, 1000)));
        assert_eq!(parse_int("-0x10"), Some((true, 16)));
    }

    #[test]
    fn malformed_integer_is_zero() {
        assert_eq!(parse_int("0x"), None);
        assert_eq!(int_literal("12a").constant, Some(Constant::UInt(0)));
        assert_eq!(int_literal("99999999999999999999").constant, Some(Constant::UInt(0)));
    }

    #[test]
    fn floats_default_to_f64() {
        let v = float_literal("0.5", None);
        assert_eq!(kind_of(&v), PrimKind::F64);
        assert_eq!(v.constant, Some(Constant::Float(0.5)));
    }

    #[test]
    fn floats_narrow_only_when_exact() {
        assert_eq!(kind_of(&float_literal("0.5", Some(PrimKind::F32))), PrimKind::F32);
        assert_eq!(kind_of(&float_literal("0.1", Some(PrimKind::F32))), PrimKind::F32);
        assert_eq!(kind_of(&float_literal("1e40", Some(PrimKind::F32))), PrimKind::F64);
        assert_eq!(
            kind_of(&float_literal("3.141592653589793", Some(PrimKind::F32))),
            PrimKind::F64
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(decode_string(r"a\nb"), b"a\nb".to_vec());
        assert_eq!(decode_string(r"\x41\101"), b"AA".to_vec());
        assert_eq!(decode_string(r"\xff"), vec![0xff]);
        assert_eq!(decode_string(r"é"), "é".as_bytes().to_vec());
        assert_eq!(decode_string(r#"\"q\""#), b"\"q\"".to_vec());
    }

    #[test]
    fn byte_runes() {
        let a = rune_literal("a");
        assert_eq!(kind_of(&a), PrimKind::U8);
        assert_eq!(a.constant, Some(Constant::UInt(97)));
        assert_eq!(kind_of(&rune_literal(r"\x41")), PrimKind::U8);
        assert_eq!(kind_of(&rune_literal(r"\101")), PrimKind::U8);
    }

    #[test]
    fn scalar_runes() {
        let e = rune_literal("é");
        assert_eq!(kind_of(&e), PrimKind::I32);
        assert_eq!(e.constant, Some(Constant::Int(0xe9)));
        assert_eq!(kind_of(&rune_literal(r"\n")), PrimKind::I32);
        assert_eq!(rune_literal(r"☺").constant, Some(Constant::Int(0x263a)));
    }

    fn is_narrowest(kind: PrimKind, ladder: &[PrimKind], v: i128) -> bool {
        let Some(pos) = ladder.iter().position(|k| *k == kind) else {
            return false;
        };
        kind.fits_int(v, IntWidth::W64) && (pos == 0 || !ladder[pos - 1].fits_int(v, IntWidth::W64))
    }

    proptest! {
        #[test]
        fn non_negative_literals_take_the_narrowest_unsigned_kind(n in any::<u64>()) {
            let kind = kind_of(&int_literal(&n.to_string()));
            prop_assert!(is_narrowest(kind, &PrimKind::UNSIGNED_LADDER, n as i128), "{} -> {:?}", n, kind);
        }

        #[test]
        fn negative_literals_take_the_narrowest_signed_kind(n in i64::MIN..0i64) {
            let kind = kind_of(&int_literal(&n.to_string()));
            prop_assert!(is_narrowest(kind, &PrimKind::SIGNED_LADDER, n as i128), "{} -> {:?}", n, kind);
        }
    }
}
