//! Compile-time constant payloads.

use std::fmt;

/// A folded constant value.
///
/// The variants are mutually exclusive. Strings are byte sequences because
/// `\xHH` escapes may produce bytes that are not valid UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Str(Vec<u8>),
}

impl Constant {
    /// Integer payload widened to `i128`, `None` for non-integers.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Constant::Int(v) => Some(*v as i128),
            Constant::UInt(v) => Some(*v as i128),
            _ => None,
        }
    }

    /// Numeric payload as a float, `None` for non-numeric constants.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Constant::Int(v) => Some(*v as f64),
            Constant::UInt(v) => Some(*v as f64),
            Constant::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Constant::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Constant::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Constant::Int(_) | Constant::UInt(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Constant::Float(_))
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Constant::Int(v) => *v < 0,
            Constant::Float(v) => *v < 0.0,
            _ => false,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Constant::Int(v) => *v == 0,
            Constant::UInt(v) => *v == 0,
            Constant::Float(v) => *v == 0.0,
            _ => false,
        }
    }

    /// Zero of the same payload class.
    pub fn zero_like(&self) -> Constant {
        match self {
            Constant::Int(_) => Constant::Int(0),
            Constant::UInt(_) => Constant::UInt(0),
            Constant::Float(_) => Constant::Float(0.0),
            Constant::Bool(_) => Constant::Bool(false),
            Constant::Str(_) => Constant::Str(Vec::new()),
        }
    }

    /// Store an integer, choosing the unsigned payload for values that do
    /// not fit `i64`.
    pub fn from_i128(v: i128) -> Constant {
        match i64::try_from(v) {
            Ok(v) => Constant::Int(v),
            Err(_) => Constant::UInt(v as u64),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{v}"),
            Constant::UInt(v) => write!(f, "{v}"),
            Constant::Float(v) => write!(f, "{v}"),
            Constant::Bool(v) => write!(f, "{v}"),
            Constant::Str(s) => write!(f, "{:?}", String::from_utf8_lossy(s)),
        }
    }
}
