//! Deterministic hash-based declaration identity.
//!
//! [`TypeHash`] identifies a struct, trait, enum or function declaration by
//! hashing its package path and name. Two declarations with the same name in
//! different packages hash differently, and the hash can be computed before
//! the declaration itself is registered, so forward references resolve
//! without ordering constraints.

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant for path components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type declarations (struct, trait, enum).
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for functions.
    pub const FUNCTION: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for methods bound to a struct.
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;
}

/// A deterministic 64-bit hash identifying a declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    fn mix(domain: u64, path: &[&str], name: &str) -> u64 {
        let mut hash = domain;
        for segment in path {
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(xxh64(segment.as_bytes(), 0));
        }
        hash.wrapping_mul(hash_constants::SEP)
            .wrapping_add(xxh64(name.as_bytes(), 0))
    }

    /// Hash of a type declaration `name` inside package `path`.
    ///
    /// An empty path denotes the unit being analyzed.
    #[inline]
    pub fn from_decl(path: &[&str], name: &str) -> Self {
        TypeHash(Self::mix(hash_constants::TYPE, path, name))
    }

    /// Hash of a free function.
    #[inline]
    pub fn from_function(path: &[&str], name: &str) -> Self {
        TypeHash(Self::mix(hash_constants::FUNCTION, path, name))
    }

    /// Hash of a method of `owner`.
    #[inline]
    pub fn from_method(owner: TypeHash, name: &str) -> Self {
        TypeHash(hash_constants::METHOD ^ owner.0 ^ xxh64(name.as_bytes(), 0))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash(0x{:016x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decl_hash_is_deterministic() {
        assert_eq!(
            TypeHash::from_decl(&[], "Point"),
            TypeHash::from_decl(&[], "Point")
        );
    }

    #[test]
    fn package_path_changes_hash() {
        assert_ne!(
            TypeHash::from_decl(&[], "Error"),
            TypeHash::from_decl(&["std", "io"], "Error")
        );
    }

    #[test]
    fn domains_do_not_collide() {
        assert_ne!(
            TypeHash::from_decl(&[], "run"),
            TypeHash::from_function(&[], "run")
        );
        let owner = TypeHash::from_decl(&[], "Point");
        assert_ne!(TypeHash::from_method(owner, "len"), TypeHash::from_function(&[], "len"));
    }
}
