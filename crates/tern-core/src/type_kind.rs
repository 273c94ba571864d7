//! The closed set of type shapes.
//!
//! [`TypeKind`] is a tree: every non-leaf variant owns exactly the sub-kinds
//! its shape requires. Declarations (structs, traits, enums) are referenced
//! by their [`TypeHash`] and carry their display name so a kind can be
//! printed without consulting the registry.

use std::fmt;

use crate::{IntWidth, PrimKind, TypeHash};

/// A resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Prim(PrimKind),
    /// Raw pointer. `None` is the untyped `*unsafe` pointer.
    Ptr(Option<Box<TypeKind>>),
    /// Reference (`&T`).
    Ref(Box<TypeKind>),
    Slice(Box<TypeKind>),
    Array(ArrayKind),
    Map(MapKind),
    /// Multiple values, only produced by calls and multi-value expressions.
    Tuple(Vec<TypeKind>),
    Fn(Box<FnKind>),
    Struct(StructKind),
    Trait(TraitKind),
    Enum(EnumKind),
    /// Type parameter of a generic struct, replaced on instantiation.
    Generic(String),
    /// Type of the `nil` literal.
    Nil,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayKind {
    pub elem: Box<TypeKind>,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapKind {
    pub key: Box<TypeKind>,
    pub val: Box<TypeKind>,
}

/// Parameter of a function kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamKind {
    pub kind: TypeKind,
    pub mutable: bool,
    pub variadic: bool,
    pub reference: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FnKind {
    pub params: Vec<ParamKind>,
    /// `None` for functions that produce no value.
    pub result: Option<TypeKind>,
    pub unsafety: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructKind {
    pub decl: TypeHash,
    pub name: String,
    pub generics: Vec<TypeKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraitKind {
    pub decl: TypeHash,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumKind {
    pub decl: TypeHash,
    pub name: String,
    pub underlying: PrimKind,
}

impl TypeKind {
    pub fn ptr_to(kind: TypeKind) -> Self {
        TypeKind::Ptr(Some(Box::new(kind)))
    }

    pub fn ref_to(kind: TypeKind) -> Self {
        TypeKind::Ref(Box::new(kind))
    }

    pub fn slice_of(kind: TypeKind) -> Self {
        TypeKind::Slice(Box::new(kind))
    }

    pub fn array_of(kind: TypeKind, len: usize) -> Self {
        TypeKind::Array(ArrayKind {
            elem: Box::new(kind),
            len,
        })
    }

    pub fn map_of(key: TypeKind, val: TypeKind) -> Self {
        TypeKind::Map(MapKind {
            key: Box::new(key),
            val: Box::new(val),
        })
    }

    pub const fn bool() -> Self {
        TypeKind::Prim(PrimKind::Bool)
    }

    pub const fn str() -> Self {
        TypeKind::Prim(PrimKind::Str)
    }

    pub const fn int() -> Self {
        TypeKind::Prim(PrimKind::Int)
    }

    pub fn prim(&self) -> Option<PrimKind> {
        match self {
            TypeKind::Prim(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_prim(&self, kind: PrimKind) -> bool {
        self.prim() == Some(kind)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, TypeKind::Nil)
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, TypeKind::Ref(_))
    }

    pub fn is_ptr(&self) -> bool {
        matches!(self, TypeKind::Ptr(_))
    }

    pub fn is_unsafe_ptr(&self) -> bool {
        matches!(self, TypeKind::Ptr(None))
    }

    pub fn is_any(&self) -> bool {
        self.is_prim(PrimKind::Any)
    }

    pub fn is_integer(&self) -> bool {
        self.prim().is_some_and(PrimKind::is_integer)
    }

    pub fn is_numeric(&self) -> bool {
        self.prim().is_some_and(PrimKind::is_numeric)
    }

    /// Kinds that accept the `nil` literal.
    pub fn is_nil_compatible(&self) -> bool {
        matches!(
            self,
            TypeKind::Nil
                | TypeKind::Prim(PrimKind::Any)
                | TypeKind::Ptr(_)
                | TypeKind::Ref(_)
                | TypeKind::Slice(_)
                | TypeKind::Map(_)
                | TypeKind::Fn(_)
                | TypeKind::Trait(_)
        )
    }

    /// Element kind of a slice, array or typed pointer.
    pub fn elem(&self) -> Option<&TypeKind> {
        match self {
            TypeKind::Slice(e) | TypeKind::Ref(e) => Some(e.as_ref()),
            TypeKind::Ptr(Some(e)) => Some(e.as_ref()),
            TypeKind::Array(a) => Some(a.elem.as_ref()),
            _ => None,
        }
    }

    /// Strip one reference level.
    pub fn deref(&self) -> &TypeKind {
        match self {
            TypeKind::Ref(inner) => inner.as_ref(),
            other => other,
        }
    }

    /// Kinds that carry an enum's underlying primitive are solved as that
    /// primitive by the operator solver.
    pub fn underlying_prim(&self) -> Option<PrimKind> {
        match self {
            TypeKind::Prim(p) => Some(*p),
            TypeKind::Enum(e) => Some(e.underlying),
            _ => None,
        }
    }

    pub fn tuple_arity(&self) -> usize {
        match self {
            TypeKind::Tuple(parts) => parts.len(),
            _ => 1,
        }
    }

    /// Whether the kind mentions an unresolved generic parameter.
    pub fn has_generic(&self) -> bool {
        match self {
            TypeKind::Generic(_) => true,
            TypeKind::Ptr(Some(e)) | TypeKind::Ref(e) | TypeKind::Slice(e) => e.has_generic(),
            TypeKind::Array(a) => a.elem.has_generic(),
            TypeKind::Map(m) => m.key.has_generic() || m.val.has_generic(),
            TypeKind::Tuple(parts) => parts.iter().any(TypeKind::has_generic),
            TypeKind::Struct(s) => s.generics.iter().any(TypeKind::has_generic),
            TypeKind::Fn(f) => {
                f.params.iter().any(|p| p.kind.has_generic())
                    || f.result.as_ref().is_some_and(TypeKind::has_generic)
            }
            _ => false,
        }
    }

    /// Replace generic parameters by name.
    pub fn substitute(&self, names: &[String], args: &[TypeKind]) -> TypeKind {
        let sub = |k: &TypeKind| Box::new(k.substitute(names, args));
        match self {
            TypeKind::Generic(name) => names
                .iter()
                .position(|n| n == name)
                .and_then(|i| args.get(i))
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeKind::Ptr(Some(e)) => TypeKind::Ptr(Some(sub(e.as_ref()))),
            TypeKind::Ref(e) => TypeKind::Ref(sub(e.as_ref())),
            TypeKind::Slice(e) => TypeKind::Slice(sub(e.as_ref())),
            TypeKind::Array(a) => TypeKind::Array(ArrayKind {
                elem: sub(a.elem.as_ref()),
                len: a.len,
            }),
            TypeKind::Map(m) => TypeKind::Map(MapKind {
                key: sub(m.key.as_ref()),
                val: sub(m.val.as_ref()),
            }),
            TypeKind::Tuple(parts) => {
                TypeKind::Tuple(parts.iter().map(|p| p.substitute(names, args)).collect())
            }
            TypeKind::Struct(s) => TypeKind::Struct(StructKind {
                generics: s.generics.iter().map(|g| g.substitute(names, args)).collect(),
                ..s.clone()
            }),
            TypeKind::Fn(f) => TypeKind::Fn(Box::new(FnKind {
                params: f
                    .params
                    .iter()
                    .map(|p| ParamKind {
                        kind: p.kind.substitute(names, args),
                        ..p.clone()
                    })
                    .collect(),
                result: f.result.as_ref().map(|r| r.substitute(names, args)),
                unsafety: f.unsafety,
            })),
            other => other.clone(),
        }
    }

    /// Bit width of a numeric kind.
    pub fn bits(&self, width: IntWidth) -> u32 {
        self.underlying_prim().map_or(0, |p| p.bits(width))
    }
}

impl From<PrimKind> for TypeKind {
    fn from(p: PrimKind) -> Self {
        TypeKind::Prim(p)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Prim(p) => write!(f, "{p}"),
            TypeKind::Ptr(None) => f.write_str("*unsafe"),
            TypeKind::Ptr(Some(e)) => write!(f, "*{e}"),
            TypeKind::Ref(e) => write!(f, "&{e}"),
            TypeKind::Slice(e) => write!(f, "[]{e}"),
            TypeKind::Array(a) => write!(f, "[{}]{}", a.len, a.elem),
            TypeKind::Map(m) => write!(f, "[{}:{}]", m.key, m.val),
            TypeKind::Tuple(parts) => {
                f.write_str("(")?;
                for (i, p) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                f.write_str(")")
            }
            TypeKind::Fn(func) => write!(f, "{func}"),
            TypeKind::Struct(s) => {
                f.write_str(&s.name)?;
                if !s.generics.is_empty() {
                    f.write_str("[")?;
                    for (i, g) in s.generics.iter().enumerate() {
                        if i > 0 {
                            f.write_str(",")?;
                        }
                        write!(f, "{g}")?;
                    }
                    f.write_str("]")?;
                }
                Ok(())
            }
            TypeKind::Trait(t) => f.write_str(&t.name),
            TypeKind::Enum(e) => f.write_str(&e.name),
            TypeKind::Generic(name) => f.write_str(name),
            TypeKind::Nil => f.write_str("nil"),
        }
    }
}

impl fmt::Display for FnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unsafety {
            f.write_str("unsafe ")?;
        }
        f.write_str("fn(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if p.mutable {
                f.write_str("mut ")?;
            }
            if p.reference {
                f.write_str("&")?;
            }
            if p.variadic {
                f.write_str("...")?;
            }
            write!(f, "{}", p.kind)?;
        }
        f.write_str(")")?;
        if let Some(result) = &self.result {
            write!(f, ": {result}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> TypeKind {
        TypeKind::Struct(StructKind {
            decl: TypeHash::from_decl(&[], "Point"),
            name: "Point".into(),
            generics: vec![],
        })
    }

    #[test]
    fn kind_strings() {
        assert_eq!(TypeKind::Ptr(None).to_string(), "*unsafe");
        assert_eq!(TypeKind::ptr_to(TypeKind::int()).to_string(), "*int");
        assert_eq!(TypeKind::slice_of(PrimKind::U8.into()).to_string(), "[]u8");
        assert_eq!(TypeKind::array_of(point(), 4).to_string(), "[4]Point");
        assert_eq!(
            TypeKind::map_of(TypeKind::str(), TypeKind::ref_to(point())).to_string(),
            "[str:&Point]"
        );
        assert_eq!(
            TypeKind::Tuple(vec![TypeKind::int(), TypeKind::bool()]).to_string(),
            "(int, bool)"
        );
    }

    #[test]
    fn fn_kind_string() {
        let f = TypeKind::Fn(Box::new(FnKind {
            params: vec![ParamKind {
                kind: TypeKind::int(),
                mutable: true,
                variadic: true,
                reference: false,
            }],
            result: Some(TypeKind::str()),
            unsafety: false,
        }));
        assert_eq!(f.to_string(), "fn(mut ...int): str");
    }

    #[test]
    fn substitute_generic_struct_fields() {
        let field = TypeKind::slice_of(TypeKind::Generic("T".into()));
        assert!(field.has_generic());
        let concrete = field.substitute(&["T".into()], &[TypeKind::str()]);
        assert_eq!(concrete, TypeKind::slice_of(TypeKind::str()));
        assert!(!concrete.has_generic());
    }

    #[test]
    fn nil_compatible_kinds() {
        assert!(TypeKind::slice_of(TypeKind::int()).is_nil_compatible());
        assert!(TypeKind::Ptr(None).is_nil_compatible());
        assert!(TypeKind::Prim(PrimKind::Any).is_nil_compatible());
        assert!(!TypeKind::int().is_nil_compatible());
        assert!(!point().is_nil_compatible());
    }
}
