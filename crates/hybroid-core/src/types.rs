//! The Hybroid type model.
//!
//! [`Type`] is a closed set of variants. Equality is not plain structural
//! equality, so `PartialEq` is written by hand:
//!
//! - [`Type::Invalid`] and [`Type::Object`] equal every type, which keeps a
//!   single error from cascading into more.
//! - All fixed-point sub-kinds are interchangeable.
//! - `number` and enums are mutually equal (legacy interop with engine enums).
//! - Named types compare nominally by `(env, name)`.
//! - A named entity equals the erased [`Type::RawEntity`].
//!
//! Because of the wildcards the relation is not transitive, so `Type` does
//! not implement `Eq`.

use std::fmt;

use crate::EnvId;

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `number`
    Number,
    /// `text`
    Text,
    /// `bool`
    Bool,
}

/// Fixed-point sub-kinds. Numerically interchangeable, displayed apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedKind {
    /// `fixed`
    Fixed,
    /// `radian`
    Radian,
    /// `degree`
    Degree,
}

impl FixedKind {
    /// Source keyword of this sub-kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FixedKind::Fixed => "fixed",
            FixedKind::Radian => "radian",
            FixedKind::Degree => "degree",
        }
    }

    /// Literal suffix used when synthesizing a literal of this kind.
    pub fn suffix(self) -> &'static str {
        match self {
            FixedKind::Fixed => "fx",
            FixedKind::Radian => "r",
            FixedKind::Degree => "d",
        }
    }
}

/// Which declaration kind a named type refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKind {
    /// A `class` declaration.
    Class,
    /// An `entity` declaration.
    Entity,
}

/// Container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    /// `list<T>`
    List,
    /// `map<T>`, always keyed by text.
    Map,
}

/// A Hybroid type.
#[derive(Debug, Clone)]
pub enum Type {
    /// `number`, `text` or `bool`.
    Basic(Primitive),
    /// `fixed`, `radian` or `degree`.
    Fixed(FixedKind),
    /// A user class or entity, identified by its declaring environment.
    Named {
        /// Declaring environment.
        env: EnvId,
        /// Declared name.
        name: String,
        /// Class or entity.
        kind: NamedKind,
    },
    /// A user or library enum.
    Enum {
        /// Declaring environment.
        env: EnvId,
        /// Declared name.
        name: String,
    },
    /// A function signature.
    Function {
        /// Parameter types, the last may be [`Type::Variadic`].
        params: Vec<Type>,
        /// Return types.
        returns: Vec<Type>,
        /// Generic parameter names in declaration order.
        generics: Vec<String>,
    },
    /// `list<T>` or `map<T>`.
    Wrapper {
        /// Container kind.
        kind: WrapperKind,
        /// Element type.
        elem: Box<Type>,
    },
    /// `...T`, legal only as the last parameter.
    Variadic(Box<Type>),
    /// A generic parameter scoped to its function, constructor or spawner.
    Generic(String),
    /// Some entity whose concrete kind is unknown (the `entity` keyword).
    RawEntity,
    /// Library-only wildcard accepting any value.
    Object,
    /// Error sentinel, equal to everything.
    Invalid,
}

impl Type {
    /// `number`
    pub const NUMBER: Type = Type::Basic(Primitive::Number);
    /// `text`
    pub const TEXT: Type = Type::Basic(Primitive::Text);
    /// `bool`
    pub const BOOL: Type = Type::Basic(Primitive::Bool);
    /// `fixed`
    pub const FIXED: Type = Type::Fixed(FixedKind::Fixed);
    /// `radian`
    pub const RADIAN: Type = Type::Fixed(FixedKind::Radian);
    /// `degree`
    pub const DEGREE: Type = Type::Fixed(FixedKind::Degree);

    /// `list<elem>`
    pub fn list(elem: Type) -> Type {
        Type::Wrapper {
            kind: WrapperKind::List,
            elem: Box::new(elem),
        }
    }

    /// `map<elem>`
    pub fn map(elem: Type) -> Type {
        Type::Wrapper {
            kind: WrapperKind::Map,
            elem: Box::new(elem),
        }
    }

    /// `...elem`
    pub fn variadic(elem: Type) -> Type {
        Type::Variadic(Box::new(elem))
    }

    /// A non-generic function signature.
    pub fn function(params: Vec<Type>, returns: Vec<Type>) -> Type {
        Type::Function {
            params,
            returns,
            generics: Vec::new(),
        }
    }

    /// Whether this is the error sentinel.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Type::Invalid)
    }

    /// Whether arithmetic is defined on this type.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Type::Basic(Primitive::Number) | Type::Fixed(_) | Type::Enum { .. }
        )
    }

    /// Whether this is `text`.
    pub fn is_text(&self) -> bool {
        matches!(self, Type::Basic(Primitive::Text))
    }

    /// Whether this is some entity, concrete or erased.
    pub fn is_entity(&self) -> bool {
        matches!(
            self,
            Type::RawEntity
                | Type::Named {
                    kind: NamedKind::Entity,
                    ..
                }
        )
    }

    /// Element type of a list or map.
    pub fn wrapped(&self) -> Option<(WrapperKind, &Type)> {
        match self {
            Type::Wrapper { kind, elem } => Some((*kind, elem)),
            _ => None,
        }
    }

    /// Whether the generic parameter `name` occurs anywhere in this type.
    pub fn contains_generic(&self, name: &str) -> bool {
        match self {
            Type::Generic(g) => g == name,
            Type::Wrapper { elem, .. } | Type::Variadic(elem) => elem.contains_generic(name),
            Type::Function {
                params, returns, ..
            } => params
                .iter()
                .chain(returns)
                .any(|t| t.contains_generic(name)),
            _ => false,
        }
    }

    /// Whether any generic parameter occurs in this type.
    pub fn has_generics(&self) -> bool {
        match self {
            Type::Generic(_) => true,
            Type::Wrapper { elem, .. } | Type::Variadic(elem) => elem.has_generics(),
            Type::Function {
                params, returns, ..
            } => params.iter().chain(returns).any(Type::has_generics),
            _ => false,
        }
    }
}

fn all_equal(a: &[Type], b: &[Type]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

impl PartialEq for Type {
    fn eq(&self, other: &Type) -> bool {
        use Type::*;
        match (self, other) {
            (Invalid, _) | (_, Invalid) | (Object, _) | (_, Object) => true,
            (Basic(Primitive::Number), Enum { .. }) | (Enum { .. }, Basic(Primitive::Number)) => {
                true
            }
            (
                Named {
                    kind: NamedKind::Entity,
                    ..
                },
                RawEntity,
            )
            | (
                RawEntity,
                Named {
                    kind: NamedKind::Entity,
                    ..
                },
            ) => true,
            (Basic(a), Basic(b)) => a == b,
            (Fixed(_), Fixed(_)) => true,
            (
                Named {
                    env: ea,
                    name: na,
                    kind: ka,
                },
                Named {
                    env: eb,
                    name: nb,
                    kind: kb,
                },
            ) => ea == eb && na == nb && ka == kb,
            (Enum { env: ea, name: na }, Enum { env: eb, name: nb }) => ea == eb && na == nb,
            (
                Function {
                    params: pa,
                    returns: ra,
                    ..
                },
                Function {
                    params: pb,
                    returns: rb,
                    ..
                },
            ) => all_equal(pa, pb) && all_equal(ra, rb),
            (Wrapper { kind: ka, elem: ea }, Wrapper { kind: kb, elem: eb }) => {
                ka == kb && ea == eb
            }
            (Variadic(a), Variadic(b)) => a == b,
            (Generic(a), Generic(b)) => a == b,
            (RawEntity, RawEntity) => true,
            _ => false,
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Basic(Primitive::Number) => f.write_str("number"),
            Type::Basic(Primitive::Text) => f.write_str("text"),
            Type::Basic(Primitive::Bool) => f.write_str("bool"),
            Type::Fixed(kind) => f.write_str(kind.as_str()),
            Type::Named { name, .. } | Type::Enum { name, .. } => f.write_str(name),
            Type::Function {
                params,
                returns,
                generics,
            } => {
                f.write_str("fn")?;
                if !generics.is_empty() {
                    write!(f, "<{}>", generics.join(", "))?;
                }
                f.write_str("(")?;
                write_list(f, params)?;
                f.write_str(")")?;
                match returns.len() {
                    0 => Ok(()),
                    1 => write!(f, " -> {}", returns[0]),
                    _ => {
                        f.write_str(" -> (")?;
                        write_list(f, returns)?;
                        f.write_str(")")
                    }
                }
            }
            Type::Wrapper {
                kind: WrapperKind::List,
                elem,
            } => write!(f, "list<{elem}>"),
            Type::Wrapper {
                kind: WrapperKind::Map,
                elem,
            } => write!(f, "map<{elem}>"),
            Type::Variadic(elem) => write!(f, "...{elem}"),
            Type::Generic(name) => f.write_str(name),
            Type::RawEntity => f.write_str("entity"),
            Type::Object => f.write_str("object"),
            Type::Invalid => f.write_str("<invalid>"),
        }
    }
}
