//! Type expressions as written in source.
//!
//! Resolution into [`hybroid_core::Type`] happens in the walker; here a type
//! is only a name with optional qualifier, wrapped types and signature parts.

use hybroid_core::Span;

use crate::Ident;

/// A written type: `number`, `list<T>`, `fn(number) -> text`, `Lib::Point`, `...text`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    /// Environment qualifier in `Env::Name`.
    pub env: Option<Ident>,
    /// Base name (`number`, `list`, `fn`, `entity`, or a declared name).
    pub name: Ident,
    /// Wrapped types of `list<T>` / `map<T>`.
    pub wrapped: Vec<TypeExpr>,
    /// Parameters of a `fn` type.
    pub params: Vec<TypeExpr>,
    /// Returns of a `fn` type.
    pub returns: Vec<TypeExpr>,
    /// Whether the type is prefixed with `...`.
    pub is_variadic: bool,
    /// Source location
    pub span: Span,
}

impl TypeExpr {
    /// A bare type name.
    pub fn named(name: impl Into<String>, span: Span) -> Self {
        Self {
            env: None,
            name: Ident::new(name, span),
            wrapped: Vec::new(),
            params: Vec::new(),
            returns: Vec::new(),
            is_variadic: false,
            span,
        }
    }

    /// `Env::Name`
    pub fn qualified(env: impl Into<String>, name: impl Into<String>, span: Span) -> Self {
        Self {
            env: Some(Ident::new(env, span)),
            ..Self::named(name, span)
        }
    }

    /// `list<elem>`
    pub fn list(elem: TypeExpr) -> Self {
        let span = elem.span;
        Self {
            wrapped: vec![elem],
            ..Self::named("list", span)
        }
    }

    /// `map<elem>`
    pub fn map(elem: TypeExpr) -> Self {
        let span = elem.span;
        Self {
            wrapped: vec![elem],
            ..Self::named("map", span)
        }
    }

    /// `fn(params) -> returns`
    pub fn function(params: Vec<TypeExpr>, returns: Vec<TypeExpr>, span: Span) -> Self {
        Self {
            params,
            returns,
            ..Self::named("fn", span)
        }
    }

    /// Mark this type as `...T`.
    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }
}
