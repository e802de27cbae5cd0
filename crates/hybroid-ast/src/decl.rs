//! Declarations: variables, functions, classes, entities, enums and aliases.

use std::fmt;

use hybroid_core::Span;

use crate::{Expr, Ident, Stmt, TypeExpr};

/// `let`/`pub`/`const` declaration of one or more names.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    /// Declared names
    pub identifiers: Vec<Ident>,
    /// Explicit type
    pub ty: Option<TypeExpr>,
    /// Values; the walker fills in defaults for typed declarations
    pub values: Vec<Expr>,
    /// `pub`
    pub is_pub: bool,
    /// `const`
    pub is_const: bool,
    /// Source location
    pub span: Span,
}

/// A function or method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name
    pub name: Ident,
    /// Parameter type, possibly variadic
    pub ty: TypeExpr,
}

/// A named function or method.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// Function name
    pub name: Ident,
    /// Generic parameters
    pub generics: Vec<Ident>,
    /// Parameters
    pub params: Vec<Param>,
    /// Return types
    pub returns: Vec<TypeExpr>,
    /// Body
    pub body: Vec<Stmt>,
    /// `pub`
    pub is_pub: bool,
    /// Source location
    pub span: Span,
}

/// A class constructor (`new`).
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    /// Generic parameters, scoped to the constructor
    pub generics: Vec<Ident>,
    /// Parameters
    pub params: Vec<Param>,
    /// Body
    pub body: Vec<Stmt>,
    /// Source location
    pub span: Span,
}

/// A class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Class name
    pub name: Ident,
    /// `pub`
    pub is_pub: bool,
    /// Fields
    pub fields: Vec<VariableDecl>,
    /// Methods
    pub methods: Vec<FunctionDecl>,
    /// Constructor
    pub constructor: Option<ConstructorDecl>,
    /// Source location
    pub span: Span,
}

/// Lifecycle functions of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityFunctionKind {
    /// `spawn`
    Spawn,
    /// `destroy`
    Destroy,
    /// `WallCollision`
    WallCollision,
    /// `WeaponCollision`
    WeaponCollision,
    /// `PlayerCollision`
    PlayerCollision,
    /// `Update`
    Update,
}

impl EntityFunctionKind {
    /// Name used in alerts.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityFunctionKind::Spawn => "spawn",
            EntityFunctionKind::Destroy => "destroy",
            EntityFunctionKind::WallCollision => "wall collision",
            EntityFunctionKind::WeaponCollision => "weapon collision",
            EntityFunctionKind::PlayerCollision => "player collision",
            EntityFunctionKind::Update => "update",
        }
    }

    /// Whether this is one of the optional engine callbacks.
    pub fn is_callback(self) -> bool {
        !matches!(self, EntityFunctionKind::Spawn | EntityFunctionKind::Destroy)
    }
}

impl fmt::Display for EntityFunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle function inside an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFunctionDecl {
    /// Which lifecycle function
    pub kind: EntityFunctionKind,
    /// Generic parameters (spawn and destroy only)
    pub generics: Vec<Ident>,
    /// Parameters
    pub params: Vec<Param>,
    /// Return types
    pub returns: Vec<TypeExpr>,
    /// Body
    pub body: Vec<Stmt>,
    /// Source location
    pub span: Span,
}

/// An entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDecl {
    /// Entity name
    pub name: Ident,
    /// `pub`
    pub is_pub: bool,
    /// Fields
    pub fields: Vec<VariableDecl>,
    /// Methods
    pub methods: Vec<FunctionDecl>,
    /// Lifecycle functions in source order
    pub functions: Vec<EntityFunctionDecl>,
    /// Source location
    pub span: Span,
}

/// An enum.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    /// Enum name
    pub name: Ident,
    /// Fields in declaration order
    pub fields: Vec<Ident>,
    /// `pub`
    pub is_pub: bool,
    /// Source location
    pub span: Span,
}

/// `alias Name = Type`
#[derive(Debug, Clone, PartialEq)]
pub struct AliasDecl {
    /// Alias name
    pub name: Ident,
    /// Aliased type
    pub ty: TypeExpr,
    /// `pub`
    pub is_pub: bool,
    /// Source location
    pub span: Span,
}
