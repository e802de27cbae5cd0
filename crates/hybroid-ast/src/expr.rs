//! Expression nodes.
//!
//! Some variants are only produced by the walker when it rewrites the tree:
//! [`Expr::Builtin`], [`Expr::MethodCall`], and [`Expr::EnvAccess`] /
//! [`Expr::Field`] nodes that replace plain identifiers. Resolved call
//! arities are written back into `return_amount` fields.

use hybroid_core::{EnvId, FixedKind, NamedKind, Span};

use crate::decl::Param;
use crate::stmt::MatchStmt;
use crate::{BinaryOp, Ident, Stmt, TypeExpr, UnaryOp};

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(LiteralExpr),
    /// Unresolved name
    Ident(Ident),
    /// Name resolved to the implicit built-in library
    Builtin(Ident),
    /// `Env::name`, written or produced by resolution
    EnvAccess(EnvAccessExpr),
    /// Prefix operation
    Unary(Box<UnaryExpr>),
    /// Binary operation
    Binary(Box<BinaryExpr>),
    /// Parenthesized expression
    Group(Box<GroupExpr>),
    /// `{a, b, c}`
    List(ListExpr),
    /// `{a = 1, b = 2}`
    Map(MapExpr),
    /// Function call
    Call(Box<CallExpr>),
    /// Method call on a class or entity value
    MethodCall(Box<MethodCallExpr>),
    /// `value.field`
    Field(Box<FieldExpr>),
    /// `value[index]`
    Member(Box<MemberExpr>),
    /// `self`
    SelfRef(SelfExpr),
    /// `new Type(args)`
    New(ConstructExpr),
    /// `spawn Entity(args)`
    Spawn(ConstructExpr),
    /// Anonymous function
    Function(Box<FunctionExpr>),
    /// `match` used as a value
    Match(Box<MatchExpr>),
    /// `x is Entity` / `x isnt Entity`
    EntityEval(Box<EntityEvalExpr>),
    /// Parser recovery placeholder
    Error(Span),
}

impl Expr {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) | Self::Builtin(e) => e.span,
            Self::EnvAccess(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Group(e) => e.span,
            Self::List(e) => e.span,
            Self::Map(e) => e.span,
            Self::Call(e) => e.span,
            Self::MethodCall(e) => e.span,
            Self::Field(e) => e.span,
            Self::Member(e) => e.span,
            Self::SelfRef(e) => e.span,
            Self::New(e) | Self::Spawn(e) => e.span,
            Self::Function(e) => e.span,
            Self::Match(e) => e.stmt.span,
            Self::EntityEval(e) => e.span,
            Self::Error(span) => *span,
        }
    }

    /// A placeholder used while a node is moved out for rewriting.
    pub fn placeholder(span: Span) -> Expr {
        Expr::Error(span)
    }

    /// Whether this is a literal.
    pub fn as_literal(&self) -> Option<&LiteralExpr> {
        match self {
            Self::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

/// Kinds of literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// `12`, `0x1f`, `1.5`
    Number,
    /// `1.5fx`, `90d`, `3.14r`
    Fixed(FixedKind),
    /// `"text"`
    Text,
    /// `true` / `false`
    Bool,
    /// `nil`
    Nil,
}

/// A literal value, kept as written.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    /// The literal kind
    pub kind: LiteralKind,
    /// Source text of the literal
    pub value: String,
    /// Source location
    pub span: Span,
}

impl LiteralExpr {
    /// Create a literal.
    pub fn new(kind: LiteralKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    /// A number literal.
    pub fn number(value: impl Into<String>, span: Span) -> Self {
        Self::new(LiteralKind::Number, value, span)
    }

    /// A fixed-point literal of the given sub-kind.
    pub fn fixed(kind: FixedKind, value: impl Into<String>, span: Span) -> Self {
        Self::new(LiteralKind::Fixed(kind), value, span)
    }

    /// A text literal; `value` includes the quotes.
    pub fn text(value: impl Into<String>, span: Span) -> Self {
        Self::new(LiteralKind::Text, value, span)
    }

    /// A bool literal.
    pub fn bool(value: bool, span: Span) -> Self {
        Self::new(LiteralKind::Bool, value.to_string(), span)
    }

    /// `nil`
    pub fn nil(span: Span) -> Self {
        Self::new(LiteralKind::Nil, "nil", span)
    }
}

/// `Env::name`
#[derive(Debug, Clone, PartialEq)]
pub struct EnvAccessExpr {
    /// Environment or library name
    pub env: Ident,
    /// Accessed name
    pub name: Ident,
    /// Source location
    pub span: Span,
}

/// A prefix operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    /// Operator
    pub op: UnaryOp,
    /// Operand
    pub operand: Expr,
    /// Source location
    pub span: Span,
}

/// A binary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    /// Left operand
    pub left: Expr,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: Expr,
    /// Source location
    pub span: Span,
}

/// A parenthesized expression.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupExpr {
    /// Inner expression
    pub inner: Expr,
    /// Source location
    pub span: Span,
}

/// A list literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ListExpr {
    /// Elements
    pub elems: Vec<Expr>,
    /// Source location
    pub span: Span,
}

/// One `key = value` entry of a map literal.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    /// Key
    pub key: Ident,
    /// Value
    pub value: Expr,
}

/// A map literal.
#[derive(Debug, Clone, PartialEq)]
pub struct MapExpr {
    /// Entries in source order
    pub entries: Vec<MapEntry>,
    /// Source location
    pub span: Span,
}

/// A function call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// Called expression
    pub caller: Expr,
    /// Explicit generic arguments
    pub generics: Vec<TypeExpr>,
    /// Arguments
    pub args: Vec<Expr>,
    /// Number of values the call produces, set by the walker
    pub return_amount: usize,
    /// Source location
    pub span: Span,
}

/// A call of a class or entity method, produced from a [`CallExpr`].
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCallExpr {
    /// The value the method is called on
    pub receiver: Expr,
    /// Declaring environment of the owner type
    pub owner_env: EnvId,
    /// Owner type name
    pub owner: String,
    /// Class or entity
    pub owner_kind: NamedKind,
    /// Method name
    pub method: Ident,
    /// Explicit generic arguments
    pub generics: Vec<TypeExpr>,
    /// Arguments
    pub args: Vec<Expr>,
    /// Number of values the call produces
    pub return_amount: usize,
    /// Source location
    pub span: Span,
}

/// `value.field`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldExpr {
    /// Accessed value
    pub target: Expr,
    /// Field name
    pub field: Ident,
    /// Declaration order of the field when the target is a class or entity
    pub index: Option<usize>,
    /// Source location
    pub span: Span,
}

/// `value[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    /// Accessed list or map
    pub target: Expr,
    /// Index or key
    pub index: Expr,
    /// Source location
    pub span: Span,
}

/// `self`
#[derive(Debug, Clone, PartialEq)]
pub struct SelfExpr {
    /// What `self` refers to, set by the walker
    pub owner: Option<NamedKind>,
    /// Source location
    pub span: Span,
}

impl SelfExpr {
    /// An unresolved `self`.
    pub fn new(span: Span) -> Self {
        Self { owner: None, span }
    }
}

/// `new Type(args)` or `spawn Entity(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructExpr {
    /// Constructed type
    pub ty: TypeExpr,
    /// Explicit generic arguments
    pub generics: Vec<TypeExpr>,
    /// Arguments
    pub args: Vec<Expr>,
    /// Source location
    pub span: Span,
}

/// An anonymous function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    /// Parameters
    pub params: Vec<Param>,
    /// Return types
    pub returns: Vec<TypeExpr>,
    /// Body
    pub body: Vec<Stmt>,
    /// Source location
    pub span: Span,
}

/// A `match` producing values through `yield`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchExpr {
    /// The match itself
    pub stmt: MatchStmt,
    /// Number of values each arm yields, set by the walker
    pub return_amount: usize,
}

/// `value is Entity` / `value isnt Entity`, optionally binding a narrowed name.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityEvalExpr {
    /// The evaluated entity
    pub value: Expr,
    /// Entity type checked against
    pub ty: TypeExpr,
    /// Name bound to the narrowed entity (`let x is Ship`)
    pub binding: Option<Ident>,
    /// `isnt`
    pub negated: bool,
    /// Whether `ty` names an engine entity, set by the walker
    pub official: bool,
    /// Source location
    pub span: Span,
}
