//! Statement nodes.

use hybroid_core::Span;

use crate::decl::{AliasDecl, ClassDecl, EntityDecl, EnumDecl, FunctionDecl, VariableDecl};
use crate::{AssignOp, Expr, Ident, TypeExpr};

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `env Name as Kind`
    Env(EnvStmt),
    /// Variable declaration
    VariableDecl(VariableDecl),
    /// Function declaration
    Function(FunctionDecl),
    /// Class declaration
    Class(ClassDecl),
    /// Entity declaration
    Entity(EntityDecl),
    /// Enum declaration
    Enum(EnumDecl),
    /// Alias declaration
    Alias(AliasDecl),
    /// Assignment
    Assignment(AssignmentStmt),
    /// `if` / `elseif` / `else`
    If(IfStmt),
    /// `repeat`
    Repeat(RepeatStmt),
    /// `while`
    While(WhileStmt),
    /// `for k, v in xs`
    For(ForStmt),
    /// `tick`
    Tick(TickStmt),
    /// `match`
    Match(MatchStmt),
    /// `return`
    Return(ExitStmt),
    /// `yield`
    Yield(ExitStmt),
    /// `break`
    Break(Span),
    /// `continue`
    Continue(Span),
    /// `destroy e(args)`
    Destroy(DestroyStmt),
    /// `use Env`
    Use(UseStmt),
    /// Expression statement
    Expr(Expr),
    /// Parser recovery placeholder
    Error(Span),
}

impl Stmt {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Env(s) => s.span,
            Self::VariableDecl(s) => s.span,
            Self::Function(s) => s.span,
            Self::Class(s) => s.span,
            Self::Entity(s) => s.span,
            Self::Enum(s) => s.span,
            Self::Alias(s) => s.span,
            Self::Assignment(s) => s.span,
            Self::If(s) => s.span,
            Self::Repeat(s) => s.span,
            Self::While(s) => s.span,
            Self::For(s) => s.span,
            Self::Tick(s) => s.span,
            Self::Match(s) => s.span,
            Self::Return(s) | Self::Yield(s) => s.span,
            Self::Break(span) | Self::Continue(span) => *span,
            Self::Destroy(s) => s.span,
            Self::Use(s) => s.span,
            Self::Expr(e) => e.span(),
            Self::Error(span) => *span,
        }
    }
}

/// `env Name as Kind`
#[derive(Debug, Clone, PartialEq)]
pub struct EnvStmt {
    /// Environment name
    pub name: Ident,
    /// Environment kind as written
    pub kind: Ident,
    /// Source location
    pub span: Span,
}

/// `a, b = x, y` or `a += x`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStmt {
    /// Assigned places
    pub targets: Vec<Expr>,
    /// Assigned values
    pub values: Vec<Expr>,
    /// Operator
    pub op: AssignOp,
    /// Source location
    pub span: Span,
}

/// One `elseif` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    /// Condition
    pub condition: Expr,
    /// Body
    pub body: Vec<Stmt>,
    /// Source location
    pub span: Span,
}

/// `if` with optional `elseif` branches and `else`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// Condition
    pub condition: Expr,
    /// Then branch
    pub body: Vec<Stmt>,
    /// `elseif` branches in order
    pub elseifs: Vec<ElseIf>,
    /// `else` branch
    pub else_body: Option<Vec<Stmt>>,
    /// Source location
    pub span: Span,
}

/// `repeat count [from start] [by skip] [with i]`
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStmt {
    /// Upper bound
    pub iterator: Expr,
    /// Start value, filled in by the walker when omitted
    pub start: Option<Expr>,
    /// Step, filled in by the walker when omitted
    pub skip: Option<Expr>,
    /// Loop variable
    pub variable: Option<Ident>,
    /// Body
    pub body: Vec<Stmt>,
    /// Source location
    pub span: Span,
}

/// `while condition`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    /// Condition
    pub condition: Expr,
    /// Body
    pub body: Vec<Stmt>,
    /// Source location
    pub span: Span,
}

/// `for key, value in iterator`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    /// Key or index variable
    pub key: Option<Ident>,
    /// Value variable
    pub value: Option<Ident>,
    /// Iterated list or map
    pub iterator: Expr,
    /// Body
    pub body: Vec<Stmt>,
    /// Source location
    pub span: Span,
}

/// `tick [with t]`
#[derive(Debug, Clone, PartialEq)]
pub struct TickStmt {
    /// Elapsed tick counter
    pub variable: Option<Ident>,
    /// Body
    pub body: Vec<Stmt>,
    /// Source location
    pub span: Span,
}

/// One arm of a `match`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    /// Patterns, empty for `else`
    pub patterns: Vec<Expr>,
    /// Whether this is the `else` arm
    pub is_default: bool,
    /// Body
    pub body: Vec<Stmt>,
    /// Source location
    pub span: Span,
}

/// `match subject { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct MatchStmt {
    /// Matched value
    pub subject: Expr,
    /// Arms in order
    pub arms: Vec<MatchArm>,
    /// Source location
    pub span: Span,
}

/// `return values` / `yield values`
#[derive(Debug, Clone, PartialEq)]
pub struct ExitStmt {
    /// Returned or yielded values
    pub values: Vec<Expr>,
    /// Source location
    pub span: Span,
}

/// `destroy entity(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct DestroyStmt {
    /// Destroyed entity
    pub target: Expr,
    /// Explicit generic arguments
    pub generics: Vec<TypeExpr>,
    /// Arguments for the destroy function
    pub args: Vec<Expr>,
    /// Source location
    pub span: Span,
}

/// `use Env`
#[derive(Debug, Clone, PartialEq)]
pub struct UseStmt {
    /// Environment or library name
    pub path: Ident,
    /// Source location
    pub span: Span,
}
