//! Syntax tree for Hybroid programs.
//!
//! The tree is produced by the parser and consumed twice: the walker checks
//! it and rewrites some nodes in place (identifier resolution, method calls,
//! folded constants), then the generator turns the rewritten tree into Lua.
//!
//! Nodes own their children so a rewrite can replace a whole subtree.
//! Malformed input arrives as [`Expr::Error`] / [`Stmt::Error`] placeholders.
//!
//! ## Modules
//!
//! - [`node`]: Identifiers
//! - [`ops`]: Operators
//! - [`types`]: Type expressions as written in source
//! - [`expr`]: Expressions
//! - [`stmt`]: Statements
//! - [`decl`]: Declarations
//! - [`program`]: A parsed source file

pub mod decl;
pub mod expr;
pub mod node;
pub mod ops;
pub mod program;
pub mod stmt;
pub mod types;

pub use decl::{
    AliasDecl, ClassDecl, ConstructorDecl, EntityDecl, EntityFunctionDecl, EntityFunctionKind,
    EnumDecl, FunctionDecl, Param, VariableDecl,
};
pub use expr::{
    BinaryExpr, CallExpr, ConstructExpr, EntityEvalExpr, EnvAccessExpr, Expr, FieldExpr,
    FunctionExpr, GroupExpr, ListExpr, LiteralExpr, LiteralKind, MapEntry, MapExpr, MatchExpr,
    MemberExpr, MethodCallExpr, SelfExpr, UnaryExpr,
};
pub use node::Ident;
pub use ops::{AssignOp, BinaryOp, UnaryOp};
pub use program::Program;
pub use stmt::{
    AssignmentStmt, DestroyStmt, ElseIf, EnvStmt, ExitStmt, ForStmt, IfStmt, MatchArm, MatchStmt,
    RepeatStmt, Stmt, TickStmt, UseStmt, WhileStmt,
};
pub use types::TypeExpr;
