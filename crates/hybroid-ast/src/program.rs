//! A parsed source file.

use crate::{EnvStmt, Stmt};

/// The statements of one source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements in source order
    pub body: Vec<Stmt>,
}

impl Program {
    /// Wrap parsed statements.
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }

    /// The leading `env` declaration, if the file starts with one.
    pub fn environment(&self) -> Option<&EnvStmt> {
        match self.body.first() {
            Some(Stmt::Env(env)) => Some(env),
            _ => None,
        }
    }
}
