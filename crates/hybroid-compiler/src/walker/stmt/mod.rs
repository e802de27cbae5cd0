//! Statement walking.
//!
//! ## Modules
//!
//! - `declarations`: variables and functions
//! - `assignment`: plain and compound assignment
//! - `if_stmt`: `if` chains and entity narrowing bindings
//! - `loops`: `repeat`, `while`, `for` and `tick`
//! - `match_stmt`: `match` as a statement
//! - `exits`: `return`, `yield`, `break` and `continue`
//! - `containers`: class and entity bodies
//! - `destroy`: `destroy e(args)`

mod assignment;
mod containers;
mod declarations;
mod destroy;
mod exits;
mod if_stmt;
mod loops;
mod match_stmt;

use hybroid_ast::Stmt;
use hybroid_core::{AlertKind, Span};

use super::Walker;

impl<'s> Walker<'s> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn walk_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Env(env) => self.report(AlertKind::EnvironmentRedeclaration, env.span),
            Stmt::VariableDecl(decl) => self.walk_variable_decl(decl),
            Stmt::Function(decl) => self.walk_function_decl(decl),
            Stmt::Class(decl) => {
                if self.local_declaration("class", decl.span) {
                    self.walk_class(decl);
                }
            }
            Stmt::Entity(decl) => {
                if self.local_declaration("entity", decl.span) {
                    self.walk_entity(decl);
                }
            }
            // Enums and aliases are complete after the declaration pass.
            Stmt::Enum(decl) => {
                self.local_declaration("enum", decl.span);
            }
            Stmt::Alias(decl) => {
                self.local_declaration("alias", decl.span);
            }
            Stmt::Assignment(assignment) => self.walk_assignment(assignment),
            Stmt::If(if_stmt) => self.walk_if(if_stmt),
            Stmt::Repeat(repeat) => self.walk_repeat(repeat),
            Stmt::While(while_stmt) => self.walk_while(while_stmt),
            Stmt::For(for_stmt) => self.walk_for(for_stmt),
            Stmt::Tick(tick) => self.walk_tick(tick),
            Stmt::Match(matching) => self.walk_match_stmt(matching),
            Stmt::Return(exit) => self.walk_return(exit),
            Stmt::Yield(exit) => self.walk_yield(exit),
            Stmt::Break(span) => self.walk_break(*span),
            Stmt::Continue(span) => self.walk_continue(*span),
            Stmt::Destroy(destroy) => self.walk_destroy(destroy),
            Stmt::Use(use_stmt) => {
                // Root `use` statements are handled by the declaration pass.
                if !self.scopes().is_root() {
                    self.use_environment(use_stmt);
                }
            }
            Stmt::Expr(expr) => {
                self.walk_expr(expr, None);
            }
            Stmt::Error(_) => {}
        }
    }

    /// Report a type declaration below the root scope. Returns whether the
    /// declaration sits at the root.
    fn local_declaration(&mut self, what: &'static str, span: Span) -> bool {
        if self.scopes().is_root() {
            return true;
        }
        self.report(AlertKind::DeclarationInLocalScope { what }, span);
        false
    }
}
