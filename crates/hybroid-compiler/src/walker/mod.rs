//! The walker: type checking, scope tracking and tree rewriting.
//!
//! A [`Walker`] checks one environment. It first runs the
//! [`DeclarationPass`](crate::passes::DeclarationPass) so classes, entities,
//! enums, aliases and top-level functions can be used before their
//! declaration, then walks the statements in order.
//!
//! ## Architecture
//!
//! ```text
//! Session ──walk_environment(id)──► Walker
//!    ▲                                 │ declaration pass, then walk_body
//!    │                                 │
//!    └──── walk_environment(target) ◄──┘ imports after the declaration pass,
//!                                        link() on first use of another env
//! ```
//!
//! Expressions are checked bottom-up and produce a
//! [`Value`](crate::values::Value). Where the generator needs a different
//! node than the parser produced (resolved identifiers, method calls,
//! inlined constants, enum fields) the walker returns a [`Rewrite`] and the
//! dispatcher splices it into the tree.
//!
//! Problems in user code become alerts and never stop the walk. The only
//! fatal outcome is a [`CompileError`], which is stored and returned once
//! the walker finishes.

mod expr;
mod stmt;
mod types;

use hybroid_ast::{Ident, Program, Stmt, UseStmt};
use hybroid_core::{Alert, AlertKind, CompileError, Diagnostics, EnvId, Span};

use crate::environment::{Environment, WalkState};
use crate::libraries::Libraries;
use crate::passes::DeclarationPass;
use crate::scope::{ScopeError, ScopeStack};
use crate::session::Session;
use crate::values::{ClassVal, DeclRef, EntityVal, EnumVal, VariableVal};

/// Result of walking a node that may be replaced.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Rewrite<T> {
    /// Keep the node.
    Unchanged,
    /// Replace the node.
    Replace(T),
}

/// An entity narrowing produced by `value is Entity as name`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Conversion {
    /// Bound name
    pub name: Ident,
    /// Narrowed entity
    pub entity: DeclRef,
    /// Produced by `isnt`
    pub negated: bool,
}

/// State that flows between nodes of one statement.
#[derive(Debug, Clone, Default)]
pub(crate) struct WalkContext {
    /// Narrowings produced by the condition being walked
    pub conversions: Vec<Conversion>,
}

/// Walks one environment.
pub struct Walker<'s> {
    session: &'s mut Session,
    env: EnvId,
    context: WalkContext,
    alerts: Diagnostics,
    fatal: Option<CompileError>,
}

impl<'s> Walker<'s> {
    /// Create a walker for environment `env`.
    pub fn new(session: &'s mut Session, env: EnvId) -> Self {
        Self {
            session,
            env,
            context: WalkContext::default(),
            alerts: Diagnostics::new(),
            fatal: None,
        }
    }

    /// Hand back the alerts and the first fatal error, if any.
    pub fn finish(self) -> (Diagnostics, Option<CompileError>) {
        (self.alerts, self.fatal)
    }

    // ==========================================================================
    // Entry point
    // ==========================================================================

    /// Check and rewrite a whole program.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn walk_program(&mut self, program: &mut Program) {
        let output = DeclarationPass::new(self).run(&program.body);
        tracing::debug!(
            types = output.types_registered,
            functions = output.functions_registered,
            "declaration pass done"
        );

        let skip = usize::from(program.environment().is_some());
        let mut rest = program.body.split_off(skip);
        self.walk_body(&mut rest);
        program.body.append(&mut rest);
    }

    /// Walk statements of the current scope, reporting and pruning code
    /// after a guaranteed exit.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn walk_body(&mut self, body: &mut Vec<Stmt>) {
        let mut reported = false;
        let mut index = 0;
        while index < body.len() {
            self.walk_stmt(&mut body[index]);
            self.context.conversions.clear();
            index += 1;

            if index < body.len() && self.scopes().current().exits.is_guaranteed() {
                if !reported {
                    let first = body[index].span();
                    let last = body[body.len() - 1].span();
                    self.report(AlertKind::UnreachableCode, first.to(last));
                    reported = true;
                }
                if self.session.config().prune_unreachable {
                    body.truncate(index);
                    break;
                }
            }
        }
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    /// Handle of the environment being walked.
    pub fn env_id(&self) -> EnvId {
        self.env
    }

    pub(crate) fn env(&self) -> &Environment {
        &self.session.registry[self.env]
    }

    pub(crate) fn env_mut(&mut self) -> &mut Environment {
        &mut self.session.registry[self.env]
    }

    pub(crate) fn scopes(&self) -> &ScopeStack {
        &self.env().scopes
    }

    pub(crate) fn scopes_mut(&mut self) -> &mut ScopeStack {
        &mut self.env_mut().scopes
    }

    pub(crate) fn libraries(&self) -> &Libraries {
        self.session.registry.libraries()
    }

    pub(crate) fn env_name(&self, id: EnvId) -> String {
        self.session.registry.name_of(id)
    }

    /// A declared class by handle.
    pub(crate) fn class(&self, r: &DeclRef) -> Option<&ClassVal> {
        self.session.registry.get(r.env)?.classes.get(&r.name)
    }

    /// A declared entity by handle.
    pub(crate) fn entity(&self, r: &DeclRef) -> Option<&EntityVal> {
        self.session.registry.get(r.env)?.entities.get(&r.name)
    }

    /// A declared or library enum by handle.
    pub(crate) fn enum_val(&self, r: &DeclRef) -> Option<&EnumVal> {
        match self.libraries().by_id(r.env) {
            Some(library) => library.enum_val(&r.name),
            None => self.session.registry.get(r.env)?.enums.get(&r.name),
        }
    }

    // ==========================================================================
    // Reporting
    // ==========================================================================

    pub(crate) fn report(&mut self, kind: AlertKind, span: Span) {
        self.alerts.report(kind, span);
    }

    pub(crate) fn push_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    /// Record an internal error; the first one wins.
    pub(crate) fn fail(&mut self, err: CompileError) {
        tracing::warn!(%err, "internal error");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
    }

    /// Turn a failed declaration into a redeclaration alert.
    pub(crate) fn report_scope_error(&mut self, err: ScopeError, span: Span, what: &'static str) {
        match err {
            ScopeError::AlreadyDeclared { name, original } => self.push_alert(
                Alert::new(AlertKind::Redeclaration { name, what }, span).with_span(original),
            ),
            ScopeError::ConstAssignment { name } => {
                self.report(AlertKind::ConstAssignment { name }, span)
            }
            ScopeError::Undeclared { name } => {
                self.report(AlertKind::UndeclaredVariableAccess { name }, span)
            }
        }
    }

    /// Bind a variable in the current scope, reporting a redeclaration.
    pub(crate) fn declare(&mut self, variable: VariableVal, what: &'static str) {
        let span = variable.span;
        if let Err(err) = self.scopes_mut().declare(variable) {
            self.report_scope_error(err, span, what);
        }
    }

    // ==========================================================================
    // Environments
    // ==========================================================================

    /// Make `target` available to this environment, walking it first if needed.
    ///
    /// Returns `false` when the environment kinds forbid the access.
    pub(crate) fn link(&mut self, target: EnvId, span: Span) -> bool {
        if target == self.env {
            return true;
        }
        if !self.require(target, span) {
            return false;
        }
        self.ensure_walked(target, span);
        true
    }

    /// Record `target` as a requirement if the environment kinds allow it.
    fn require(&mut self, target: EnvId, span: Span) -> bool {
        if let Err(kind) = self.session.registry.check_access(self.env, target) {
            self.report(kind, span);
            return false;
        }
        if self.env_mut().require(target) {
            tracing::debug!(from = %self.env, to = %target, "linked environment");
        }
        true
    }

    /// Walk a required user environment, reporting an import cycle instead
    /// when the target is already waiting on this one.
    fn ensure_walked(&mut self, target: EnvId, span: Span) {
        if target.is_library() || target == self.env {
            return;
        }
        if let Some(cycle) = self.session.registry.find_cycle(self.env, target) {
            if self.session.registry.mark_cycle_reported(self.env, target) {
                let names: Vec<String> = cycle.iter().map(|id| self.env_name(*id)).collect();
                tracing::debug!(?names, "import cycle");
                self.report(AlertKind::ImportCycle { cycle: names }, span);
            }
            return;
        }
        if self.is_walked(target) {
            return;
        }
        if let Err(err) = self.session.walk_environment(target) {
            self.fail(err);
        }
    }

    /// Whether `target` has left the not-walked state.
    pub(crate) fn is_walked(&self, target: EnvId) -> bool {
        self.session
            .registry
            .get(target)
            .is_none_or(|env| env.state != WalkState::NotWalked)
    }

    /// Handle `use Target` inside a body: link and import at once.
    pub(crate) fn use_environment(&mut self, stmt: &UseStmt) {
        if let Some(target) = self.use_target(stmt)
            && self.link(target, stmt.span)
        {
            self.env_mut().import(target);
        }
    }

    /// Handle a root `use Target`: import it now and leave the walk to
    /// [`Walker::walk_imports`], so the target can see this environment's
    /// declarations when the two import each other.
    pub(crate) fn import_environment(&mut self, stmt: &UseStmt) {
        if let Some(target) = self.use_target(stmt)
            && self.require(target, stmt.span)
        {
            self.env_mut().import(target);
        }
    }

    /// Walk the targets of the root `use` statements in order.
    pub(crate) fn walk_imports(&mut self, body: &[Stmt]) {
        for stmt in body {
            let Stmt::Use(use_stmt) = stmt else {
                continue;
            };
            let target = self.session.registry.lookup(use_stmt.path.as_str());
            if let Some(target) = target
                && self.env().imports.contains(&target)
            {
                self.ensure_walked(target, use_stmt.span);
            }
        }
    }

    /// The environment a `use` names, other than this one.
    fn use_target(&mut self, stmt: &UseStmt) -> Option<EnvId> {
        let Some(target) = self.session.registry.lookup(stmt.path.as_str()) else {
            self.report(
                AlertKind::InvalidEnvironment {
                    name: stmt.path.name.clone(),
                },
                stmt.path.span,
            );
            return None;
        };
        (target != self.env).then_some(target)
    }
}
