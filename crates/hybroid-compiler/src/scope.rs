//! Lexical scopes of one environment.
//!
//! Scopes form a stack stored in a `Vec`: index 0 is the environment's root
//! scope and every pushed scope's parent is the scope below it. Handles
//! ([`ScopeId`]) replace parent pointers, so a scope never owns its parent.
//!
//! Each scope carries:
//! - a variable table (unique names per scope, shadowing across scopes is fine)
//! - a [`ScopeTag`] saying what kind of construct opened it
//! - [`ScopeAttributes`] saying which statements are legal inside it
//! - the [`ExitFlags`] its body guarantees so far
//!
//! Attributes are inherited from the parent when a scope is pushed and only
//! ever added to; field initializers are the one place that removes one
//! (`SELF_ALLOWING`).

use bitflags::bitflags;
use hybroid_core::{Span, Type};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::exits::{ExitFlags, MultiPath};
use crate::values::{DeclRef, Value, VariableVal};

// ============================================================================
// Types
// ============================================================================

bitflags! {
    /// Statements a scope permits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ScopeAttributes: u8 {
        /// `return`
        const RETURN_ALLOWING = 1 << 0;
        /// `yield`
        const YIELD_ALLOWING = 1 << 1;
        /// `self`
        const SELF_ALLOWING = 1 << 2;
        /// `break`
        const BREAK_ALLOWING = 1 << 3;
        /// `continue`
        const CONTINUE_ALLOWING = 1 << 4;
    }
}

/// Handle to a scope on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The environment's root scope.
    pub const ROOT: ScopeId = ScopeId(0);
}

/// Function or method body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FuncTag {
    /// Generic parameters in scope
    pub generics: Vec<String>,
    /// Declared return types
    pub returns: Vec<Type>,
}

/// A `match` used as an expression.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchExprTag {
    /// Exits of the arms
    pub paths: MultiPath,
    /// Types of the first `yield`, which every other `yield` must match
    pub yields: Option<Vec<Type>>,
}

/// What opened a scope.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeTag {
    /// Plain body
    Untagged,
    /// Class body, `self` is an instance of it
    Class(DeclRef),
    /// Entity body, `self` is an instance of it
    Entity(DeclRef),
    /// Function body
    Func(FuncTag),
    /// Loop body; its exits stay inside the loop
    Loop,
    /// Alternative branches (`if` chain, `match` statement)
    MultiPath(MultiPath),
    /// Arms of a `match` expression
    MatchExpr(MatchExprTag),
}

/// Failures of scope operations. Callers turn these into alerts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScopeError {
    /// The name is already bound in the same scope.
    #[error("'{name}' is already declared in this scope")]
    AlreadyDeclared { name: String, original: Span },

    /// The binding is constant.
    #[error("cannot assign to constant '{name}'")]
    ConstAssignment { name: String },

    /// The handle does not bind the name.
    #[error("'{name}' is not declared")]
    Undeclared { name: String },
}

/// One lexical scope.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Enclosing scope, `None` for the root
    pub parent: Option<ScopeId>,
    /// What opened this scope
    pub tag: ScopeTag,
    /// Statements permitted here
    pub attributes: ScopeAttributes,
    /// Exits guaranteed by the body so far
    pub exits: ExitFlags,
    variables: FxHashMap<String, VariableVal>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, tag: ScopeTag, attributes: ScopeAttributes) -> Self {
        Self {
            parent,
            tag,
            attributes,
            exits: ExitFlags::empty(),
            variables: FxHashMap::default(),
        }
    }

    /// A variable bound directly in this scope.
    pub fn variable(&self, name: &str) -> Option<&VariableVal> {
        self.variables.get(name)
    }

    /// Variables bound directly in this scope, unordered.
    pub fn variables(&self) -> impl Iterator<Item = &VariableVal> {
        self.variables.values()
    }
}

// ============================================================================
// ScopeStack
// ============================================================================

/// The scopes of one environment.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// A stack holding only the root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(
                None,
                ScopeTag::Untagged,
                ScopeAttributes::empty(),
            )],
        }
    }

    // ==========================================================================
    // Scope Management
    // ==========================================================================

    /// Enter a scope that adds `added` to the inherited attributes.
    pub fn push(&mut self, tag: ScopeTag, added: ScopeAttributes) -> ScopeId {
        let attributes = self.current().attributes | added;
        self.push_scope(tag, attributes)
    }

    /// Enter a scope that drops `removed` from the inherited attributes.
    pub fn push_restricted(&mut self, tag: ScopeTag, removed: ScopeAttributes) -> ScopeId {
        let attributes = self.current().attributes - removed;
        self.push_scope(tag, attributes)
    }

    /// Enter a function body.
    ///
    /// Only `SELF_ALLOWING` survives from the enclosing scope; loop and
    /// match exits of the caller cannot be used from inside the function.
    pub fn push_function(&mut self, tag: FuncTag) -> ScopeId {
        let inherited = self.current().attributes & ScopeAttributes::SELF_ALLOWING;
        self.push_scope(
            ScopeTag::Func(tag),
            inherited | ScopeAttributes::RETURN_ALLOWING,
        )
    }

    fn push_scope(&mut self, tag: ScopeTag, attributes: ScopeAttributes) -> ScopeId {
        let parent = self.current_id();
        self.scopes.push(Scope::new(Some(parent), tag, attributes));
        self.current_id()
    }

    /// Leave the current scope and report its exits to the new current scope.
    ///
    /// Branch scopes fold into an enclosing multi-path; a multi-path reports
    /// its conjunction. Function, loop and match-expression scopes keep
    /// their exits to themselves. The root scope is never popped.
    pub fn close(&mut self) -> Option<Scope> {
        if self.scopes.len() <= 1 {
            return None;
        }
        let scope = self.scopes.pop()?;
        let reported = match &scope.tag {
            ScopeTag::MultiPath(paths) => Some(paths.finish()),
            ScopeTag::Func(_) | ScopeTag::Loop | ScopeTag::MatchExpr(_) => None,
            ScopeTag::Untagged | ScopeTag::Class(_) | ScopeTag::Entity(_) => Some(scope.exits),
        };
        if let Some(flags) = reported {
            self.report_exits(flags);
        }
        Some(scope)
    }

    /// Hand the exits of a finished child to the current scope.
    pub fn report_exits(&mut self, flags: ExitFlags) {
        let current = self.current_mut();
        match &mut current.tag {
            ScopeTag::MultiPath(paths) => paths.report(flags),
            ScopeTag::MatchExpr(tag) => tag.paths.report(flags),
            _ => current.exits |= flags,
        }
    }

    /// Record an exit statement in the current scope.
    pub fn mark_exit(&mut self, kind: ExitFlags) {
        self.current_mut().exits |= ExitFlags::exit(kind);
    }

    /// Handle of the innermost scope.
    #[inline]
    pub fn current_id(&self) -> ScopeId {
        ScopeId(self.scopes.len() - 1)
    }

    /// The innermost scope.
    #[inline]
    pub fn current(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    /// The innermost scope, mutably.
    #[inline]
    pub fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// A scope by handle.
    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    /// A scope by handle, mutably.
    pub fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id.0)
    }

    /// The root scope.
    pub fn root(&self) -> &Scope {
        &self.scopes[0]
    }

    /// Whether the innermost scope is the root.
    pub fn is_root(&self) -> bool {
        self.scopes.len() == 1
    }

    /// Number of open scopes, the root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Whether the innermost scope permits `attribute`.
    pub fn allows(&self, attribute: ScopeAttributes) -> bool {
        self.current().attributes.contains(attribute)
    }

    /// The innermost scope whose tag satisfies `predicate`.
    pub fn nearest(&self, predicate: impl Fn(&ScopeTag) -> bool) -> Option<ScopeId> {
        let mut id = Some(self.current_id());
        while let Some(current) = id {
            let scope = self.get(current)?;
            if predicate(&scope.tag) {
                return Some(current);
            }
            id = scope.parent;
        }
        None
    }

    /// The innermost function body.
    pub fn nearest_func(&self) -> Option<&FuncTag> {
        let id = self.nearest(|tag| matches!(tag, ScopeTag::Func(_)))?;
        match &self.get(id)?.tag {
            ScopeTag::Func(tag) => Some(tag),
            _ => None,
        }
    }

    /// Generic parameters visible from the current scope.
    pub fn generic_in_scope(&self, name: &str) -> bool {
        let mut id = Some(self.current_id());
        while let Some(current) = id {
            let Some(scope) = self.get(current) else {
                return false;
            };
            if let ScopeTag::Func(tag) = &scope.tag {
                if tag.generics.iter().any(|g| g == name) {
                    return true;
                }
            }
            id = scope.parent;
        }
        false
    }

    // ==========================================================================
    // Variables
    // ==========================================================================

    /// Bind a name in the current scope. An existing binding is kept.
    pub fn declare(&mut self, variable: VariableVal) -> Result<(), ScopeError> {
        let scope = self.current_mut();
        if let Some(existing) = scope.variables.get(&variable.name) {
            return Err(ScopeError::AlreadyDeclared {
                name: variable.name,
                original: existing.span,
            });
        }
        scope.variables.insert(variable.name.clone(), variable);
        Ok(())
    }

    /// Bind a name in the root scope.
    pub fn declare_root(&mut self, variable: VariableVal) -> Result<(), ScopeError> {
        let root = &mut self.scopes[0];
        if let Some(existing) = root.variables.get(&variable.name) {
            return Err(ScopeError::AlreadyDeclared {
                name: variable.name,
                original: existing.span,
            });
        }
        root.variables.insert(variable.name.clone(), variable);
        Ok(())
    }

    /// The scope that binds `name`, searching outwards from the current one.
    pub fn resolve(&self, name: &str) -> Option<ScopeId> {
        self.scopes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, scope)| scope.variables.contains_key(name))
            .map(|(index, _)| ScopeId(index))
    }

    /// A binding in a specific scope.
    pub fn variable(&self, id: ScopeId, name: &str) -> Option<&VariableVal> {
        self.get(id)?.variables.get(name)
    }

    /// A binding in a specific scope, mutably.
    pub fn variable_mut(&mut self, id: ScopeId, name: &str) -> Option<&mut VariableVal> {
        self.get_mut(id)?.variables.get_mut(name)
    }

    /// Assign to a resolved binding, replacing its value when one is given.
    pub fn assign(
        &mut self,
        id: ScopeId,
        name: &str,
        value: Option<Value>,
    ) -> Result<(), ScopeError> {
        let Some(variable) = self.variable_mut(id, name) else {
            return Err(ScopeError::Undeclared {
                name: name.to_string(),
            });
        };
        if variable.is_const {
            return Err(ScopeError::ConstAssignment {
                name: name.to_string(),
            });
        }
        if let Some(value) = value {
            variable.value = value;
        }
        variable.is_init = true;
        Ok(())
    }
}
