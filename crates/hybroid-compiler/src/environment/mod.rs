//! Compilation environments.
//!
//! One [`Environment`] exists per source file. It owns the file's scope
//! stack, the classes, entities, enums and aliases it declares, and the
//! ordered lists of environments it requires and imports. Environments refer
//! to each other only through [`EnvId`] handles resolved by the
//! [`EnvironmentRegistry`].

pub mod registry;

pub use registry::EnvironmentRegistry;

use hybroid_core::{EnvId, EnvKind, NamedKind, Span, Type};
use rustc_hash::FxHashMap;

use crate::scope::ScopeStack;
use crate::values::{AliasVal, ClassVal, EntityVal, EnumVal};

/// Progress of an environment through the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkState {
    /// Registered, not started.
    #[default]
    NotWalked,
    /// Somewhere on the walk stack.
    Walking,
    /// Done; alerts are final.
    Walked,
}

/// A type name declared by an environment.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredType {
    /// The resolved type
    pub ty: Type,
    /// Whether other environments may use it
    pub is_pub: bool,
}

/// One compilation unit.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Handle of this environment
    pub id: EnvId,
    /// Source path, for messages
    pub path: String,
    /// Declared name (`env Name as ...`)
    pub name: String,
    /// Declared kind
    pub kind: EnvKind,
    /// Lexical scopes, root first
    pub scopes: ScopeStack,
    /// Declared classes
    pub classes: FxHashMap<String, ClassVal>,
    /// Declared entities
    pub entities: FxHashMap<String, EntityVal>,
    /// Declared enums
    pub enums: FxHashMap<String, EnumVal>,
    /// Declared aliases
    pub aliases: FxHashMap<String, AliasVal>,
    /// Environments this one has linked, in first-use order
    pub requirements: Vec<EnvId>,
    /// `use` targets in declaration order
    pub imports: Vec<EnvId>,
    /// Walk progress
    pub state: WalkState,
}

impl Environment {
    /// Create an empty environment.
    pub fn new(
        id: EnvId,
        path: impl Into<String>,
        name: impl Into<String>,
        kind: EnvKind,
    ) -> Self {
        Self {
            id,
            path: path.into(),
            name: name.into(),
            kind,
            scopes: ScopeStack::new(),
            classes: FxHashMap::default(),
            entities: FxHashMap::default(),
            enums: FxHashMap::default(),
            aliases: FxHashMap::default(),
            requirements: Vec::new(),
            imports: Vec::new(),
            state: WalkState::NotWalked,
        }
    }

    /// Record a requirement. Returns `false` if it was already recorded.
    pub fn require(&mut self, target: EnvId) -> bool {
        if target == self.id || self.requirements.contains(&target) {
            return false;
        }
        self.requirements.push(target);
        true
    }

    /// Record a `use`. Returns `false` if it was already imported.
    pub fn import(&mut self, target: EnvId) -> bool {
        if self.imports.contains(&target) {
            return false;
        }
        self.imports.push(target);
        true
    }

    /// Whether `name` is already taken by a class, entity, enum or alias.
    pub fn declares_type(&self, name: &str) -> bool {
        self.classes.contains_key(name)
            || self.entities.contains_key(name)
            || self.enums.contains_key(name)
            || self.aliases.contains_key(name)
    }

    /// Where a class, entity, enum or alias name was declared.
    pub fn declared_span(&self, name: &str) -> Option<Span> {
        self.classes
            .get(name)
            .map(|c| c.span)
            .or_else(|| self.entities.get(name).map(|e| e.span))
            .or_else(|| self.enums.get(name).map(|e| e.span))
            .or_else(|| self.aliases.get(name).map(|a| a.span))
    }

    /// Resolve a type name declared here.
    pub fn declared_type(&self, name: &str) -> Option<DeclaredType> {
        if let Some(class) = self.classes.get(name) {
            return Some(DeclaredType {
                ty: Type::Named {
                    env: self.id,
                    name: name.to_string(),
                    kind: NamedKind::Class,
                },
                is_pub: class.is_pub,
            });
        }
        if let Some(entity) = self.entities.get(name) {
            return Some(DeclaredType {
                ty: Type::Named {
                    env: self.id,
                    name: name.to_string(),
                    kind: NamedKind::Entity,
                },
                is_pub: entity.is_pub,
            });
        }
        if let Some(enum_val) = self.enums.get(name) {
            return Some(DeclaredType {
                ty: Type::Enum {
                    env: self.id,
                    name: name.to_string(),
                },
                is_pub: enum_val.is_pub,
            });
        }
        self.aliases.get(name).map(|alias| DeclaredType {
            ty: alias.ty.clone(),
            is_pub: alias.is_pub,
        })
    }
}
