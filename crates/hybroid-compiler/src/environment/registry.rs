//! Registry of every environment in a session.
//!
//! User environments live in a `Vec` indexed by [`EnvId::user_index`];
//! libraries are shared through the [`Libraries`] handle and never stored
//! here. Cycle detection runs over the recorded requirement edges.

use std::ops::{Index, IndexMut};
use std::sync::Arc;

use hybroid_core::{AlertKind, EnvId, EnvKind, Library};
use rustc_hash::{FxHashMap, FxHashSet};

use super::Environment;
use crate::libraries::Libraries;

/// All environments of a session.
#[derive(Debug, Clone)]
pub struct EnvironmentRegistry {
    envs: Vec<Environment>,
    by_name: FxHashMap<String, EnvId>,
    libraries: Arc<Libraries>,
    reported_cycles: FxHashSet<(EnvId, EnvId)>,
}

impl EnvironmentRegistry {
    /// An empty registry over a library set.
    pub fn new(libraries: Arc<Libraries>) -> Self {
        Self {
            envs: Vec::new(),
            by_name: FxHashMap::default(),
            libraries,
            reported_cycles: FxHashSet::default(),
        }
    }

    /// Register a user environment.
    ///
    /// The first environment registered under a name keeps it; later ones
    /// are still registered but cannot be reached by name.
    pub fn register(
        &mut self,
        path: impl Into<String>,
        name: impl Into<String>,
        kind: EnvKind,
    ) -> EnvId {
        let id = EnvId::user(self.envs.len());
        let name = name.into();
        self.by_name.entry(name.clone()).or_insert(id);
        self.envs.push(Environment::new(id, path, name, kind));
        id
    }

    /// A user environment.
    pub fn get(&self, id: EnvId) -> Option<&Environment> {
        self.envs.get(id.user_index()?)
    }

    /// A user environment, mutably.
    pub fn get_mut(&mut self, id: EnvId) -> Option<&mut Environment> {
        let index = id.user_index()?;
        self.envs.get_mut(index)
    }

    /// The library set.
    pub fn libraries(&self) -> &Libraries {
        &self.libraries
    }

    /// A shared handle to the library set.
    pub fn libraries_handle(&self) -> Arc<Libraries> {
        Arc::clone(&self.libraries)
    }

    /// Look up a user environment or a library by its source name.
    pub fn lookup(&self, name: &str) -> Option<EnvId> {
        self.by_name
            .get(name)
            .copied()
            .or_else(|| Library::from_name(name).map(Library::env_id))
    }

    /// Display name of any environment handle.
    pub fn name_of(&self, id: EnvId) -> String {
        match id.library() {
            Some(library) => library.name().to_string(),
            None => self
                .get(id)
                .map_or_else(|| id.to_string(), |env| env.name.clone()),
        }
    }

    /// Number of user environments.
    pub fn len(&self) -> usize {
        self.envs.len()
    }

    /// Whether no user environment is registered.
    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    /// User environments in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Environment> {
        self.envs.iter()
    }

    /// Check whether `from` may link `target`.
    pub fn check_access(&self, from: EnvId, target: EnvId) -> Result<(), AlertKind> {
        let Some(from_env) = self.get(from) else {
            return Ok(());
        };
        if let Some(library) = target.library() {
            if from_env.kind.can_use(library) {
                return Ok(());
            }
            return Err(AlertKind::UnallowedLibraryUse {
                library: library.name().to_string(),
                kind: from_env.kind,
            });
        }
        let Some(target_env) = self.get(target) else {
            return Ok(());
        };
        if from_env.kind.can_access(target_env.kind) {
            Ok(())
        } else {
            Err(AlertKind::UnallowedEnvironmentAccess {
                from: from_env.kind,
                to: target_env.kind,
                target: target_env.name.clone(),
            })
        }
    }

    /// Find a requirement path from `target` back to `requester`.
    ///
    /// The returned path starts and ends with `requester`:
    /// `[requester, target, ..., requester]`.
    pub fn find_cycle(&self, requester: EnvId, target: EnvId) -> Option<Vec<EnvId>> {
        let mut visited = FxHashSet::default();
        let mut path = vec![requester, target];
        if self.reaches(target, requester, &mut visited, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    fn reaches(
        &self,
        from: EnvId,
        goal: EnvId,
        visited: &mut FxHashSet<EnvId>,
        path: &mut Vec<EnvId>,
    ) -> bool {
        if from == goal {
            return true;
        }
        if !visited.insert(from) {
            return false;
        }
        let Some(env) = self.get(from) else {
            return false;
        };
        for &next in &env.requirements {
            path.push(next);
            if self.reaches(next, goal, visited, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Mark a cycle between two environments as reported.
    ///
    /// Returns `false` if the pair was already reported, in either order.
    pub fn mark_cycle_reported(&mut self, a: EnvId, b: EnvId) -> bool {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.reported_cycles.insert(key)
    }
}

/// Indexing is for user environments only.
///
/// # Panics
///
/// Panics if `id` is a library or was never registered. Use
/// [`EnvironmentRegistry::get`] when either is possible.
impl Index<EnvId> for EnvironmentRegistry {
    type Output = Environment;

    fn index(&self, id: EnvId) -> &Environment {
        match id.user_index().and_then(|index| self.envs.get(index)) {
            Some(env) => env,
            None => panic!("{id} is not a registered user environment"),
        }
    }
}

impl IndexMut<EnvId> for EnvironmentRegistry {
    fn index_mut(&mut self, id: EnvId) -> &mut Environment {
        match id.user_index().and_then(|index| self.envs.get_mut(index)) {
            Some(env) => env,
            None => panic!("{id} is not a registered user environment"),
        }
    }
}
