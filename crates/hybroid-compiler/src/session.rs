//! Compilation sessions.
//!
//! A [`Session`] owns every environment of one build. Programs are added
//! with [`Session::add_program`], then [`Session::build`] walks them in
//! registration order. An environment reached through `use` or a qualified
//! name is walked on demand before the requester continues, so every
//! environment is walked at most once.
//!
//! Programs are checked out of the session while they are walked; the
//! walker of one environment can therefore recurse into another without
//! holding two borrows of the same tree.

use std::sync::Arc;

use hybroid_ast::Program;
use hybroid_core::{Alert, AlertKind, CompileError, Diagnostics, EnvId, EnvKind, Span};

use crate::environment::{Environment, EnvironmentRegistry, WalkState};
use crate::libraries::Libraries;
use crate::walker::Walker;

// ============================================================================
// Configuration
// ============================================================================

/// Settings of one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Remove statements after a guaranteed exit from the tree.
    pub prune_unreachable: bool,
    /// Count warnings as errors in [`BuildOutput::is_success`].
    pub deny_warnings: bool,
    /// Built-in libraries, shareable between sessions.
    pub libraries: Arc<Libraries>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prune_unreachable: true,
            deny_warnings: false,
            libraries: Libraries::shared(),
        }
    }
}

impl SessionConfig {
    /// Set whether unreachable statements are removed.
    pub fn with_prune_unreachable(mut self, prune: bool) -> Self {
        self.prune_unreachable = prune;
        self
    }

    /// Set whether warnings fail the build.
    pub fn with_deny_warnings(mut self, deny: bool) -> Self {
        self.deny_warnings = deny;
        self
    }

    /// Use an existing library set.
    pub fn with_libraries(mut self, libraries: Arc<Libraries>) -> Self {
        self.libraries = libraries;
        self
    }
}

// ============================================================================
// Session
// ============================================================================

/// One build over a set of programs.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    pub(crate) registry: EnvironmentRegistry,
    programs: Vec<Option<Program>>,
    alerts: Vec<Diagnostics>,
    synthetic: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// A session with an explicit configuration.
    pub fn with_config(config: SessionConfig) -> Self {
        let registry = EnvironmentRegistry::new(Arc::clone(&config.libraries));
        Self {
            config,
            registry,
            programs: Vec::new(),
            alerts: Vec::new(),
            synthetic: 0,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Every registered environment.
    pub fn registry(&self) -> &EnvironmentRegistry {
        &self.registry
    }

    /// Register a program, reading its `env` declaration.
    ///
    /// A program without a usable declaration is still registered, named
    /// after its path, so the rest of it gets checked.
    pub fn add_program(&mut self, path: impl Into<String>, program: Program) -> EnvId {
        let path = path.into();
        let mut alerts = Diagnostics::new();

        let (name, kind) = match program.environment() {
            Some(env) => {
                let kind = EnvKind::from_name(env.kind.as_str()).unwrap_or_else(|| {
                    alerts.report(
                        AlertKind::InvalidEnvironmentType {
                            kind: env.kind.name.clone(),
                        },
                        env.kind.span,
                    );
                    EnvKind::Level
                });
                if let Some(existing) = self.registry.lookup(env.name.as_str()) {
                    let other_path = self
                        .registry
                        .get(existing)
                        .map_or_else(|| existing.to_string(), |e| e.path.clone());
                    alerts.report(
                        AlertKind::DuplicateEnvironmentName {
                            name: env.name.name.clone(),
                            other_path,
                        },
                        env.name.span,
                    );
                }
                (env.name.name.clone(), kind)
            }
            None => {
                let span = program.body.first().map_or_else(Span::default, |s| s.span());
                alerts.push(
                    Alert::new(AlertKind::MissingEnvironmentDeclaration, span)
                        .with_note("start the file with `env Name as Level`"),
                );
                (path.clone(), EnvKind::Level)
            }
        };

        let id = self.registry.register(path, name, kind);
        tracing::debug!(%id, %kind, "registered environment");
        self.programs.push(Some(program));
        self.alerts.push(alerts);
        id
    }

    /// A fresh name for a generated local.
    pub fn synthetic_name(&mut self, prefix: &str) -> String {
        self.synthetic += 1;
        format!("__{prefix}{}", self.synthetic)
    }

    /// Walk one environment unless it was already started.
    #[tracing::instrument(skip(self))]
    pub(crate) fn walk_environment(&mut self, id: EnvId) -> Result<(), CompileError> {
        let index = id
            .user_index()
            .ok_or(CompileError::UnknownEnvironment { id })?;
        let env = self
            .registry
            .get_mut(id)
            .ok_or(CompileError::UnknownEnvironment { id })?;
        if env.state != WalkState::NotWalked {
            return Ok(());
        }
        let mut program = self
            .programs
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| CompileError::ProgramCheckedOut {
                path: env.path.clone(),
            })?;
        env.state = WalkState::Walking;
        tracing::debug!(name = %env.name, "walk start");

        let mut walker = Walker::new(self, id);
        walker.walk_program(&mut program);
        let (alerts, fatal) = walker.finish();

        self.programs[index] = Some(program);
        self.alerts[index].append(alerts);
        self.registry[id].state = WalkState::Walked;
        tracing::debug!(errors = self.alerts[index].error_count(), "walk finish");

        match fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Walk every environment and hand back the results.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(mut self) -> Result<BuildOutput, CompileError> {
        for index in 0..self.registry.len() {
            self.walk_environment(EnvId::user(index))?;
        }
        let programs = self
            .programs
            .into_iter()
            .zip(self.registry.iter())
            .map(|(program, env)| {
                program.ok_or_else(|| CompileError::ProgramCheckedOut {
                    path: env.path.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BuildOutput {
            registry: self.registry,
            programs,
            alerts: self.alerts,
            deny_warnings: self.config.deny_warnings,
        })
    }
}

// ============================================================================
// Output
// ============================================================================

/// Result of a finished build.
#[derive(Debug)]
pub struct BuildOutput {
    registry: EnvironmentRegistry,
    programs: Vec<Program>,
    alerts: Vec<Diagnostics>,
    deny_warnings: bool,
}

impl BuildOutput {
    /// Whether the build produced no errors (and no warnings when denied).
    pub fn is_success(&self) -> bool {
        self.alerts.iter().all(|diags| {
            !diags.has_errors() && !(self.deny_warnings && diags.has_warnings())
        })
    }

    /// Alerts of one environment in report order.
    pub fn alerts(&self, id: EnvId) -> Option<&Diagnostics> {
        self.alerts.get(id.user_index()?)
    }

    /// The rewritten program of one environment.
    pub fn program(&self, id: EnvId) -> Option<&Program> {
        self.programs.get(id.user_index()?)
    }

    /// The analyzed environment.
    pub fn environment(&self, id: EnvId) -> Option<&Environment> {
        self.registry.get(id)
    }

    /// Environments `id` linked, in first-use order.
    pub fn requirements(&self, id: EnvId) -> &[EnvId] {
        match self.registry.get(id) {
            Some(env) => &env.requirements,
            None => &[],
        }
    }

    /// Handles of every environment in registration order.
    pub fn env_ids(&self) -> impl Iterator<Item = EnvId> + '_ {
        self.registry.iter().map(|env| env.id)
    }

    /// Total number of errors over all environments.
    pub fn error_count(&self) -> usize {
        self.alerts.iter().map(Diagnostics::error_count).sum()
    }

    /// Every alert with the environment that produced it.
    pub fn all_alerts(&self) -> impl Iterator<Item = (EnvId, &Alert)> + '_ {
        self.alerts
            .iter()
            .enumerate()
            .flat_map(|(index, diags)| diags.iter().map(move |a| (EnvId::user(index), a)))
    }

    /// Consume the output, keeping the rewritten programs.
    pub fn into_programs(self) -> Vec<Program> {
        self.programs
    }
}
