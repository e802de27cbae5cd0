//! Hybroid semantic analyzer
//!
//! Checks parsed Hybroid programs and rewrites their trees for the Lua
//! generator. Every source file is one environment; environments reach each
//! other through `use` and `Env::name` and are walked on demand.
//!
//! ## Architecture
//!
//! - **Declaration pass**: register types, signatures and entity contracts
//! - **Walk**: type check bodies, track exits, resolve generics and rewrite nodes
//!
//! ## Modules
//!
//! - [`session`]: One build: environments, programs and their alerts
//! - [`environment`]: Per-file environments and the registry that links them
//! - [`libraries`]: Built-in library environments (`Pewpew`, `Fmath`, ...)
//! - [`values`]: Analysis-time values and declared classes, entities and enums
//! - [`scope`]: The scope stack with tags, attributes and variable bindings
//! - [`exits`]: Exit flags and the multi-path conjunction
//! - [`generics`]: Generic inference, substitution and argument validation
//! - [`passes`]: The declaration pass
//! - [`walker`]: Expression and statement walking

pub mod environment;
pub mod exits;
pub mod generics;
pub mod libraries;
pub mod passes;
pub mod scope;
pub mod session;
pub mod values;
pub mod walker;

pub use environment::{Environment, EnvironmentRegistry};
pub use exits::{ExitFlags, MultiPath};
pub use libraries::Libraries;
pub use passes::{DeclarationOutput, DeclarationPass};
pub use session::{BuildOutput, Session, SessionConfig};
pub use values::Value;
pub use walker::Walker;

pub use hybroid_core::{Alert, AlertKind, CompileError, Diagnostics};
