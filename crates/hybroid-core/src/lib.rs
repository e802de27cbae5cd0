//! Core types shared by every Hybroid front-end crate.
//!
//! ## Modules
//!
//! - [`span`]: Source positions attached to nodes and alerts
//! - [`ids`]: Environment handles, built-in libraries and environment kinds
//! - [`types`]: The closed [`Type`] model with its equality rules
//! - [`alerts`]: Typed, recoverable diagnostics produced while analyzing
//! - [`error`]: Fatal internal errors (contract violations, never user-facing)

pub mod alerts;
pub mod error;
pub mod ids;
pub mod span;
pub mod types;

pub use alerts::{Alert, AlertCode, AlertKind, Diagnostics, Severity};
pub use error::CompileError;
pub use ids::{EnvId, EnvKind, Library};
pub use span::Span;
pub use types::{FixedKind, NamedKind, Primitive, Type, WrapperKind};
