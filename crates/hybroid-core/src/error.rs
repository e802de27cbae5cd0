//! Fatal errors.
//!
//! These never describe a problem in user code; those are [`crate::Alert`]s.
//! A `CompileError` means the analyzer itself was driven outside its
//! contract, and the build stops.

use thiserror::Error;

use crate::EnvId;

/// An internal contract violation that aborts a build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A handle that no environment was registered under.
    #[error("no environment is registered as {id}")]
    UnknownEnvironment { id: EnvId },

    /// A program that is already checked out for walking was requested again.
    #[error("the program of '{path}' is already being walked")]
    ProgramCheckedOut { path: String },

    /// A body was checked before its container was registered.
    #[error("'{member}' was checked before its container '{container}' was registered")]
    UnregisteredContainer { container: String, member: String },
}
