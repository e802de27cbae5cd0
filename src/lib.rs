//! Hybroid
//!
//! Semantic analysis for Hybroid, a language compiled to Lua for the PewPew
//! Live engine. Hand the analyzer parsed programs, one per source file, and
//! get back the rewritten trees with every alert found on the way.
//!
//! ```ignore
//! use hybroid::{Session, SessionConfig};
//!
//! let mut session = Session::with_config(SessionConfig::default());
//! let level = session.add_program("level.hyb", level_program);
//! let shared = session.add_program("helpers.hyb", helper_program);
//! let output = session.build()?;
//! for alert in output.alerts(level).into_iter().flatten() {
//!     println!("{alert}");
//! }
//! ```
//!
//! ## Crates
//!
//! - [`core`]: spans, environment handles, the type model and alerts
//! - [`ast`]: the syntax tree the analyzer reads and rewrites
//! - [`compiler`]: sessions, environments, the declaration pass and the walker

pub use hybroid_ast as ast;
pub use hybroid_compiler as compiler;
pub use hybroid_core as core;

pub use hybroid_ast::Program;
pub use hybroid_compiler::{
    BuildOutput, Environment, EnvironmentRegistry, Libraries, Session, SessionConfig, Value,
};
pub use hybroid_core::{
    Alert, AlertCode, AlertKind, CompileError, Diagnostics, EnvId, EnvKind, Library, Severity,
    Span, Type,
};

/// Analyze a set of programs with one session.
///
/// Programs are registered in the order given, so the first one found
/// wins when two declare the same environment name.
pub fn analyze<P, I>(config: SessionConfig, programs: I) -> Result<BuildOutput, CompileError>
where
    P: Into<String>,
    I: IntoIterator<Item = (P, Program)>,
{
    let mut session = Session::with_config(config);
    for (path, program) in programs {
        session.add_program(path, program);
    }
    session.build()
}
