//! Analysis passes.
//!
//! - [`declaration`]: register types and signatures before any body is walked
//!
//! Bodies are checked by the [`Walker`](crate::walker::Walker) itself once the
//! declaration pass is done.

pub mod declaration;

pub use declaration::{DeclarationOutput, DeclarationPass};
