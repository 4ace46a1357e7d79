//! Tetrion (workspace facade crate).
//!
//! Re-exports the workspace crates as `tetrion::{core,driver,input,term,types}`
//! and provides the terminal [`frontend`] used by the `tetrion` binary.

pub mod frontend;

pub use tetrion_core as core;
pub use tetrion_driver as driver;
pub use tetrion_input as input;
pub use tetrion_term as term;
pub use tetrion_types as types;
