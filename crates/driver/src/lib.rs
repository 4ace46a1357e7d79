//! Reference driver for the engine.
//!
//! Owns the timing the engine leaves to its host: a tokio loop multiplexes
//! input, gravity, and the line-clear deadline into one [`session::Session`].
//! Also provides configuration, the JSON-lines event journal, and high-score
//! persistence.

pub mod config;
pub mod high_score;
pub mod journal;
pub mod session;

pub use tetrion_core as core;
pub use tetrion_types as types;

pub use config::DriverConfig;
pub use high_score::{FileStore, HighScoreStore, MemoryStore};
pub use journal::{Journal, JournalRecord};
pub use session::{Frontend, NullFrontend, Session, SessionInput, SessionSummary};
