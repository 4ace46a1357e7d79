//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] plus the
//! front-end commands (quit, theme switch) that never reach the engine.
//! Key repeat comes from the terminal itself; there is no DAS/ARR layer.

pub mod map;

pub use tetrion_types as types;

pub use map::{handle_key_event, map_key, should_quit, should_toggle_theme, InputCommand};
