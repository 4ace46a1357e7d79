//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal gameplay. It renders
//! a [`core::GameSnapshot`] into a simple framebuffer that is then flushed
//! to the terminal as full or diff redraws.
//!
//! Colors go through the active [`core::Theme`], so switching themes changes
//! what is drawn without touching game state.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetrion_core as core;
pub use tetrion_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
