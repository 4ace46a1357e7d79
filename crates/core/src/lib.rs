//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has no dependencies on UI, timers, or I/O: the host decides when gravity
//! and the line-clear delay fire, either by calling [`GameState::tick`] with
//! elapsed time or by driving the individual operations directly.
//!
//! # Module Structure
//!
//! - [`board`]: 15x24 board (4 hidden buffer rows) with collision and row compaction
//! - [`game_state`]: Complete game state: active piece, queue, hold, pause, deferred clears
//! - [`pieces`]: Shape matrices, matrix rotation, and the shared wall-kick list
//! - [`rng`]: Uniform piece generation, per-game palette, and the preview queue
//! - [`scoring`]: Linear line scoring, level-ups, and gravity speed
//! - [`snapshot`]: Read-only view for presentation layers
//! - [`theme`]: Palette and display-color resolution
//!
//! # Game Rules
//!
//! - **Ten piece kinds**: the seven classics plus a monomino, a U pentomino, and
//!   a second S-type shape, all drawn uniformly at random
//! - **Rotation**: clockwise only, six kick offsets tried in order
//! - **No lock delay**: a piece that cannot fall further is placed at once
//! - **Deferred clears**: full rows stay visible for 500ms before compaction
//! - **Scoring**: 100 points per line, one level per 10 lines, gravity × 0.8 per level
//!
//! # Example
//!
//! ```
//! use tetrion_core::GameState;
//! use tetrion_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert!(game.board().filled_count() > 0);
//! assert_eq!(game.score(), 0);
//! ```

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod theme;

pub use tetrion_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, RowSet};
pub use game_state::{ActivePiece, GameState, Phase};
pub use pieces::{base_shape, try_rotate, Shape, Tetromino};
pub use rng::{PieceGenerator, PieceQueue, SimpleRng};
pub use scoring::{line_clear_points, next_drop_ms, Progress};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use theme::{ColorResolver, Theme, ThemeStyle};
