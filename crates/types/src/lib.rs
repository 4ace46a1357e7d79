//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the engine, the terminal
//! front-end, and the journal alike.
//!
//! # Board Dimensions
//!
//! The playfield is wider than the classic one and carries a hidden buffer
//! above the visible area so pieces can spawn off-screen:
//!
//! - **Width**: 15 columns (indexed 0-14)
//! - **Buffer**: rows 0-3, never shown and never cleared
//! - **Visible**: rows 4-23 (20 rows)
//! - **Spawn anchor**: (6, 0), i.e. `BOARD_WIDTH / 2 - 1`
//!
//! # Timing and Progression
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `INITIAL_DROP_MS` | 800 | Gravity interval at level 1 |
//! | `MIN_DROP_MS` | 50 | Gravity never gets faster than this |
//! | `SPEED_NUMERATOR / SPEED_DENOMINATOR` | 4/5 | Interval factor per level-up |
//! | `LINE_CLEAR_DELAY_MS` | 500 | Delay between marking and compacting rows |
//! | `LINES_PER_LEVEL` | 10 | Lines needed per level |
//! | `POINTS_PER_LINE` | 100 | Linear line-clear score |
//!
//! # Examples
//!
//! ```
//! use tetrion_types::{Color, GameAction, PieceKind, BOARD_WIDTH, TOTAL_HEIGHT};
//!
//! assert_eq!(PieceKind::from_str("s2"), Some(PieceKind::S2));
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! assert_eq!(Color::from_hex("#06b6d4"), Some(Color::rgb(0x06, 0xb6, 0xd4)));
//!
//! assert_eq!(BOARD_WIDTH, 15);
//! assert_eq!(TOTAL_HEIGHT, 24);
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Board width in cells (15 columns)
pub const BOARD_WIDTH: u8 = 15;

/// Number of visible rows (20)
pub const VISIBLE_HEIGHT: u8 = 20;

/// Hidden spawn rows above the visible area (4)
pub const BUFFER_ROWS: u8 = 4;

/// Total board height including the buffer (24)
pub const TOTAL_HEIGHT: u8 = VISIBLE_HEIGHT + BUFFER_ROWS;

/// Spawn anchor column
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8 - 1;

/// Spawn anchor row (top of the buffer)
pub const SPAWN_Y: i8 = 0;

/// Number of upcoming pieces kept in the preview queue
pub const QUEUE_LEN: usize = 3;

/// Gravity interval when a game starts (milliseconds per row)
pub const INITIAL_DROP_MS: u32 = 800;

/// Floor for the gravity interval
pub const MIN_DROP_MS: u32 = 50;

/// Level-up speed factor numerator (4/5 = 0.8)
pub const SPEED_NUMERATOR: u32 = 4;

/// Level-up speed factor denominator
pub const SPEED_DENOMINATOR: u32 = 5;

/// Delay between marking completed rows and compacting the board
pub const LINE_CLEAR_DELAY_MS: u32 = 500;

/// Lines cleared per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Score per cleared line (no multi-line bonus)
pub const POINTS_PER_LINE: u32 = 100;

/// Level at the start of a game
pub const INITIAL_LEVEL: u32 = 1;

/// Fixed timestep used by synchronous drivers (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// 24-bit color identity stored in board cells.
///
/// Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex string.
    ///
    /// ```
    /// use tetrion_types::Color;
    ///
    /// assert_eq!(Color::from_hex("#ef4444"), Some(Color::rgb(0xef, 0x44, 0x44)));
    /// assert_eq!(Color::from_hex("ef4444"), Some(Color::rgb(0xef, 0x44, 0x44)));
    /// assert_eq!(Color::from_hex("#fff"), None);
    /// ```
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {}", s)))
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Color)`: Cell filled with the color of the piece that landed there
pub type Cell = Option<Color>;

/// The ten piece kinds
///
/// The seven standard tetrominoes plus three custom shapes:
/// - **A**: a single block
/// - **S2**: the mirrored S, drawn from the pool independently of Z
/// - **U**: a 3x2 cup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    A,
    I,
    J,
    L,
    O,
    S,
    S2,
    T,
    Z,
    U,
}

impl PieceKind {
    /// Number of piece kinds in the pool
    pub const COUNT: usize = 10;

    /// Every kind, in palette-assignment order
    pub const ALL: [PieceKind; Self::COUNT] = [
        PieceKind::A,
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::S2,
        PieceKind::T,
        PieceKind::Z,
        PieceKind::U,
    ];

    /// Position of this kind in [`PieceKind::ALL`]
    pub fn index(self) -> usize {
        match self {
            PieceKind::A => 0,
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::S2 => 6,
            PieceKind::T => 7,
            PieceKind::Z => 8,
            PieceKind::U => 9,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrion_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("U"), Some(PieceKind::U));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "a" => Some(PieceKind::A),
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "s2" => Some(PieceKind::S2),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            "u" => Some(PieceKind::U),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::A => "a",
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::S2 => "s2",
            PieceKind::T => "t",
            PieceKind::Z => "z",
            PieceKind::U => "u",
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// The action set takes no arguments; input mappers and timers both
/// funnel into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down, placing it if blocked
    MoveDown,
    /// Rotate piece 90° clockwise with wall kicks
    Rotate,
    /// Instantly drop piece to lowest valid position and place it
    HardDrop,
    /// Hold current piece (once per placement)
    Hold,
    /// Toggle pause state
    TogglePause,
    /// Start a fresh game, keeping the high score
    Reset,
}

impl GameAction {
    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use tetrion_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("holdPiece"), Some(GameAction::Hold));
    /// assert_eq!(GameAction::from_str("resetGame"), Some(GameAction::Reset));
    /// assert_eq!(GameAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "movedown" => Some(GameAction::MoveDown),
            "rotate" => Some(GameAction::Rotate),
            "harddrop" => Some(GameAction::HardDrop),
            "hold" | "holdpiece" => Some(GameAction::Hold),
            "togglepause" | "pause" => Some(GameAction::TogglePause),
            "reset" | "resetgame" => Some(GameAction::Reset),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveDown => "moveDown",
            GameAction::Rotate => "rotate",
            GameAction::HardDrop => "hardDrop",
            GameAction::Hold => "holdPiece",
            GameAction::TogglePause => "togglePause",
            GameAction::Reset => "resetGame",
        }
    }
}

/// Why a placement write was refused.
///
/// Collision checks make these unreachable in normal play; when one does
/// fire the round ends instead of leaving the board half-written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceError {
    /// A mino lies outside the board (including above row 0)
    OutOfBounds,
    /// A mino targets a cell that is already filled
    Occupied,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::OutOfBounds => "out_of_bounds",
            PlaceError::Occupied => "occupied",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::OutOfBounds => "piece cell outside the board at placement",
            PlaceError::Occupied => "piece cell overlaps a filled cell at placement",
        }
    }
}

impl fmt::Display for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PlaceError {}

impl Serialize for PlaceError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "error")]
pub enum GameOverReason {
    /// The next piece collided at the spawn anchor
    SpawnBlocked,
    /// The held piece collided at the spawn anchor during a swap
    HoldSwapBlocked,
    /// A placement left cells in the top visible row
    ToppedOut,
    /// The placement write itself was refused
    PlacementRejected(PlaceError),
}

/// Engine-side event, drained by drivers for the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum GameEvent {
    #[serde(rename_all = "camelCase")]
    Spawned { kind: PieceKind },
    #[serde(rename_all = "camelCase")]
    Placed { kind: PieceKind, x: i8, y: i8 },
    #[serde(rename_all = "camelCase")]
    RowsCompleted { count: u32 },
    #[serde(rename_all = "camelCase")]
    LinesCleared { count: u32, score: u32, lines: u32 },
    #[serde(rename_all = "camelCase")]
    LevelUp { level: u32, drop_ms: u32 },
    #[serde(rename_all = "camelCase")]
    Held { kind: PieceKind, swapped_in: Option<PieceKind> },
    #[serde(rename_all = "camelCase")]
    PauseToggled { paused: bool },
    #[serde(rename_all = "camelCase")]
    GameOver { reason: GameOverReason, score: u32 },
    #[serde(rename_all = "camelCase")]
    Reset { episode_id: u32 },
}
