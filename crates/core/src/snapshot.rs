use arrayvec::ArrayVec;
use serde::Serialize;

use crate::board::RowSet;
use crate::pieces::Tetromino;
use crate::theme::ColorResolver;
use crate::types::{Cell, BOARD_WIDTH, INITIAL_DROP_MS, INITIAL_LEVEL, QUEUE_LEN, TOTAL_HEIGHT};

pub type BoardGrid = [[Cell; BOARD_WIDTH as usize]; TOTAL_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub x: i8,
    pub y: i8,
    pub tetromino: Tetromino,
}

/// Read-only view of everything a presentation layer needs.
///
/// `completed_rows` holds visible-row indices (0 = top visible row), the
/// same numbering a renderer uses for the playfield.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: BoardGrid,
    pub current_piece: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next_pieces: ArrayVec<Tetromino, QUEUE_LEN>,
    pub held_piece: Option<Tetromino>,
    pub can_hold: bool,
    pub score: u32,
    pub high_score: u32,
    pub lines: u32,
    pub level: u32,
    pub drop_time: u32,
    pub game_over: bool,
    pub is_paused: bool,
    pub completed_rows: RowSet,
    pub episode_id: u32,
}

impl GameSnapshot {
    /// Board cell as it should be displayed under `resolver`
    pub fn display_cell(&self, x: usize, y: usize, resolver: &impl ColorResolver) -> Cell {
        self.board
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .flatten()
            .map(|c| resolver.resolve(c))
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; TOTAL_HEIGHT as usize],
            current_piece: None,
            ghost_y: None,
            next_pieces: ArrayVec::new(),
            held_piece: None,
            can_hold: true,
            score: 0,
            high_score: 0,
            lines: 0,
            level: INITIAL_LEVEL,
            drop_time: INITIAL_DROP_MS,
            game_over: false,
            is_paused: false,
            completed_rows: RowSet::new(),
            episode_id: 0,
        }
    }
}
