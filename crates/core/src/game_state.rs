//! Game state module - manages the complete game state
//!
//! This module ties together all core components: board, pieces, generator,
//! and scoring. It handles piece movement, rotation, placement, the deferred
//! line clear, hold, pause, and game lifecycle.
//!
//! Every action is a method on one owned [`GameState`]. Rejected actions
//! (collisions, wrong phase) are silent and return `false`.

use std::collections::VecDeque;

use crate::board::{Board, RowSet};
use crate::pieces::{try_rotate, Tetromino};
use crate::rng::{PieceGenerator, PieceQueue};
use crate::scoring::Progress;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;

/// Events kept when nobody drains them
const EVENT_BACKLOG: usize = 256;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub x: i8,
    pub y: i8,
    pub tetromino: Tetromino,
}

impl ActivePiece {
    /// Place a tetromino at the spawn anchor
    pub fn spawn(tetromino: Tetromino) -> Self {
        Self {
            x: SPAWN_X,
            y: SPAWN_Y,
            tetromino,
        }
    }

    /// Check if the piece sits on free cells
    pub fn fits(&self, board: &Board) -> bool {
        board.is_valid_move(self.x, self.y, &self.tetromino.shape)
    }

    fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            x: value.x,
            y: value.y,
            tetromino: value.tetromino,
        }
    }
}

/// Coarse lifecycle state; `paused` overlays `Falling` and `Clearing`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started yet
    NoActivePiece,
    Falling,
    /// Completed rows are marked and waiting to be compacted
    Clearing,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: Option<ActivePiece>,
    generator: PieceGenerator,
    queue: PieceQueue,
    held: Option<Tetromino>,
    can_hold: bool,
    progress: Progress,
    high_score: u32,
    /// Board row indices pending compaction
    completed_rows: RowSet,
    line_clear_timer_ms: u32,
    gravity_timer_ms: u32,
    paused: bool,
    game_over: bool,
    started: bool,
    /// Monotonic episode id (increments on reset).
    episode_id: u32,
    events: VecDeque<GameEvent>,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self {
            board: Board::new(),
            active: None,
            generator: PieceGenerator::new(seed),
            queue: PieceQueue::new(),
            held: None,
            can_hold: true,
            progress: Progress::new(),
            high_score: 0,
            completed_rows: RowSet::new(),
            line_clear_timer_ms: 0,
            gravity_timer_ms: 0,
            paused: false,
            game_over: false,
            started: false,
            episode_id: 0,
            events: VecDeque::new(),
        }
    }

    /// Create a game on a prepared board (puzzles, replays, tests)
    pub fn from_board(seed: u32, board: Board) -> Self {
        Self {
            board,
            ..Self::new(seed)
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_piece();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u32 {
        self.progress.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Seed the session high score (e.g. from persistent storage)
    pub fn set_high_score(&mut self, high_score: u32) {
        self.high_score = self.high_score.max(high_score);
    }

    pub fn lines(&self) -> u32 {
        self.progress.lines
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    /// Current gravity interval in milliseconds
    pub fn drop_ms(&self) -> u32 {
        self.progress.drop_ms
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn held_piece(&self) -> Option<Tetromino> {
        self.held
    }

    pub fn next_pieces(&self) -> &[Tetromino] {
        self.queue.pieces()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Board rows waiting to be compacted
    pub fn completed_rows(&self) -> &[usize] {
        &self.completed_rows
    }

    /// Time left before marked rows are compacted
    pub fn line_clear_remaining_ms(&self) -> Option<u32> {
        if self.completed_rows.is_empty() {
            None
        } else {
            Some(self.line_clear_timer_ms)
        }
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else if !self.completed_rows.is_empty() {
            Phase::Clearing
        } else if self.active.is_some() {
            Phase::Falling
        } else {
            Phase::NoActivePiece
        }
    }

    /// Whether movement-type actions are currently accepted
    pub fn is_playable(&self) -> bool {
        self.started && !self.game_over && !self.paused && self.active.is_some()
    }

    /// Drain pending events, oldest first
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    fn emit(&mut self, event: GameEvent) {
        if self.events.len() == EVENT_BACKLOG {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        for (dst, src) in out.board.iter_mut().zip(self.board.rows()) {
            dst.copy_from_slice(src);
        }

        out.current_piece = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next_pieces.clear();
        out.next_pieces
            .extend(self.queue.pieces().iter().copied());
        out.held_piece = self.held;
        out.can_hold = self.can_hold;
        out.score = self.progress.score;
        out.high_score = self.high_score;
        out.lines = self.progress.lines;
        out.level = self.progress.level;
        out.drop_time = self.progress.drop_ms;
        out.game_over = self.game_over;
        out.is_paused = self.paused;
        out.completed_rows.clear();
        out.completed_rows.extend(
            self.completed_rows
                .iter()
                .map(|&row| row - BUFFER_ROWS as usize),
        );
        out.episode_id = self.episode_id;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// End the round. The board is left as it is.
    fn end_round(&mut self, reason: GameOverReason) {
        self.game_over = true;
        self.high_score = self.high_score.max(self.progress.score);
        self.emit(GameEvent::GameOver {
            reason,
            score: self.progress.score,
        });
    }

    /// Spawn a new piece from the queue
    ///
    /// The queue head is consumed even when the spawn fails; a blocked spawn
    /// (or a board that is already topped out) ends the round instead of
    /// producing an active piece.
    pub fn spawn_piece(&mut self) -> bool {
        let tetromino = self.queue.advance(&mut self.generator);
        let piece = ActivePiece::spawn(tetromino);

        if self.board.is_topped_out() || !piece.fits(&self.board) {
            self.active = None;
            self.end_round(GameOverReason::SpawnBlocked);
            return false;
        }

        self.active = Some(piece);
        self.gravity_timer_ms = 0;
        self.emit(GameEvent::Spawned {
            kind: tetromino.kind,
        });
        true
    }

    /// Try to move the active piece
    fn try_shift(&mut self, dx: i8, dy: i8) -> bool {
        if !self.is_playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let moved = active.shifted(dx, dy);
        if moved.fits(&self.board) {
            self.active = Some(moved);
            return true;
        }
        false
    }

    pub fn move_left(&mut self) -> bool {
        self.try_shift(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_shift(1, 0)
    }

    /// Shift down one row, or place the piece if it cannot fall further
    pub fn move_down(&mut self) -> bool {
        if !self.is_playable() {
            return false;
        }
        if self.try_shift(0, 1) {
            return true;
        }
        self.place_active()
    }

    /// Gravity step: same rules as [`GameState::move_down`], restarting the
    /// gravity timer.
    pub fn gravity_tick(&mut self) -> bool {
        self.gravity_timer_ms = 0;
        self.move_down()
    }

    /// Rotate clockwise, trying each wall-kick offset in order
    pub fn rotate(&mut self) -> bool {
        if !self.is_playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let board = &self.board;
        let result = try_rotate(&active.tetromino.shape, active.x, active.y, |x, y, s| {
            board.is_valid_move(x, y, s)
        });

        let Some((shape, (dx, dy))) = result else {
            return false;
        };

        self.active = Some(ActivePiece {
            x: active.x + dx,
            y: active.y + dy,
            tetromino: Tetromino {
                shape,
                ..active.tetromino
            },
        });
        true
    }

    /// Drop straight to the lowest free row and place in one step
    pub fn hard_drop(&mut self) -> bool {
        if !self.is_playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let y = self
            .board
            .landing_y(active.x, active.y, &active.tetromino.shape);
        self.active = Some(ActivePiece { y, ..active });
        self.place_active()
    }

    /// Set the active piece aside, or swap it with the held one
    pub fn hold_piece(&mut self) -> bool {
        if !self.can_hold || !self.is_playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        match self.held {
            Some(held) => {
                let incoming = ActivePiece::spawn(held);
                if !incoming.fits(&self.board) {
                    // Nothing is swapped: held slot and active piece stay put.
                    self.end_round(GameOverReason::HoldSwapBlocked);
                    return true;
                }
                self.held = Some(active.tetromino);
                self.active = Some(incoming);
                self.gravity_timer_ms = 0;
                self.emit(GameEvent::Held {
                    kind: active.tetromino.kind,
                    swapped_in: Some(held.kind),
                });
            }
            None => {
                self.held = Some(active.tetromino);
                self.active = None;
                self.emit(GameEvent::Held {
                    kind: active.tetromino.kind,
                    swapped_in: None,
                });
                self.spawn_piece();
            }
        }

        self.can_hold = false;
        true
    }

    /// Write the active piece into the board and move the round along
    fn place_active(&mut self) -> bool {
        let Some(piece) = self.active.take() else {
            return false;
        };

        let t = piece.tetromino;
        if let Err(e) = self.board.place(piece.x, piece.y, &t.shape, t.color) {
            self.end_round(GameOverReason::PlacementRejected(e));
            return true;
        }
        self.emit(GameEvent::Placed {
            kind: t.kind,
            x: piece.x,
            y: piece.y,
        });

        // Topping out wins over a simultaneous line clear.
        if self.board.is_topped_out() {
            self.end_round(GameOverReason::ToppedOut);
            return true;
        }

        self.can_hold = true;

        let rows = self.board.full_visible_rows();
        if rows.is_empty() {
            self.spawn_piece();
        } else {
            self.emit(GameEvent::RowsCompleted {
                count: rows.len() as u32,
            });
            self.completed_rows = rows;
            self.line_clear_timer_ms = LINE_CLEAR_DELAY_MS;
        }
        true
    }

    /// Compact marked rows, credit them, and spawn the next piece.
    ///
    /// Rejected while paused; the clear waits for the resume.
    pub fn finish_line_clear(&mut self) -> bool {
        if self.completed_rows.is_empty() || self.game_over || self.paused {
            return false;
        }

        let rows = std::mem::take(&mut self.completed_rows);
        self.line_clear_timer_ms = 0;
        self.board.remove_rows(&rows);

        let cleared = rows.len() as u32;
        let outcome = self.progress.apply_clear(cleared);
        self.high_score = self.high_score.max(self.progress.score);

        self.emit(GameEvent::LinesCleared {
            count: cleared,
            score: self.progress.score,
            lines: self.progress.lines,
        });
        if outcome.leveled_up {
            self.emit(GameEvent::LevelUp {
                level: self.progress.level,
                drop_ms: self.progress.drop_ms,
            });
        }

        self.spawn_piece();
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.paused = !self.paused;
        self.emit(GameEvent::PauseToggled {
            paused: self.paused,
        });
        true
    }

    /// Start over: everything but the high score goes back to its initial
    /// value, colors are re-dealt, and a fresh queue spawns the first piece.
    pub fn reset_game(&mut self) -> bool {
        self.high_score = self.high_score.max(self.progress.score);

        self.board.clear();
        self.active = None;
        self.queue.clear();
        self.held = None;
        self.can_hold = true;
        self.progress = Progress::new();
        self.completed_rows.clear();
        self.line_clear_timer_ms = 0;
        self.gravity_timer_ms = 0;
        self.paused = false;
        self.game_over = false;
        self.generator.shuffle_palette();

        self.episode_id = self.episode_id.wrapping_add(1);
        self.emit(GameEvent::Reset {
            episode_id: self.episode_id,
        });

        self.started = true;
        self.spawn_piece();
        true
    }

    /// Advance timers by `elapsed_ms`.
    ///
    /// Runs the pending line clear once its delay has passed, otherwise
    /// applies gravity each time a full drop interval has accumulated.
    /// Returns true if the state changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.started || self.paused || self.game_over {
            return false;
        }

        if !self.completed_rows.is_empty() {
            self.line_clear_timer_ms = self.line_clear_timer_ms.saturating_sub(elapsed_ms);
            if self.line_clear_timer_ms == 0 {
                return self.finish_line_clear();
            }
            return false;
        }

        if self.active.is_none() {
            return false;
        }

        self.gravity_timer_ms = self.gravity_timer_ms.saturating_add(elapsed_ms);
        if self.gravity_timer_ms >= self.progress.drop_ms {
            return self.gravity_tick();
        }
        false
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::MoveDown => self.move_down(),
            GameAction::Rotate => self.rotate(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Hold => self.hold_piece(),
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::Reset => self.reset_game(),
        }
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        Some(
            self.board
                .landing_y(active.x, active.y, &active.tetromino.shape),
        )
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
