//! Session loop: the single consumer that owns the engine.
//!
//! Input, gravity, and the line-clear deadline are multiplexed with
//! `tokio::select!`; nothing else touches the [`GameState`]. After every step
//! the session drains engine events into the journal, keeps the high score
//! store current, and hands a fresh snapshot to the [`Frontend`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tokio::task;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::config::DriverConfig;
use crate::core::{GameSnapshot, GameState, Phase, Theme};
use crate::high_score::{FileStore, HighScoreStore, MemoryStore};
use crate::journal::Journal;
use crate::types::{GameAction, GameEvent, LINE_CLEAR_DELAY_MS};

/// Messages accepted by the session loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    Action(GameAction),
    ToggleTheme,
    /// Present again without changing anything (e.g. terminal resize)
    Redraw,
    Quit,
}

/// Presentation seam: receives every new snapshot
pub trait Frontend {
    fn present(&mut self, snapshot: &GameSnapshot, theme: Theme) -> Result<()>;
}

impl<F: Frontend + ?Sized> Frontend for &mut F {
    fn present(&mut self, snapshot: &GameSnapshot, theme: Theme) -> Result<()> {
        (**self).present(snapshot, theme)
    }
}

/// Discards frames; for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFrontend;

impl Frontend for NullFrontend {
    fn present(&mut self, _snapshot: &GameSnapshot, _theme: Theme) -> Result<()> {
        Ok(())
    }
}

/// What a finished session looked like
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub snapshot: GameSnapshot,
    pub theme: Theme,
    pub high_score: u32,
    pub frames: u64,
    pub journal_records: u64,
}

/// Line-clear deadline that stops while the game is paused
#[derive(Debug, Default)]
struct ClearTimer {
    deadline: Option<Instant>,
    left: Option<Duration>,
}

impl ClearTimer {
    fn sync(&mut self, game: &GameState, now: Instant) {
        match (game.phase(), game.paused()) {
            (Phase::Clearing, false) => {
                if self.deadline.is_none() {
                    let left = self
                        .left
                        .take()
                        .unwrap_or(Duration::from_millis(LINE_CLEAR_DELAY_MS as u64));
                    self.deadline = Some(now + left);
                }
            }
            (Phase::Clearing, true) => {
                if let Some(deadline) = self.deadline.take() {
                    self.left = Some(deadline.saturating_duration_since(now));
                }
            }
            _ => {
                self.deadline = None;
                self.left = None;
            }
        }
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

/// Gravity timer; the first tick comes one full period after creation
fn gravity_interval(drop_ms: u32) -> Interval {
    let period = Duration::from_millis(drop_ms.max(1) as u64);
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

pub struct Session<F> {
    game: GameState,
    theme: Theme,
    frontend: F,
    /// Stores do blocking I/O; saves run on the blocking pool
    store: Arc<Mutex<Box<dyn HighScoreStore>>>,
    journal: Option<Journal>,
    snapshot: GameSnapshot,
    saved_high_score: u32,
    frames: u64,
    started_at: Instant,
}

impl<F: Frontend> Session<F> {
    /// Wrap an engine; the stored high score is loaded into it.
    pub fn new(
        mut game: GameState,
        theme: Theme,
        frontend: F,
        mut store: Box<dyn HighScoreStore>,
    ) -> Result<Self> {
        let saved_high_score = store.load()?;
        game.set_high_score(saved_high_score);

        Ok(Self {
            game,
            theme,
            frontend,
            store: Arc::new(Mutex::new(store)),
            journal: None,
            snapshot: GameSnapshot::default(),
            saved_high_score,
            frames: 0,
            started_at: Instant::now(),
        })
    }

    /// Build the engine, store, and journal described by `config`.
    pub async fn from_config(config: &DriverConfig, frontend: F) -> Result<Self> {
        let store: Box<dyn HighScoreStore> = match &config.high_score_path {
            Some(path) => Box::new(FileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };
        let game = GameState::new(config.resolved_seed());
        let session = Self::new(game, config.theme, frontend, store)?;

        match config.journal_path() {
            Some(path) => Ok(session.with_journal(Journal::open(path).await?)),
            None => Ok(session),
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    fn gravity_active(&self) -> bool {
        self.game.phase() == Phase::Falling && !self.game.paused()
    }

    /// Run until `Quit` arrives or every input sender is gone.
    pub async fn run(mut self, mut input: mpsc::Receiver<SessionInput>) -> Result<SessionSummary> {
        self.game.start();
        self.after_step().await?;

        let mut drop_ms = self.game.drop_ms();
        let mut episode = self.game.episode_id();
        let mut paused = self.game.paused();
        let mut gravity = gravity_interval(drop_ms);
        let mut clear = ClearTimer::default();
        clear.sync(&self.game, Instant::now());

        loop {
            let deadline = clear.deadline;
            let gravity_on = self.gravity_active();

            tokio::select! {
                msg = input.recv() => match msg {
                    None | Some(SessionInput::Quit) => break,
                    Some(SessionInput::Action(action)) => {
                        self.game.apply_action(action);
                    }
                    Some(SessionInput::ToggleTheme) => {
                        self.theme = self.theme.toggled();
                    }
                    Some(SessionInput::Redraw) => {}
                },
                _ = gravity.tick(), if gravity_on => {
                    self.game.gravity_tick();
                }
                _ = sleep_until_opt(deadline), if deadline.is_some() => {
                    self.game.finish_line_clear();
                }
            }

            clear.sync(&self.game, Instant::now());
            let spawned = self.after_step().await?;

            // Restart gravity on spawn, speed change, reset, or resume: a new
            // piece always waits one full interval before it falls.
            let resumed = paused && !self.game.paused();
            if spawned
                || drop_ms != self.game.drop_ms()
                || episode != self.game.episode_id()
                || resumed
            {
                drop_ms = self.game.drop_ms();
                episode = self.game.episode_id();
                gravity = gravity_interval(drop_ms);
            }
            paused = self.game.paused();
        }

        self.finish().await
    }

    /// Drain events, persist a new best, and present the frame.
    ///
    /// Returns true if a piece spawned during the step.
    async fn after_step(&mut self) -> Result<bool> {
        let t_ms = self.started_at.elapsed().as_millis() as u64;
        let episode_id = self.game.episode_id();
        let mut spawned = false;
        let mut ended = false;

        for event in self.game.take_events() {
            match event {
                GameEvent::Spawned { .. } => spawned = true,
                GameEvent::GameOver { reason, score } => {
                    eprintln!("[Driver] game over ({:?}) with score {}", reason, score);
                    ended = true;
                }
                _ => {}
            }
            if let Some(journal) = self.journal.as_mut() {
                journal.record(t_ms, episode_id, event);
            }
        }
        if ended {
            self.persist_high_score().await;
        }

        self.game.snapshot_into(&mut self.snapshot);
        self.frontend.present(&self.snapshot, self.theme)?;
        self.frames += 1;
        Ok(spawned)
    }

    async fn persist_high_score(&mut self) {
        let best = self.game.high_score();
        if best <= self.saved_high_score {
            return;
        }

        let store = Arc::clone(&self.store);
        let saved = task::spawn_blocking(move || match store.lock() {
            Ok(mut store) => store.save(best),
            Err(_) => Err(anyhow!("high score: store lock poisoned")),
        })
        .await;

        match saved {
            Ok(Ok(())) => self.saved_high_score = best,
            Ok(Err(e)) => eprintln!("[Driver] {}", e),
            Err(e) => eprintln!("[Driver] high score: save task failed: {}", e),
        }
    }

    async fn finish(mut self) -> Result<SessionSummary> {
        self.persist_high_score().await;

        let journal_records = match self.journal.take() {
            Some(journal) => {
                let n = journal.recorded();
                journal.close().await;
                n
            }
            None => 0,
        };

        Ok(SessionSummary {
            snapshot: self.snapshot,
            theme: self.theme,
            high_score: self.game.high_score(),
            frames: self.frames,
            journal_records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::CLASSIC_INK;
    use crate::core::Board;
    use crate::types::{BUFFER_ROWS, INITIAL_DROP_MS, TOTAL_HEIGHT};
    use std::sync::{Arc, Mutex};

    /// Records every presented snapshot
    #[derive(Clone, Default)]
    struct Recorder {
        frames: Arc<Mutex<Vec<(GameSnapshot, Theme)>>>,
    }

    impl Frontend for Recorder {
        fn present(&mut self, snapshot: &GameSnapshot, theme: Theme) -> Result<()> {
            self.frames.lock().unwrap().push((snapshot.clone(), theme));
            Ok(())
        }
    }

    fn session_with(game: GameState) -> (Session<Recorder>, Recorder) {
        let recorder = Recorder::default();
        let session = Session::new(
            game,
            Theme::Colorful,
            recorder.clone(),
            Box::new(MemoryStore::new()),
        )
        .unwrap();
        (session, recorder)
    }

    /// Board whose bottom row is already complete; any placement triggers a clear
    fn board_with_full_bottom_row() -> Board {
        let mut board = Board::new();
        board.fill_row_except(TOTAL_HEIGHT as i8 - 1, CLASSIC_INK, &[]);
        board
    }

    #[tokio::test(start_paused = true)]
    async fn quit_ends_session_with_final_snapshot() {
        let (session, recorder) = session_with(GameState::new(7));
        let (tx, rx) = mpsc::channel(8);
        tx.send(SessionInput::Action(GameAction::HardDrop)).await.unwrap();
        tx.send(SessionInput::Quit).await.unwrap();

        let summary = session.run(rx).await.unwrap();
        assert!(summary.snapshot.current_piece.is_some());
        assert!(summary.snapshot.board.iter().flatten().any(|c| c.is_some()));
        assert_eq!(summary.frames, 2);
        assert_eq!(recorder.frames.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_ends_session() {
        let (session, _) = session_with(GameState::new(7));
        let (tx, rx) = mpsc::channel::<SessionInput>(1);
        drop(tx);
        let summary = session.run(rx).await.unwrap();
        assert_eq!(summary.frames, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gravity_moves_piece_once_per_interval() {
        let (session, _) = session_with(GameState::new(7));
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(session.run(rx));

        time::sleep(Duration::from_millis(INITIAL_DROP_MS as u64 + 50)).await;
        tx.send(SessionInput::Quit).await.unwrap();

        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.snapshot.current_piece.map(|p| p.y), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_gravity() {
        let (session, _) = session_with(GameState::new(7));
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(session.run(rx));

        tx.send(SessionInput::Action(GameAction::TogglePause)).await.unwrap();
        time::sleep(Duration::from_millis(INITIAL_DROP_MS as u64 * 5)).await;
        tx.send(SessionInput::Quit).await.unwrap();

        let summary = handle.await.unwrap().unwrap();
        assert!(summary.snapshot.is_paused);
        assert_eq!(summary.snapshot.current_piece.map(|p| p.y), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn line_clear_completes_after_delay() {
        let (session, _) = session_with(GameState::from_board(3, board_with_full_bottom_row()));
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(session.run(rx));

        tx.send(SessionInput::Action(GameAction::HardDrop)).await.unwrap();
        time::sleep(Duration::from_millis(LINE_CLEAR_DELAY_MS as u64 + 20)).await;
        tx.send(SessionInput::Quit).await.unwrap();

        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.snapshot.lines, 1);
        assert_eq!(summary.snapshot.score, 100);
        assert_eq!(summary.high_score, 100);
        assert!(summary.snapshot.completed_rows.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn piece_after_line_clear_waits_full_interval() {
        let (session, _) = session_with(GameState::from_board(3, board_with_full_bottom_row()));
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(session.run(rx));

        // The clear window swallows the gravity tick due at 800ms.
        time::sleep(Duration::from_millis(700)).await;
        tx.send(SessionInput::Action(GameAction::HardDrop)).await.unwrap();
        time::sleep(Duration::from_millis(LINE_CLEAR_DELAY_MS as u64 + 10)).await;
        tx.send(SessionInput::Quit).await.unwrap();

        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.snapshot.lines, 1);
        assert_eq!(summary.snapshot.current_piece.map(|p| p.y), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn hard_drop_spawn_restarts_gravity() {
        let (session, _) = session_with(GameState::new(7));
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(session.run(rx));

        time::sleep(Duration::from_millis(700)).await;
        tx.send(SessionInput::Action(GameAction::HardDrop)).await.unwrap();
        time::sleep(Duration::from_millis(200)).await;
        tx.send(SessionInput::Quit).await.unwrap();

        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.snapshot.current_piece.map(|p| p.y), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_line_clear_deadline() {
        let (session, _) = session_with(GameState::from_board(3, board_with_full_bottom_row()));
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(session.run(rx));

        tx.send(SessionInput::Action(GameAction::HardDrop)).await.unwrap();
        tx.send(SessionInput::Action(GameAction::TogglePause)).await.unwrap();
        time::sleep(Duration::from_millis(LINE_CLEAR_DELAY_MS as u64 * 4)).await;
        tx.send(SessionInput::Quit).await.unwrap();

        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.snapshot.lines, 0);
        assert_eq!(summary.snapshot.completed_rows.as_slice(), &[19]);
    }

    #[tokio::test(start_paused = true)]
    async fn theme_toggle_reaches_frontend() {
        let (session, recorder) = session_with(GameState::new(1));
        let (tx, rx) = mpsc::channel(8);
        tx.send(SessionInput::ToggleTheme).await.unwrap();
        tx.send(SessionInput::Quit).await.unwrap();

        let summary = session.run(rx).await.unwrap();
        assert_eq!(summary.theme, Theme::Classic);
        let frames = recorder.frames.lock().unwrap();
        assert_eq!(frames.last().map(|(_, t)| *t), Some(Theme::Classic));
        // The stored board is the same under both themes.
        assert_eq!(frames[0].0.board, frames[1].0.board);
    }

    /// Store whose contents the test can still read after handing it over
    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<u32>>);

    impl HighScoreStore for SharedStore {
        fn load(&mut self) -> Result<u32> {
            Ok(*self.0.lock().unwrap())
        }

        fn save(&mut self, score: u32) -> Result<()> {
            *self.0.lock().unwrap() = score;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn new_best_is_saved_on_quit() {
        let store = SharedStore::default();
        let game = GameState::from_board(3, board_with_full_bottom_row());
        let session =
            Session::new(game, Theme::Colorful, NullFrontend, Box::new(store.clone())).unwrap();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(session.run(rx));

        tx.send(SessionInput::Action(GameAction::HardDrop)).await.unwrap();
        time::sleep(Duration::from_millis(LINE_CLEAR_DELAY_MS as u64 + 20)).await;
        tx.send(SessionInput::Quit).await.unwrap();
        handle.await.unwrap().unwrap();

        assert_eq!(*store.0.lock().unwrap(), 100);
    }

    /// Remembers which thread ran the last save
    #[derive(Clone, Default)]
    struct ThreadStore(Arc<Mutex<Option<std::thread::ThreadId>>>);

    impl HighScoreStore for ThreadStore {
        fn load(&mut self) -> Result<u32> {
            Ok(0)
        }

        fn save(&mut self, _score: u32) -> Result<()> {
            *self.0.lock().unwrap() = Some(std::thread::current().id());
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn high_score_save_runs_on_blocking_pool() {
        let store = ThreadStore::default();
        let game = GameState::from_board(3, board_with_full_bottom_row());
        let session =
            Session::new(game, Theme::Colorful, NullFrontend, Box::new(store.clone())).unwrap();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(session.run(rx));

        tx.send(SessionInput::Action(GameAction::HardDrop)).await.unwrap();
        time::sleep(Duration::from_millis(LINE_CLEAR_DELAY_MS as u64 + 20)).await;
        tx.send(SessionInput::Quit).await.unwrap();
        handle.await.unwrap().unwrap();

        let saved_on = store.0.lock().unwrap().take();
        assert!(saved_on.is_some());
        assert_ne!(saved_on, Some(std::thread::current().id()));
    }

    #[tokio::test(start_paused = true)]
    async fn stored_best_seeds_the_engine() {
        let store = SharedStore::default();
        *store.0.lock().unwrap() = 4200;
        let session =
            Session::new(GameState::new(1), Theme::Colorful, NullFrontend, Box::new(store.clone()))
                .unwrap();
        assert_eq!(session.game().high_score(), 4200);

        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        let summary = session.run(rx).await.unwrap();
        assert_eq!(summary.snapshot.high_score, 4200);
        assert_eq!(*store.0.lock().unwrap(), 4200);
    }

    #[tokio::test(start_paused = true)]
    async fn topped_out_board_ends_game_at_start() {
        let mut board = Board::new();
        board.fill_row_except(BUFFER_ROWS as i8, CLASSIC_INK, &[0]);
        let (session, _) = session_with(GameState::from_board(5, board));

        let (tx, rx) = mpsc::channel(8);
        tx.send(SessionInput::Action(GameAction::HardDrop)).await.unwrap();
        tx.send(SessionInput::Quit).await.unwrap();
        let summary = session.run(rx).await.unwrap();

        assert!(summary.snapshot.game_over);
        assert!(summary.snapshot.current_piece.is_none());
        assert_eq!(summary.snapshot.score, 0);
    }
}
