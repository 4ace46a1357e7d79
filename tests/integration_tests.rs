//! Integration tests for the game engine through the facade crate

use crossterm::event::{KeyCode, KeyEvent};

use tetrion::core::theme::CLASSIC_INK;
use tetrion::core::{Board, GameState, Phase, SimpleRng, Theme};
use tetrion::input::{map_key, InputCommand};
use tetrion::types::{
    GameAction, GameEvent, BOARD_WIDTH, BUFFER_ROWS, INITIAL_DROP_MS, INITIAL_LEVEL,
    LINE_CLEAR_DELAY_MS, MIN_DROP_MS, QUEUE_LEN, TICK_MS, TOTAL_HEIGHT,
};

const ACTIONS: [GameAction; 6] = [
    GameAction::MoveLeft,
    GameAction::MoveRight,
    GameAction::MoveDown,
    GameAction::Rotate,
    GameAction::HardDrop,
    GameAction::Hold,
];

#[test]
fn test_game_lifecycle() {
    let mut state = GameState::new(12345);
    assert!(!state.started());
    assert_eq!(state.phase(), Phase::NoActivePiece);

    state.start();
    assert!(state.started());
    assert!(state.active().is_some());
    assert_eq!(state.phase(), Phase::Falling);
    assert_eq!(state.next_pieces().len(), QUEUE_LEN);
    assert_eq!(state.level(), INITIAL_LEVEL);
    assert_eq!(state.drop_ms(), INITIAL_DROP_MS);
}

#[test]
fn test_same_seed_same_game() {
    let mut a = GameState::new(2024);
    let mut b = GameState::new(2024);
    a.start();
    b.start();

    for _ in 0..30 {
        assert_eq!(a.active(), b.active());
        assert_eq!(a.next_pieces(), b.next_pieces());
        a.hard_drop();
        b.hard_drop();
    }
    assert_eq!(a.board(), b.board());
}

/// Random play: counters only move forward, the board keeps its shape, and
/// the queue stays full until the round ends.
#[test]
fn test_random_play_invariants() {
    for seed in [1u32, 7, 99, 4242] {
        let mut state = GameState::new(seed);
        state.start();
        let mut rng = SimpleRng::new(seed.wrapping_mul(31));

        let mut last_score = 0;
        let mut last_lines = 0;
        let mut last_level = state.level();
        let mut last_drop = state.drop_ms();

        for _ in 0..5_000 {
            if state.game_over() {
                break;
            }
            let action = ACTIONS[rng.next_range(ACTIONS.len() as u32) as usize];
            state.apply_action(action);
            state.tick(TICK_MS * 4);

            assert!(state.score() >= last_score);
            assert!(state.lines() >= last_lines);
            assert!(state.level() >= last_level);
            assert!(state.drop_ms() <= last_drop);
            assert!(state.drop_ms() >= MIN_DROP_MS);
            assert!(state.high_score() >= state.score());
            assert_eq!(state.score(), state.lines() * 100);
            assert_eq!(state.board().rows().count(), TOTAL_HEIGHT as usize);
            if !state.game_over() {
                assert_eq!(state.next_pieces().len(), QUEUE_LEN);
            }

            last_score = state.score();
            last_lines = state.lines();
            last_level = state.level();
            last_drop = state.drop_ms();
        }
    }
}

#[test]
fn test_hard_drops_eventually_top_out() {
    let mut state = GameState::new(77);
    state.start();

    let mut drops = 0;
    while !state.game_over() && drops < 500 {
        state.hard_drop();
        // Let any pending clear finish.
        state.tick(LINE_CLEAR_DELAY_MS);
        drops += 1;
    }
    assert!(state.game_over());
    assert_eq!(state.phase(), Phase::GameOver);

    let events = state.take_events();
    assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));

    // Terminal until reset.
    for action in ACTIONS {
        assert!(!state.apply_action(action));
    }
    assert!(!state.apply_action(GameAction::TogglePause));
    assert!(state.apply_action(GameAction::Reset));
    assert!(!state.game_over());
    assert_eq!(state.board().filled_count(), 0);
}

#[test]
fn test_prepared_board_line_clear() {
    let mut board = Board::new();
    board.fill_row_except(TOTAL_HEIGHT as i8 - 1, CLASSIC_INK, &[]);
    board.fill_row_except(TOTAL_HEIGHT as i8 - 2, CLASSIC_INK, &[]);

    let mut state = GameState::from_board(9, board);
    state.start();
    assert!(state.hard_drop());

    assert_eq!(state.phase(), Phase::Clearing);
    assert_eq!(state.snapshot().completed_rows.as_slice(), &[18, 19]);
    assert_eq!(state.line_clear_remaining_ms(), Some(LINE_CLEAR_DELAY_MS));

    // Nothing moves during the clear window.
    assert!(!state.apply_action(GameAction::HardDrop));

    assert!(state.tick(LINE_CLEAR_DELAY_MS));
    assert_eq!(state.lines(), 2);
    assert_eq!(state.score(), 200);
    assert_eq!(state.phase(), Phase::Falling);
    assert!(state.line_clear_remaining_ms().is_none());
}

#[test]
fn test_hold_cycle() {
    let mut state = GameState::new(31);
    state.start();
    assert!(state.can_hold());

    assert!(state.apply_action(GameAction::Hold));
    assert!(!state.can_hold());
    assert!(state.held_piece().is_some());
    assert!(!state.apply_action(GameAction::Hold));

    assert!(state.apply_action(GameAction::HardDrop));
    assert!(state.can_hold());
}

#[test]
fn test_reset_keeps_high_score_only() {
    let mut board = Board::new();
    board.fill_row_except(TOTAL_HEIGHT as i8 - 1, CLASSIC_INK, &[]);
    let mut state = GameState::from_board(4, board);
    state.start();
    state.hard_drop();
    state.tick(LINE_CLEAR_DELAY_MS);
    state.apply_action(GameAction::Hold);
    assert_eq!(state.score(), 100);

    assert!(state.reset_game());
    assert_eq!(state.score(), 0);
    assert_eq!(state.lines(), 0);
    assert_eq!(state.high_score(), 100);
    assert!(state.held_piece().is_none());
    assert!(state.can_hold());
    assert_eq!(state.episode_id(), 1);
}

#[test]
fn test_snapshot_json_shape() {
    let mut state = GameState::new(5);
    state.start();
    state.hard_drop();

    let json = serde_json::to_value(state.snapshot()).unwrap();
    let board = json["board"].as_array().unwrap();
    assert_eq!(board.len(), TOTAL_HEIGHT as usize);
    assert_eq!(board[0].as_array().unwrap().len(), BOARD_WIDTH as usize);
    assert!(board[0][0].is_null());
    assert!(board
        .iter()
        .flat_map(|r| r.as_array().unwrap())
        .any(|c| c.as_str().map_or(false, |s| s.starts_with('#'))));

    assert_eq!(json["nextPieces"].as_array().unwrap().len(), QUEUE_LEN);
    assert!(json["currentPiece"]["tetromino"]["shape"].is_array());
    assert_eq!(json["canHold"], true);
    assert_eq!(json["dropTime"], INITIAL_DROP_MS);
    assert_eq!(json["isPaused"], false);
    assert_eq!(json["gameOver"], false);
    assert!(json["completedRows"].as_array().unwrap().is_empty());
}

#[test]
fn test_theme_changes_display_not_state() {
    let mut state = GameState::new(5);
    state.start();
    state.hard_drop();
    let snap = state.snapshot();

    let (x, y) = (0..TOTAL_HEIGHT as usize)
        .flat_map(|y| (0..BOARD_WIDTH as usize).map(move |x| (x, y)))
        .find(|&(x, y)| snap.board[y][x].is_some())
        .unwrap();

    assert_eq!(snap.display_cell(x, y, &Theme::Classic), Some(CLASSIC_INK));
    assert_eq!(snap.display_cell(x, y, &Theme::Colorful), snap.board[y][x]);
    assert!(y >= BUFFER_ROWS as usize);
}

#[test]
fn test_keys_drive_the_engine() {
    let mut state = GameState::new(12);
    state.start();
    let x0 = state.active().unwrap().x;

    let keys = [KeyCode::Left, KeyCode::Char('p'), KeyCode::Right];
    for key in keys {
        if let Some(InputCommand::Game(action)) = map_key(KeyEvent::from(key)) {
            state.apply_action(action);
        }
    }
    // Paused after 'p', so the right move was ignored.
    assert!(state.paused());
    assert_eq!(state.active().unwrap().x, x0 - 1);
}

/// The journal fields a log consumer relies on
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct JournalLine {
    seq: u64,
    t_ms: u64,
    episode_id: u32,
    event: String,
}

#[test]
fn test_driver_session_writes_journal() {
    use tetrion::driver::{DriverConfig, NullFrontend, Session, SessionInput};
    use tokio::sync::mpsc;

    let path = std::env::temp_dir().join(format!("tetrion-it-{}.jsonl", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let config = DriverConfig {
        seed: Some(321),
        log_path: Some(path.to_string_lossy().into_owned()),
        ..DriverConfig::default()
    };

    let summary = tokio_test::block_on(async {
        let session = Session::from_config(&config, NullFrontend).await?;
        let (tx, rx) = mpsc::channel(16);
        for _ in 0..3 {
            tx.send(SessionInput::Action(GameAction::HardDrop)).await?;
        }
        tx.send(SessionInput::Quit).await?;
        session.run(rx).await
    })
    .unwrap();

    assert_eq!(summary.frames, 4);
    assert!(summary.journal_records >= 6);

    let text = std::fs::read_to_string(&path).unwrap();
    let records: Vec<JournalLine> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len() as u64, summary.journal_records);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.seq, i as u64);
        assert_eq!(record.episode_id, 0);
    }
    assert_eq!(records[0].event, "spawned");
    assert_eq!(records[1].event, "placed");
    assert!(records.windows(2).all(|w| w[0].t_ms <= w[1].t_ms));

    let _ = std::fs::remove_file(&path);
}
