//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the front-end to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Game(GameAction),
    /// Switch between the colorful and classic themes
    ToggleTheme,
    Quit,
}

/// Map keyboard input to game actions.
///
/// Only presses and repeats count; release events (reported by some
/// terminals) are ignored.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Left => Some(GameAction::MoveLeft),
        KeyCode::Right => Some(GameAction::MoveRight),
        KeyCode::Down => Some(GameAction::MoveDown),
        KeyCode::Up => Some(GameAction::Rotate),

        KeyCode::Char(' ') => Some(GameAction::HardDrop),
        KeyCode::Char('h') | KeyCode::Char('H') => Some(GameAction::Hold),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(GameAction::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Reset),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Check if key should switch the theme.
pub fn should_toggle_theme(key: KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && matches!(key.code, KeyCode::Char('t') | KeyCode::Char('T'))
}

/// Full key dispatch used by the terminal front-end
pub fn map_key(key: KeyEvent) -> Option<InputCommand> {
    if should_quit(key) {
        return Some(InputCommand::Quit);
    }
    if should_toggle_theme(key) {
        return Some(InputCommand::ToggleTheme);
    }
    handle_key_event(key).map(InputCommand::Game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    #[test]
    fn test_arrow_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(GameAction::MoveLeft)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Right)),
            Some(GameAction::MoveRight)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Down)),
            Some(GameAction::MoveDown)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Up)),
            Some(GameAction::Rotate)
        );
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(GameAction::HardDrop)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('H'))),
            Some(GameAction::Hold)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('p'))),
            Some(GameAction::TogglePause)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('r'))),
            Some(GameAction::Reset)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(handle_key_event(release), None);

        let repeat = KeyEvent {
            kind: KeyEventKind::Repeat,
            ..release
        };
        assert_eq!(handle_key_event(repeat), Some(GameAction::MoveLeft));
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }

    #[test]
    fn test_map_key_dispatch() {
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('t'))),
            Some(InputCommand::ToggleTheme)
        );
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('Q'))),
            Some(InputCommand::Quit)
        );
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Up)),
            Some(InputCommand::Game(GameAction::Rotate))
        );
        assert_eq!(map_key(KeyEvent::from(KeyCode::Esc)), None);
    }
}
