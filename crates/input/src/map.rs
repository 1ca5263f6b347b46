//! Key mapping from terminal events to player actions.

use crate::types::PlayerAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to player actions.
///
/// Space and Enter both map to [`PlayerAction::Select`]; the host decides
/// whether a select starts a round when no round is being played.
pub fn handle_key_event(key: KeyEvent) -> Option<PlayerAction> {
    match key.code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(PlayerAction::CursorLeft),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(PlayerAction::CursorRight),
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W') => Some(PlayerAction::CursorUp),
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => Some(PlayerAction::CursorDown),

        // Selection
        KeyCode::Char(' ') | KeyCode::Enter => Some(PlayerAction::Select),
        KeyCode::Esc | KeyCode::Backspace => Some(PlayerAction::Cancel),

        // Round
        KeyCode::Char('n' | 'N') => Some(PlayerAction::StartRound),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q' | 'Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
