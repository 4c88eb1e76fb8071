//! Key mapping from terminal events to host commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Commands the terminal host understands besides pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    /// Start over with a fresh board
    Restart,
    /// Highlight every run currently on the board
    ShowMatches,
}

/// Map keyboard input to host commands.
pub fn handle_key_event(key: KeyEvent) -> Option<KeyCommand> {
    if should_quit(key) {
        return Some(KeyCommand::Quit);
    }
    match key.code {
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyCommand::Restart),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(KeyCommand::ShowMatches),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
