//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

/// Map keyboard input to game actions.
///
/// Space is both hard drop and START: the session starts a new game when it
/// receives a hard drop while not playing.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(GameAction::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(GameAction::MoveRight),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(GameAction::SoftDrop),

        // Rotation
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('x') => {
            Some(GameAction::RotateCw)
        }
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(GameAction::RotateCcw),

        // Actions
        KeyCode::Char(' ') | KeyCode::Enter => Some(GameAction::HardDrop),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(GameAction::Hold),
        // Only reported once keyboard enhancement is pushed.
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => {
            Some(GameAction::Hold)
        }

        // Restart
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
