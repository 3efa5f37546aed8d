//! Key mapping from terminal events to shell actions.

use crate::types::Direction;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    /// Board cursor or map focus
    Move(Direction),
    /// Select the cell under the cursor, or enter the focused level
    Confirm,
    /// Drop the current selection
    Cancel,
    Hint,
    Restart,
    /// Leave the board (back to the map in adventure mode)
    Back,
    /// Left click at a terminal cell; the shell resolves it to a board cell
    /// or a level
    Click { column: u16, row: u16 },
}

/// Map keyboard input to shell actions.
pub fn handle_key_event(key: KeyEvent) -> Option<ShellAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(ShellAction::Move(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(ShellAction::Move(Direction::Right))
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(ShellAction::Move(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(ShellAction::Move(Direction::Down))
        }

        // Actions
        KeyCode::Enter | KeyCode::Char(' ') => Some(ShellAction::Confirm),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(ShellAction::Cancel),
        KeyCode::Char('?') | KeyCode::Char('i') | KeyCode::Char('I') => Some(ShellAction::Hint),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(ShellAction::Restart),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') | KeyCode::Char('B') => Some(ShellAction::Back),

        _ => None,
    }
}

/// Map mouse input to shell actions. Only left-button presses count.
pub fn handle_mouse_event(event: MouseEvent) -> Option<ShellAction> {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(ShellAction::Click {
            column: event.column,
            row: event.row,
        }),
        _ => None,
    }
}

/// Check if key should quit the program.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
