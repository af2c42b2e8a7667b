//! Key bindings: arrows and the IJKL cluster.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    Start,
    Pause,
    Resume,
    Confirm,
    Cancel,
    Quit,
    None,
}

/// Map key event to game action.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if modifiers == KeyModifiers::CONTROL {
        return match code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::None,
        };
    }
    if !modifiers.is_empty() && modifiers != KeyModifiers::SHIFT {
        return Action::None;
    }
    match code {
        KeyCode::Left => Action::MoveLeft,
        KeyCode::Right => Action::MoveRight,
        KeyCode::Up => Action::Rotate,
        KeyCode::Down => Action::SoftDrop,
        KeyCode::Esc => Action::Quit,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'j' => Action::MoveLeft,
            'l' => Action::MoveRight,
            'i' => Action::Rotate,
            'k' => Action::SoftDrop,
            's' => Action::Start,
            'p' => Action::Pause,
            'r' => Action::Resume,
            'y' => Action::Confirm,
            'n' => Action::Cancel,
            'q' => Action::Quit,
            _ => Action::None,
        },
        _ => Action::None,
    }
}
