//! Keyboard and on-screen button mapping
//!
//! Bindings are fixed. Held keys rely on the terminal's own key repeat,
//! which arrives as repeated press events.

use crate::game::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Gameplay action, honored only while a round is running
    Game(Action),
    TogglePause,
    ToggleSound,
    /// Enter or Space outside of gameplay: dismiss a notice
    Confirm,
    Quit,
}

/// Map a key event to a command. `in_round` is true while the board is shown
/// (playing or paused), where Enter is the hard drop key rather than a UI key.
pub fn map_key(key: KeyEvent, in_round: bool) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    let command = match normalize_key(key.code) {
        KeyCode::Down => Command::Game(Action::SoftDrop),
        KeyCode::Left => Command::Game(Action::MoveLeft),
        KeyCode::Right => Command::Game(Action::MoveRight),
        KeyCode::Up => Command::Game(Action::Rotate),
        KeyCode::Enter if in_round => Command::Game(Action::HardDrop),
        KeyCode::Enter | KeyCode::Char(' ') if !in_round => Command::Confirm,
        KeyCode::Char('p') | KeyCode::Esc => Command::TogglePause,
        KeyCode::Char('m') => Command::ToggleSound,
        KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Buttons of the on-screen control strip under the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlButton {
    Left,
    Rotate,
    Down,
    Right,
    Drop,
}

impl ControlButton {
    pub fn all() -> &'static [ControlButton] {
        &[
            ControlButton::Left,
            ControlButton::Rotate,
            ControlButton::Down,
            ControlButton::Right,
            ControlButton::Drop,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ControlButton::Left => "◀",
            ControlButton::Rotate => "⟳",
            ControlButton::Down => "▼",
            ControlButton::Right => "▶",
            ControlButton::Drop => "⤓",
        }
    }

    pub fn action(&self) -> Action {
        match self {
            ControlButton::Left => Action::MoveLeft,
            ControlButton::Rotate => Action::Rotate,
            ControlButton::Down => Action::SoftDrop,
            ControlButton::Right => Action::MoveRight,
            ControlButton::Drop => Action::HardDrop,
        }
    }
}
