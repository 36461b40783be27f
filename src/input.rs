//! Key mapping from terminal events to game commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use blockfall_types::Command;

/// Map a key press to a game command.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }

    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(Command::SoftDrop),

        // Rotation
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('x') => {
            Some(Command::RotateCw)
        }
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Command::RotateCcw),

        // Actions
        KeyCode::Char(' ') => Some(Command::HardDrop),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Hold),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Pause),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),

        _ => None,
    }
}
