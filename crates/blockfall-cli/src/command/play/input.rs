use blockfall_engine::{Action, GameStatus, RotationDirection};
use crossterm::event::KeyCode;

use crate::ui::widgets::KeyBinding;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Command {
    Dispatch(Action),
    ToggleGhost,
    Quit,
}

/// Maps a key to a command under the current status.
///
/// Keys that mean nothing in `status` map to `None`. Commands that do map
/// still go through the engine's validity check, so a rejected hold or a
/// move against the wall is a no-op rather than an error.
pub(super) fn command_for(code: KeyCode, status: GameStatus) -> Option<Command> {
    let action = match (code, status) {
        (KeyCode::Char('q') | KeyCode::Esc, _) => return Some(Command::Quit),
        (KeyCode::Char('g'), _) => return Some(Command::ToggleGhost),
        (KeyCode::Enter, GameStatus::Ready) => Action::StartGame,
        (KeyCode::Char('r'), _) => Action::RestartGame,
        (KeyCode::Char('p'), GameStatus::Playing) => Action::PauseGame,
        (KeyCode::Char('p'), GameStatus::Paused) => Action::ResumeGame,
        (code, GameStatus::Playing) => match code {
            KeyCode::Left => Action::MoveLeft,
            KeyCode::Right => Action::MoveRight,
            KeyCode::Down => Action::MoveDown,
            KeyCode::Up | KeyCode::Char('x') => Action::Rotate(RotationDirection::Clockwise),
            KeyCode::Char('z') => Action::Rotate(RotationDirection::CounterClockwise),
            KeyCode::Char(' ') => Action::HardDrop,
            KeyCode::Char('c') => Action::HoldPiece,
            _ => return None,
        },
        _ => return None,
    };
    Some(Command::Dispatch(action))
}

pub(super) fn key_bindings(status: GameStatus) -> &'static [KeyBinding<'static>] {
    match status {
        GameStatus::Ready => &[(&["Enter"], "Start"), (&["G"], "Ghost"), (&["Q"], "Quit")],
        GameStatus::Playing => &[
            (&["←", "→"], "Move"),
            (&["↓"], "Soft Drop"),
            (&["Space"], "Hard Drop"),
            (&["↑", "X"], "Rotate"),
            (&["Z"], "Rotate Left"),
            (&["C"], "Hold"),
            (&["P"], "Pause"),
            (&["R"], "Restart"),
            (&["Q"], "Quit"),
        ],
        GameStatus::Paused => &[(&["P"], "Resume"), (&["R"], "Restart"), (&["Q"], "Quit")],
        GameStatus::GameOver => &[(&["R"], "Restart"), (&["Q"], "Quit")],
    }
}
