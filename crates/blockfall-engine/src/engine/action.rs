use serde::{Deserialize, Serialize};

use crate::core::RotationDirection;

/// Abstract game command accepted by the reducer.
///
/// Front-ends translate raw input into these values; the drop scheduler
/// produces the same values on a timer. Serialized with the upper snake case
/// tag names (`"MOVE_LEFT"`, `{"CLEAR_LINES": 2}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    StartGame,
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate(RotationDirection),
    HardDrop,
    HoldPiece,
    PauseGame,
    ResumeGame,
    RestartGame,
    LockPiece,
    SpawnPiece,
    GameTick,
    /// Compacts the rows marked by the last lock; carries their count.
    ClearLines(usize),
}
