use serde::Serialize;

use super::state::{GameResult, GameState, GameStatus};

/// Notable change between two consecutive states.
///
/// Events are derived after the fact by [`GameEvent::diff`]; the reducer
/// itself never emits anything. Audio, announcer, and high-score layers
/// subscribe to these instead of inspecting states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Restarted,
    Held,
    PieceLocked,
    LinesCleared { count: u32 },
    LevelUp { level: u32 },
    GameOver(GameResult),
}

impl GameEvent {
    /// Compares `prev` and `next` and lists what happened in between.
    ///
    /// Events are ordered roughly as they occur within one transition: a
    /// lock comes before the lines it cleared, which come before a level-up.
    #[must_use]
    pub fn diff(prev: &GameState, next: &GameState) -> Vec<Self> {
        let mut events = Vec::new();
        let (from, to) = (prev.status(), next.status());

        // Only a restart leads into `ready`, and from `ready` it is the only
        // transition that changes anything
        if to.is_ready() && (!from.is_ready() || prev != next) {
            events.push(Self::Restarted);
            return events;
        }
        match (from, to) {
            (GameStatus::Ready, GameStatus::Playing | GameStatus::GameOver) => {
                events.push(Self::Started);
            }
            (GameStatus::Playing, GameStatus::Paused) => events.push(Self::Paused),
            (GameStatus::Paused, GameStatus::Playing) => events.push(Self::Resumed),
            _ => {}
        }

        if next.is_hold_locked() && !prev.is_hold_locked() {
            events.push(Self::Held);
        }

        let (before, after) = (prev.stats(), next.stats());
        if after.completed_pieces() > before.completed_pieces() {
            events.push(Self::PieceLocked);
        }
        if after.cleared_lines() > before.cleared_lines() {
            events.push(Self::LinesCleared {
                count: after.cleared_lines() - before.cleared_lines(),
            });
        }
        if after.level() > before.level() {
            events.push(Self::LevelUp {
                level: after.level(),
            });
        }

        if to.is_game_over() && !from.is_game_over() {
            events.push(Self::GameOver(next.current_result()));
        }
        events
    }
}
