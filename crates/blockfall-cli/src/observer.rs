//! Front-end listeners for engine events.

use std::collections::VecDeque;

use blockfall_engine::{GameEvent, GameState};
use chrono::{DateTime, Local};
use log::info;

/// Line of announcer text with the wall-clock time it was produced.
#[derive(Debug, Clone)]
pub struct Announcement {
    pub at: DateTime<Local>,
    pub text: String,
}

/// Turns game events into short messages and keeps the latest ones.
#[derive(Debug, Clone)]
pub struct Announcer {
    capacity: usize,
    messages: VecDeque<Announcement>,
}

impl Announcer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: VecDeque::with_capacity(capacity),
        }
    }

    pub fn messages(&self) -> &VecDeque<Announcement> {
        &self.messages
    }

    pub fn observe(&mut self, event: &GameEvent) {
        let Some(text) = describe(event) else {
            return;
        };
        info!("{text}");
        if self.capacity == 0 {
            return;
        }
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(Announcement {
            at: Local::now(),
            text,
        });
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Announcer text for `event`. Routine locks and holds are not announced.
pub fn describe(event: &GameEvent) -> Option<String> {
    let text = match event {
        GameEvent::Started => "Game start!".to_owned(),
        GameEvent::Paused => "Paused".to_owned(),
        GameEvent::Resumed => "Resumed".to_owned(),
        GameEvent::Restarted => "New game".to_owned(),
        GameEvent::Held | GameEvent::PieceLocked => return None,
        GameEvent::LinesCleared { count } => match count {
            1 => "Single".to_owned(),
            2 => "Double".to_owned(),
            3 => "Triple".to_owned(),
            4 => "TETRIS!".to_owned(),
            n => format!("{n} lines"),
        },
        GameEvent::LevelUp { level } => format!("Level {level}"),
        GameEvent::GameOver(result) => format!(
            "Game over: {} points, {} lines",
            result.score, result.lines_cleared
        ),
    };
    Some(text)
}

/// How close the stack is to the top of the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::IsVariant)]
pub enum StackAlert {
    #[default]
    Safe,
    Caution,
    Danger,
}

impl StackAlert {
    /// Caution from half the board height, danger from three quarters.
    pub fn from_state(state: &GameState) -> Self {
        let height = state.board().height();
        let top = state.column_heights().into_iter().min().unwrap_or(height);
        let stack = height - top;
        if stack * 4 >= height * 3 {
            Self::Danger
        } else if stack * 2 >= height {
            Self::Caution
        } else {
            Self::Safe
        }
    }
}

/// Keeps the stack alert current and logs when it changes.
#[derive(Debug, Default)]
pub struct StackWatcher {
    alert: StackAlert,
}

impl StackWatcher {
    pub fn alert(&self) -> StackAlert {
        self.alert
    }

    pub fn update(&mut self, state: &GameState) -> StackAlert {
        let alert = StackAlert::from_state(state);
        if alert != self.alert {
            info!("stack alert: {:?} -> {alert:?}", self.alert);
            self.alert = alert;
        }
        alert
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Action, GameResult, PieceSeed};

    use super::*;

    #[test]
    fn test_announcer_keeps_latest() {
        let mut announcer = Announcer::new(2);
        announcer.observe(&GameEvent::Started);
        announcer.observe(&GameEvent::PieceLocked);
        announcer.observe(&GameEvent::LinesCleared { count: 4 });
        announcer.observe(&GameEvent::LevelUp { level: 3 });

        let texts: Vec<_> = announcer.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["TETRIS!", "Level 3"]);

        announcer.clear();
        assert!(announcer.messages().is_empty());
    }

    #[test]
    fn test_describe_game_over() {
        let event = GameEvent::GameOver(GameResult {
            score: 1200,
            level: 2,
            lines_cleared: 11,
        });
        assert_eq!(
            describe(&event).as_deref(),
            Some("Game over: 1200 points, 11 lines")
        );
        assert_eq!(describe(&GameEvent::Held), None);
    }

    #[test]
    fn test_stack_alert_levels() {
        let mut state = GameState::with_seed(PieceSeed::from_u128(5)).reduce(Action::StartGame);
        assert_eq!(StackAlert::from_state(&state), StackAlert::Safe);

        let mut watcher = StackWatcher::default();
        let mut alerts = vec![];
        for _ in 0..200 {
            if !state.is_action_valid(Action::HardDrop) {
                break;
            }
            state = state.reduce(Action::HardDrop);
            alerts.push(watcher.update(&state));
        }
        assert!(state.status().is_game_over());
        assert!(alerts.contains(&StackAlert::Caution));
        assert_eq!(watcher.alert(), StackAlert::Danger);
    }
}
