use std::time::Duration;

use log::debug;

use super::{
    action::Action,
    config::{ConfigError, EngineConfig},
    event::GameEvent,
    scheduler::{DropScheduler, FrameToken},
    state::{GameSnapshot, GameState},
};

/// One game session: the state, its drop scheduler, and event diffing.
///
/// Front-ends feed user actions to [`GameSession::dispatch`] and call
/// [`GameSession::advance`] once per rendered frame with the real elapsed
/// time. Both paths go through the same validity check and reducer, and
/// both return the events observers should hear about.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{Action, EngineConfig, GameEvent, GameSession, PieceSeed};
///
/// let config = EngineConfig {
///     seed: Some(PieceSeed::from_u128(7)),
///     ..EngineConfig::default()
/// };
/// let mut session = GameSession::new(&config)?;
///
/// assert_eq!(session.dispatch(Action::StartGame), vec![GameEvent::Started]);
/// session.advance(Duration::from_secs(1));
/// assert_eq!(session.state().active_piece().unwrap().position().y(), 1);
/// # Ok::<(), blockfall_engine::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    state: GameState,
    scheduler: DropScheduler,
    pending_frame: Option<FrameToken>,
    frames: u64,
    play_time: Duration,
}

impl GameSession {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: GameState::from_config(config),
            scheduler: DropScheduler::new(config.timing),
            pending_frame: None,
            frames: 0,
            play_time: Duration::ZERO,
        })
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    #[must_use]
    pub fn scheduler(&self) -> &DropScheduler {
        &self.scheduler
    }

    /// Frames processed while the game was playing.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Time spent in the `playing` status since the last restart.
    #[must_use]
    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    /// Applies `action` if it is currently valid.
    ///
    /// Invalid actions are dropped before reaching the reducer and produce
    /// no events.
    pub fn dispatch(&mut self, action: Action) -> Vec<GameEvent> {
        if !self.state.is_action_valid(action) {
            debug!("skipping {action:?} while {}", self.state.status());
            return Vec::new();
        }

        let next = self.state.reduce(action);
        let events = GameEvent::diff(&self.state, &next);
        self.state = next;
        if events.contains(&GameEvent::Restarted) {
            self.frames = 0;
            self.play_time = Duration::ZERO;
        }

        self.scheduler.sync(self.state.status());
        self.pending_frame = self.scheduler.request_frame();
        events
    }

    /// Runs the frame callback scheduled by the previous call.
    ///
    /// Does nothing unless the game is playing.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        let Some(token) = self.pending_frame.take() else {
            return Vec::new();
        };
        self.frames += 1;
        self.play_time += elapsed;

        let action = self.scheduler.on_frame(token, &self.state, elapsed);
        self.pending_frame = self.scheduler.request_frame();
        match action {
            Some(action) => self.dispatch(action),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::{piece_queue::PieceSeed, state::GameResult};

    use super::*;

    fn session() -> GameSession {
        let config = EngineConfig {
            seed: Some(PieceSeed::from_u128(0xb10c)),
            ..EngineConfig::default()
        };
        GameSession::new(&config).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.board.width = 100;
        assert!(matches!(
            GameSession::new(&config),
            Err(ConfigError::BoardWidth { value: 100, .. })
        ));
    }

    #[test]
    fn test_no_frames_before_start() {
        let mut session = session();
        assert!(session.advance(Duration::from_secs(10)).is_empty());
        assert!(session.state().status().is_ready());
        assert_eq!(session.frames(), 0);
    }

    #[test]
    fn test_gravity_moves_piece() {
        let mut session = session();
        session.dispatch(Action::StartGame);
        let start_y = session.state().active_piece().unwrap().position().y();

        for _ in 0..3 {
            session.advance(Duration::from_millis(1000));
        }
        assert_eq!(
            session.state().active_piece().unwrap().position().y(),
            start_y + 3
        );
        assert_eq!(session.frames(), 3);
        assert_eq!(session.play_time(), Duration::from_secs(3));
    }

    #[test]
    fn test_pause_stops_gravity() {
        let mut session = session();
        session.dispatch(Action::StartGame);
        assert_eq!(session.dispatch(Action::PauseGame), vec![GameEvent::Paused]);
        assert!(!session.scheduler().is_running());

        let before = session.state().clone();
        assert!(session.advance(Duration::from_secs(5)).is_empty());
        assert_eq!(session.state(), &before);

        session.dispatch(Action::ResumeGame);
        assert!(session.scheduler().is_running());
        session.advance(Duration::from_millis(1000));
        assert_ne!(session.state(), &before);
    }

    #[test]
    fn test_invalid_dispatch_has_no_effect() {
        let mut session = session();
        let before = session.state().clone();
        assert!(session.dispatch(Action::HardDrop).is_empty());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_gravity_plays_until_game_over() {
        let mut session = session();
        session.dispatch(Action::StartGame);

        let mut result = None;
        for _ in 0..100_000 {
            for event in session.advance(Duration::from_millis(1000)) {
                if let GameEvent::GameOver(r) = event {
                    result = Some(r);
                }
            }
            if result.is_some() {
                break;
            }
        }
        let result: GameResult = result.unwrap();
        assert!(session.state().status().is_game_over());
        assert!(session.state().active_piece().is_none());
        assert_eq!(session.state().result(), Some(result));
        assert!(!session.scheduler().is_running());
        assert!(session.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_restart_while_ready_is_reported() {
        let mut session = session();
        let before = session.state().clone();
        assert_eq!(
            session.dispatch(Action::RestartGame),
            vec![GameEvent::Restarted]
        );
        assert!(session.state().status().is_ready());
        assert_ne!(session.state(), &before);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut session = session();
        session.dispatch(Action::StartGame);
        session.dispatch(Action::HardDrop);
        session.advance(Duration::from_millis(10));

        let events = session.dispatch(Action::RestartGame);
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert!(session.state().status().is_ready());
        assert_eq!(session.state().score(), 0);
        assert_eq!(session.frames(), 0);
        assert!(session.advance(Duration::from_secs(1)).is_empty());
    }
}
