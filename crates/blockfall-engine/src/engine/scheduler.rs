use std::time::Duration;

use log::trace;

use super::{
    action::Action,
    config::TimingConfig,
    state::{GameState, GameStatus},
};

/// Handle for one scheduled frame callback.
///
/// Tokens are tied to the scheduler generation they were issued in. Stopping
/// or restarting the scheduler starts a new generation, and frames carrying
/// an older token are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken {
    generation: u64,
}

/// Time-driven source of automatic actions.
///
/// The scheduler accumulates the real elapsed time of each frame. Once the
/// accumulated time reaches the drop interval for the current level it emits
/// a single action and resets the accumulator:
///
/// - [`Action::SpawnPiece`] when there is no active piece
/// - [`Action::LockPiece`] when the active piece rests on the stack
/// - [`Action::MoveDown`] otherwise
///
/// While locked rows are waiting to be compacted, it emits
/// [`Action::ClearLines`] after the configured line-clear delay instead.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{Action, DropScheduler, GameState, PieceSeed, TimingConfig};
///
/// let state = GameState::with_seed(PieceSeed::from_u128(1)).reduce(Action::StartGame);
/// let mut scheduler = DropScheduler::new(TimingConfig::default());
/// scheduler.sync(state.status());
///
/// let token = scheduler.request_frame().unwrap();
/// assert_eq!(scheduler.on_frame(token, &state, Duration::from_millis(500)), None);
/// let token = scheduler.request_frame().unwrap();
/// assert_eq!(
///     scheduler.on_frame(token, &state, Duration::from_millis(500)),
///     Some(Action::MoveDown)
/// );
/// ```
#[derive(Debug, Clone)]
pub struct DropScheduler {
    timing: TimingConfig,
    running: bool,
    generation: u64,
    drop_elapsed: Duration,
    clear_elapsed: Duration,
}

impl DropScheduler {
    #[must_use]
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            running: false,
            generation: 0,
            drop_elapsed: Duration::ZERO,
            clear_elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.generation += 1;
        self.drop_elapsed = Duration::ZERO;
        self.clear_elapsed = Duration::ZERO;
        trace!("scheduler started (generation {})", self.generation);
    }

    /// Stops the scheduler and invalidates every outstanding [`FrameToken`].
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.generation += 1;
        trace!("scheduler stopped (generation {})", self.generation);
    }

    /// Runs exactly while the game is `playing`.
    pub fn sync(&mut self, status: GameStatus) {
        if status.is_playing() {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Schedules the next frame callback, or `None` when stopped.
    #[must_use]
    pub fn request_frame(&self) -> Option<FrameToken> {
        self.running.then_some(FrameToken {
            generation: self.generation,
        })
    }

    /// Frame callback: accounts `elapsed` and returns the action due, if any.
    ///
    /// Returns `None` without touching the accumulators when the scheduler
    /// is stopped or `token` was issued before the last stop.
    pub fn on_frame(
        &mut self,
        token: FrameToken,
        state: &GameState,
        elapsed: Duration,
    ) -> Option<Action> {
        if !self.running || token.generation != self.generation {
            trace!("dropping stale frame (generation {})", token.generation);
            return None;
        }
        if !state.status().is_playing() {
            return None;
        }

        let board = state.board();
        let Some(piece) = state.active_piece() else {
            let full_lines = board.find_full_lines().len();
            if full_lines > 0 {
                self.clear_elapsed += elapsed;
                if self.clear_elapsed < self.timing.line_clear_delay() {
                    return None;
                }
                self.clear_elapsed = Duration::ZERO;
                trace!("dispatching line clear of {full_lines} rows");
                return Some(Action::ClearLines(full_lines));
            }
            return self.accumulate_drop(state.level(), elapsed, Action::SpawnPiece);
        };

        let action = if piece.should_lock(board) {
            Action::LockPiece
        } else {
            Action::MoveDown
        };
        self.accumulate_drop(state.level(), elapsed, action)
    }

    fn accumulate_drop(&mut self, level: u32, elapsed: Duration, action: Action) -> Option<Action> {
        self.drop_elapsed += elapsed;
        if self.drop_elapsed < self.timing.drop_interval(level) {
            return None;
        }
        self.drop_elapsed = Duration::ZERO;
        trace!("dispatching {action:?} at level {level}");
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        core::{Board, Cell, PieceKind},
        engine::piece_queue::PieceSeed,
    };

    use super::*;

    fn started() -> (GameState, DropScheduler) {
        let state = GameState::with_seed(PieceSeed::from_u128(11)).reduce(Action::StartGame);
        let mut scheduler = DropScheduler::new(TimingConfig::default());
        scheduler.sync(state.status());
        (state, scheduler)
    }

    fn frame(scheduler: &mut DropScheduler, state: &GameState, millis: u64) -> Option<Action> {
        let token = scheduler.request_frame()?;
        scheduler.on_frame(token, state, Duration::from_millis(millis))
    }

    #[test]
    fn test_accumulates_elapsed_time() {
        let (state, mut scheduler) = started();
        for _ in 0..9 {
            assert_eq!(frame(&mut scheduler, &state, 100), None);
        }
        assert_eq!(frame(&mut scheduler, &state, 100), Some(Action::MoveDown));
        // Accumulator was reset
        assert_eq!(frame(&mut scheduler, &state, 999), None);
    }

    #[test]
    fn test_late_frame_fires_once() {
        let (state, mut scheduler) = started();
        assert_eq!(frame(&mut scheduler, &state, 5000), Some(Action::MoveDown));
        assert_eq!(frame(&mut scheduler, &state, 1), None);
    }

    #[test]
    fn test_locks_resting_piece() {
        let (state, mut scheduler) = started();
        let mut state = state;
        while state.is_action_valid(Action::MoveDown) {
            let next = state.reduce(Action::MoveDown);
            if next == state {
                break;
            }
            state = next;
        }
        assert!(state.active_piece().unwrap().should_lock(state.board()));
        assert_eq!(frame(&mut scheduler, &state, 1000), Some(Action::LockPiece));
    }

    #[test]
    fn test_spawns_when_no_active_piece() {
        let (mut state, mut scheduler) = started();
        state.active = None;
        assert_eq!(frame(&mut scheduler, &state, 1000), Some(Action::SpawnPiece));
    }

    #[test]
    fn test_clears_lines_after_delay() {
        let (mut state, mut scheduler) = started();
        let mut board = Board::standard();
        for x in 0..10 {
            board.set_cell(x, 19, Cell::Filled(PieceKind::S));
            board.set_cell(x, 18, Cell::Filled(PieceKind::S));
        }
        state.board = board;
        state.active = None;

        assert_eq!(frame(&mut scheduler, &state, 200), None);
        assert_eq!(frame(&mut scheduler, &state, 100), Some(Action::ClearLines(2)));
        assert!(state.is_action_valid(Action::ClearLines(2)));
    }

    #[test]
    fn test_drop_interval_follows_level() {
        let (mut state, mut scheduler) = started();
        for _ in 0..30 {
            state.stats.complete_piece_drop(1);
        }
        assert_eq!(state.level(), 4);
        assert_eq!(frame(&mut scheduler, &state, 699), None);
        assert_eq!(frame(&mut scheduler, &state, 1), Some(Action::MoveDown));
    }

    #[test]
    fn test_stale_token_is_rejected() {
        let (state, mut scheduler) = started();
        let token = scheduler.request_frame().unwrap();

        let paused = state.reduce(Action::PauseGame);
        scheduler.sync(paused.status());
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.request_frame(), None);
        assert_eq!(scheduler.on_frame(token, &state, Duration::from_millis(5000)), None);

        // Still stale after resuming
        let resumed = paused.reduce(Action::ResumeGame);
        scheduler.sync(resumed.status());
        assert_eq!(scheduler.on_frame(token, &resumed, Duration::from_millis(5000)), None);
        assert_eq!(frame(&mut scheduler, &resumed, 1000), Some(Action::MoveDown));
    }

    #[test]
    fn test_restart_stops_scheduler() {
        let (state, mut scheduler) = started();
        let token = scheduler.request_frame().unwrap();
        let restarted = state.reduce(Action::RestartGame);
        scheduler.sync(restarted.status());

        assert!(!scheduler.is_running());
        assert_eq!(scheduler.on_frame(token, &state, Duration::from_millis(5000)), None);
    }
}
