//! The state machine: a validity predicate and a pure transition function.
//!
//! | action          | source status            | effect                              |
//! |-----------------|--------------------------|-------------------------------------|
//! | `StartGame`     | ready                    | playing, first piece spawned        |
//! | `PauseGame`     | playing                  | paused                              |
//! | `ResumeGame`    | paused                   | playing                             |
//! | `RestartGame`   | any                      | fresh ready state                   |
//! | moves, rotation | playing, piece present   | piece replaced if it fits           |
//! | `HardDrop`      | playing, piece present   | dropped, scored and locked          |
//! | `HoldPiece`     | playing, hold available  | active and held pieces swapped      |
//! | `LockPiece`     | playing, piece present   | written to board, full rows marked  |
//! | `SpawnPiece`    | playing, nothing pending | next piece, or game over            |
//! | `ClearLines(n)` | playing, `n` rows full   | rows compacted, next piece spawned  |
//! | `GameTick`      | any                      | nothing                             |

use log::{debug, info, warn};

use crate::core::{Board, Piece};

use super::{
    action::Action,
    scoring::DropKind,
    state::{GameState, GameStatus},
};

/// Returns `true` if `action` has an effect defined for the current state.
///
/// Callers consult this before dispatching. A valid movement may still be
/// rejected by collision, which leaves the state unchanged.
#[must_use]
pub fn is_action_valid(state: &GameState, action: Action) -> bool {
    state.is_action_valid(action)
}

/// Applies `action` to `state` and returns the resulting state.
///
/// Never fails: invalid actions and blocked movements return an unchanged
/// copy of `state`.
#[must_use]
pub fn reduce(state: &GameState, action: Action) -> GameState {
    state.reduce(action)
}

impl GameState {
    #[must_use]
    pub fn is_action_valid(&self, action: Action) -> bool {
        let playing = self.status.is_playing();
        let has_piece = self.active.is_some();
        match action {
            Action::StartGame => self.status.is_ready(),
            Action::PauseGame => playing,
            Action::ResumeGame => self.status.is_paused(),
            Action::RestartGame | Action::GameTick => true,
            Action::MoveLeft
            | Action::MoveRight
            | Action::MoveDown
            | Action::Rotate(_)
            | Action::HardDrop
            | Action::LockPiece => playing && has_piece,
            Action::HoldPiece => playing && has_piece && !self.hold_locked,
            Action::SpawnPiece => {
                playing && !has_piece && self.board.find_full_lines().is_empty()
            }
            Action::ClearLines(count) => {
                playing && !has_piece && count > 0 && self.board.find_full_lines().len() == count
            }
        }
    }

    /// See [`reduce`].
    #[must_use]
    pub fn reduce(&self, action: Action) -> Self {
        if !self.is_action_valid(action) {
            warn!("ignoring {action:?} while {}", self.status);
            return self.clone();
        }

        let next = match action {
            Action::StartGame => Some(self.start()),
            Action::PauseGame => Some(self.with_status(GameStatus::Paused)),
            Action::ResumeGame => Some(self.with_status(GameStatus::Playing)),
            Action::RestartGame => return self.restart(),
            Action::MoveLeft => self.move_active(-1, 0),
            Action::MoveRight => self.move_active(1, 0),
            Action::MoveDown => self.move_active(0, 1).map(|mut next| {
                next.stats.add_drop(1, DropKind::Soft);
                next
            }),
            Action::Rotate(direction) => self.replace_active(|piece, board| {
                piece.try_rotate(board, direction)
            }),
            Action::HardDrop => Some(self.hard_drop()),
            Action::HoldPiece => self.hold(),
            Action::LockPiece => {
                let mut next = self.clone();
                next.lock_active();
                Some(next)
            }
            Action::SpawnPiece => {
                let mut next = self.clone();
                next.spawn_next();
                Some(next)
            }
            Action::ClearLines(_) => Some(self.compact_lines()),
            Action::GameTick => None,
        };

        match next {
            Some(mut next) => {
                next.last_action = Some(action);
                next
            }
            None => self.clone(),
        }
    }

    fn with_status(&self, status: GameStatus) -> Self {
        info!("game {status}");
        Self {
            status,
            ..self.clone()
        }
    }

    fn start(&self) -> Self {
        info!(
            "starting game on {}x{} board",
            self.board.width(),
            self.board.height()
        );
        let mut next = self.clone();
        next.status = GameStatus::Playing;
        next.spawn_next();
        next
    }

    /// Replaces the whole state, keeping only the board dimensions.
    fn restart(&self) -> Self {
        let seed = self.queue.derive_seed();
        info!("restarting game (previous score {})", self.stats.score());
        let board = Board::new(self.board.width(), self.board.height());
        Self::with_board(board, seed)
    }

    fn replace_active<F>(&self, f: F) -> Option<Self>
    where
        F: FnOnce(&Piece, &Board) -> Option<Piece>,
    {
        let piece = f(self.active.as_ref()?, &self.board)?;
        Some(Self {
            active: Some(piece),
            ..self.clone()
        })
    }

    fn move_active(&self, dx: i16, dy: i16) -> Option<Self> {
        self.replace_active(|piece, board| piece.try_move(board, dx, dy))
    }

    fn hard_drop(&self) -> Self {
        let mut next = self.clone();
        if let Some(piece) = next.active {
            let dropped = piece.find_hard_drop_position(&next.board);
            let distance = dropped.position().y() - piece.position().y();
            next.stats
                .add_drop(u32::try_from(distance).unwrap_or(0), DropKind::Hard);
            next.active = Some(dropped);
        }
        next.lock_active();
        next
    }

    fn hold(&self) -> Option<Self> {
        let current = self.active?;
        let incoming = self.held.unwrap_or_else(|| self.queue.peek());
        let piece = Piece::spawn(incoming, self.board.width());
        if !self.board.can_place(&piece) {
            debug!("hold rejected: {incoming} does not fit at spawn");
            return None;
        }

        let mut next = self.clone();
        if next.held.is_none() {
            next.queue.pop_next();
        }
        next.held = Some(current.kind());
        next.active = Some(piece);
        next.hold_locked = true;
        debug!("held {}, playing {incoming}", current.kind());
        Some(next)
    }

    /// Writes the active piece into the board and scores any full rows.
    ///
    /// Full rows stay on the board and are listed in `clearing_lines` until
    /// a `ClearLines` action compacts them. Without full rows the next piece
    /// spawns immediately.
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.board = self.board.lock_piece(&piece);
        self.hold_locked = false;

        let full_lines = self.board.find_full_lines();
        let prev_level = self.stats.level();
        let points = self.stats.complete_piece_drop(full_lines.len());
        debug!(
            "locked {} at {:?}, {} full lines, +{points}",
            piece.kind(),
            piece.position(),
            full_lines.len()
        );
        if self.stats.level() > prev_level {
            info!("level up: {}", self.stats.level());
        }

        if full_lines.is_empty() {
            self.spawn_next();
        } else {
            self.clearing_lines = full_lines;
        }
    }

    fn compact_lines(&self) -> Self {
        let mut next = self.clone();
        let full_lines = next.board.find_full_lines();
        next.board = next.board.clear_lines(&full_lines);
        debug!("cleared rows {full_lines:?}");
        next.spawn_next();
        next
    }

    /// Draws the next piece; ends the game if it cannot be placed.
    fn spawn_next(&mut self) {
        self.clearing_lines.clear();
        self.hold_locked = false;

        let kind = self.queue.pop_next();
        let piece = Piece::spawn(kind, self.board.width());
        if self.board.can_place(&piece) {
            debug!("spawned {kind}");
            self.active = Some(piece);
        } else {
            self.active = None;
            self.status = GameStatus::GameOver;
            info!(
                "game over: score {}, level {}, lines {}",
                self.stats.score(),
                self.stats.level(),
                self.stats.cleared_lines()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        core::{Cell, PieceKind, PiecePosition, PieceRotation, RotationDirection},
        engine::{piece_queue::PieceSeed, state::GameResult},
    };

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_u128(0x5eed);

    fn playing(board: Board, active: Option<Piece>) -> GameState {
        let mut state = GameState::with_board(board, SEED);
        state.status = GameStatus::Playing;
        state.active = active;
        state
    }

    fn fill_row(board: &mut Board, y: usize, except: &[usize]) {
        for x in 0..board.width() {
            if !except.contains(&x) {
                board.set_cell(x, y, Cell::Filled(PieceKind::Z));
            }
        }
    }

    fn vertical_i(x: i16, y: i16) -> Piece {
        // Rotation 1 occupies matrix column 2
        Piece::new(PieceKind::I, PieceRotation::new(1), PiecePosition::new(x - 2, y))
    }

    #[test]
    fn test_start_game_spawns_first_piece() {
        let state = GameState::with_seed(SEED);
        let first = state.next_piece();
        let state = state.reduce(Action::StartGame);

        assert!(state.status().is_playing());
        let piece = state.active_piece().unwrap();
        assert_eq!(piece.kind(), first);
        assert_eq!(piece.position(), PiecePosition::new(3, 0));
        assert_eq!(state.last_action(), Some(Action::StartGame));
        assert!(!state.is_action_valid(Action::StartGame));
    }

    #[test]
    fn test_invalid_actions_are_no_ops() {
        let ready = GameState::with_seed(SEED);
        for action in [
            Action::MoveLeft,
            Action::MoveDown,
            Action::HardDrop,
            Action::HoldPiece,
            Action::PauseGame,
            Action::ResumeGame,
            Action::LockPiece,
            Action::SpawnPiece,
            Action::ClearLines(1),
            Action::GameTick,
        ] {
            assert_eq!(ready.reduce(action), ready, "{action:?}");
        }
    }

    #[test]
    fn test_pause_and_resume() {
        let state = GameState::with_seed(SEED).reduce(Action::StartGame);
        let paused = state.reduce(Action::PauseGame);
        assert!(paused.status().is_paused());

        // Nothing moves while paused
        for action in [
            Action::MoveLeft,
            Action::HardDrop,
            Action::PauseGame,
            Action::SpawnPiece,
        ] {
            assert!(!paused.is_action_valid(action));
            assert_eq!(paused.reduce(action), paused);
        }

        let resumed = paused.reduce(Action::ResumeGame);
        assert!(resumed.status().is_playing());
        assert_eq!(resumed.active_piece(), state.active_piece());
        assert_eq!(resumed.reduce(Action::ResumeGame), resumed);
    }

    #[test]
    fn test_game_tick_never_changes_state() {
        let ready = GameState::with_seed(SEED);
        assert_eq!(ready.reduce(Action::GameTick), ready);
        let state = ready.reduce(Action::StartGame);
        assert_eq!(state.reduce(Action::GameTick), state);
    }

    #[test]
    fn test_moves_and_soft_drop_scoring() {
        let piece = Piece::spawn(PieceKind::O, 10);
        let state = playing(Board::standard(), Some(piece));

        let left = state.reduce(Action::MoveLeft);
        assert_eq!(left.active_piece().unwrap().position().x(), 2);
        assert_eq!(left.score(), 0);

        let down = state.reduce(Action::MoveDown);
        assert_eq!(down.active_piece().unwrap().position().y(), 1);
        assert_eq!(down.score(), 1);
    }

    #[test]
    fn test_blocked_move_is_silent() {
        let piece = Piece::new(
            PieceKind::O,
            PieceRotation::default(),
            PiecePosition::new(0, 18),
        );
        let state = playing(Board::standard(), Some(piece));

        assert_eq!(state.reduce(Action::MoveLeft), state);
        // No points for a blocked soft drop
        assert_eq!(state.reduce(Action::MoveDown), state);
        assert_eq!(state.reduce(Action::MoveDown).score(), 0);
    }

    #[test]
    fn test_rotate_in_place() {
        let piece = Piece::spawn(PieceKind::T, 10).translated(0, 5);
        let state = playing(Board::standard(), Some(piece));

        let rotated = state.reduce(Action::Rotate(RotationDirection::Clockwise));
        let active = rotated.active_piece().unwrap();
        assert_eq!(active.rotation(), PieceRotation::new(1));
        assert_eq!(active.position(), piece.position());

        let back = rotated.reduce(Action::Rotate(RotationDirection::CounterClockwise));
        assert_eq!(back.active_piece(), Some(&piece));
    }

    #[test]
    fn test_single_line_clear() {
        let mut board = Board::standard();
        fill_row(&mut board, 19, &[5]);
        let state = playing(board, Some(vertical_i(5, 16)));
        assert_eq!(state.level(), 1);

        let locked = state.reduce(Action::LockPiece);
        assert_eq!(locked.score(), 100);
        assert_eq!(locked.lines_cleared(), 1);
        assert_eq!(locked.level(), 1);
        assert!(locked.active_piece().is_none());
        assert_eq!(locked.clearing_lines(), &[19]);
        assert!(locked.is_animating());
        assert!(!locked.is_action_valid(Action::SpawnPiece));
        assert!(!locked.is_action_valid(Action::ClearLines(2)));

        let cleared = locked.reduce(Action::ClearLines(1));
        let board = cleared.board();
        assert_eq!(board.height(), 20);
        assert!(board.rows().next().unwrap().iter().all(|c| c.is_empty()));
        // The rest of the I fell by one row
        assert_eq!(board.cell(5, 19), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.cell(5, 16), Some(Cell::Empty));
        assert_eq!(board.cell(0, 19), Some(Cell::Empty));
        assert!(cleared.clearing_lines().is_empty());
        assert!(cleared.active_piece().is_some());
        assert_eq!(cleared.score(), 100);
    }

    #[test]
    fn test_tetris_at_level_two() {
        let mut board = Board::standard();
        for y in 16..20 {
            fill_row(&mut board, y, &[0]);
        }
        let mut state = playing(board, Some(vertical_i(0, 16)));
        for _ in 0..10 {
            state.stats.complete_piece_drop(1);
        }
        assert_eq!(state.level(), 2);
        let before = state.score();

        let locked = state.reduce(Action::LockPiece);
        assert_eq!(locked.score() - before, 1600);
        assert_eq!(locked.clearing_lines(), &[16, 17, 18, 19]);
        assert_eq!(locked.stats().line_cleared_counter()[4], 1);

        let cleared = locked.reduce(Action::ClearLines(4));
        assert_eq!(cleared.board(), &Board::standard());
    }

    #[test]
    fn test_hard_drop_scores_distance_and_locks() {
        let piece = Piece::spawn(PieceKind::O, 10);
        let state = playing(Board::standard(), Some(piece));
        let next_kind = state.next_piece();

        let dropped = state.reduce(Action::HardDrop);
        // O occupies matrix rows 0..2: drops from y = 0 to y = 18
        assert_eq!(dropped.score(), 36);
        assert_eq!(dropped.board().cell(4, 19), Some(Cell::Filled(PieceKind::O)));
        assert_eq!(dropped.stats().completed_pieces(), 1);
        assert_eq!(dropped.active_piece().unwrap().kind(), next_kind);
        assert_eq!(dropped.last_action(), Some(Action::HardDrop));
    }

    #[test]
    fn test_game_over_on_spawn() {
        let mut board = Board::standard();
        for y in 0..20 {
            fill_row(&mut board, y, &[9]);
        }
        let state = playing(board, None);
        assert!(state.is_action_valid(Action::SpawnPiece));

        let over = state.reduce(Action::SpawnPiece);
        assert!(over.status().is_game_over());
        assert!(over.active_piece().is_none());
        assert_eq!(
            over.result(),
            Some(GameResult {
                score: 0,
                level: 1,
                lines_cleared: 0
            })
        );
        assert!(!over.is_action_valid(Action::SpawnPiece));
        assert!(over.is_action_valid(Action::RestartGame));
    }

    #[test]
    fn test_game_over_after_lock() {
        let mut board = Board::standard();
        for y in 1..20 {
            fill_row(&mut board, y, &[0]);
        }
        let piece = Piece::new(
            PieceKind::O,
            PieceRotation::default(),
            PiecePosition::new(3, -2),
        );
        let state = playing(board, Some(piece));

        let over = state.reduce(Action::LockPiece);
        assert!(over.status().is_game_over());
        assert!(over.active_piece().is_none());
    }

    #[test]
    fn test_game_over_after_line_clear() {
        let mut board = Board::standard();
        for y in 0..19 {
            fill_row(&mut board, y, &[0, 9]);
        }
        fill_row(&mut board, 19, &[0]);
        let state = playing(board, Some(vertical_i(0, 16)));

        let locked = state.reduce(Action::LockPiece);
        assert!(locked.status().is_playing());
        assert!(locked.active_piece().is_none());
        assert_eq!(locked.clearing_lines(), &[19]);

        // The stack shifts down one row and still covers the spawn rows
        let cleared = locked.reduce(Action::ClearLines(1));
        assert!(cleared.status().is_game_over());
        assert!(cleared.active_piece().is_none());
        assert!(cleared.clearing_lines().is_empty());
        assert_eq!(cleared.lines_cleared(), 1);
        assert_eq!(cleared.result().map(|result| result.lines_cleared), Some(1));
    }

    #[test]
    fn test_hold_lock() {
        let state = GameState::with_seed(SEED).reduce(Action::StartGame);
        let current = state.active_piece().unwrap().kind();
        let incoming = state.next_piece();

        let held = state.reduce(Action::HoldPiece);
        assert_eq!(held.held_piece(), Some(current));
        assert_eq!(held.active_piece().unwrap().kind(), incoming);
        assert!(held.is_hold_locked());

        let again = held.reduce(Action::HoldPiece);
        assert_eq!(again, held);

        // Locking releases the hold
        let locked = held.reduce(Action::HardDrop);
        assert!(!locked.is_hold_locked());
        let swapped = locked.reduce(Action::HoldPiece);
        assert_eq!(
            swapped.active_piece().unwrap().kind(),
            current,
            "held piece comes back"
        );
    }

    #[test]
    fn test_hold_rejected_when_incoming_does_not_fit() {
        let mut board = Board::standard();
        board.set_cell(4, 1, Cell::Filled(PieceKind::L));
        board.set_cell(5, 1, Cell::Filled(PieceKind::L));
        let active = Piece::spawn(PieceKind::T, 10).translated(-3, 5);
        let mut state = playing(board, Some(active));
        state.held = Some(PieceKind::O);

        assert!(state.is_action_valid(Action::HoldPiece));
        assert_eq!(state.reduce(Action::HoldPiece), state);
    }

    #[test]
    fn test_restart_equals_fresh_state() {
        let mut state = GameState::with_board(Board::new(8, 16), SEED).reduce(Action::StartGame);
        state = state.reduce(Action::HoldPiece);
        for _ in 0..5 {
            state = state.reduce(Action::HardDrop);
        }
        assert!(state.score() > 0);

        let seed = state.queue.derive_seed();
        let restarted = state.reduce(Action::RestartGame);
        assert_eq!(restarted, GameState::with_board(Board::new(8, 16), seed));
        assert_eq!(restarted.score(), 0);
        assert_eq!(restarted.level(), 1);
        assert_eq!(restarted.lines_cleared(), 0);
    }
}
