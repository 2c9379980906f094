use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{Board, Piece, PieceKind};

use super::{
    action::Action,
    config::EngineConfig,
    piece_queue::{PieceQueue, PieceSeed},
    scoring::GameStats,
};

/// Number of upcoming pieces exposed by [`GameSnapshot`].
pub const NEXT_PREVIEW_LEN: usize = 5;

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    #[display("ready")]
    Ready,
    #[display("playing")]
    Playing,
    #[display("paused")]
    Paused,
    #[display("game over")]
    GameOver,
}

/// Final score, level, and line count handed to a high-score store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub score: u64,
    pub level: u32,
    pub lines_cleared: u32,
}

/// Authoritative state of one game session.
///
/// A `GameState` is only changed through [`GameState::reduce`], which returns
/// a new value. Holding on to an old state is always safe.
///
/// `last_action` and `clearing_lines` describe the most recent transition
/// for observers; the rules never read them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) active: Option<Piece>,
    pub(crate) queue: PieceQueue,
    pub(crate) held: Option<PieceKind>,
    pub(crate) hold_locked: bool,
    pub(crate) stats: GameStats,
    pub(crate) status: GameStatus,
    pub(crate) last_action: Option<Action>,
    pub(crate) clearing_lines: Vec<usize>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a `ready` state on a standard empty board with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_board(Board::standard(), rand::random())
    }

    /// Creates a `ready` state on a standard empty board.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_board(Board::standard(), seed)
    }

    /// Creates a `ready` state from a validated configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        let board = Board::new(config.board.width, config.board.height);
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_board(board, seed)
    }

    /// Creates a `ready` state on the given board.
    ///
    /// Mostly useful for tests and replays that start from a prepared stack.
    #[must_use]
    pub fn with_board(board: Board, seed: PieceSeed) -> Self {
        Self {
            board,
            active: None,
            queue: PieceQueue::with_seed(seed),
            held: None,
            hold_locked: false,
            stats: GameStats::new(),
            status: GameStatus::Ready,
            last_action: None,
            clearing_lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }

    /// Returns `true` when hold was already used for the current piece.
    #[must_use]
    pub fn is_hold_locked(&self) -> bool {
        self.hold_locked
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.stats.level()
    }

    #[must_use]
    pub fn lines_cleared(&self) -> u32 {
        self.stats.cleared_lines()
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    /// Rows marked full by the last lock and not yet compacted.
    #[must_use]
    pub fn clearing_lines(&self) -> &[usize] {
        &self.clearing_lines
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.clearing_lines.is_empty()
    }

    /// The next piece to spawn.
    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.queue.peek()
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.next_pieces()
    }

    /// Landing position of the active piece if it were hard dropped now.
    #[must_use]
    pub fn ghost_piece(&self) -> Option<Piece> {
        self.active
            .map(|piece| piece.find_hard_drop_position(&self.board))
    }

    #[must_use]
    pub fn column_heights(&self) -> Vec<usize> {
        self.board.column_heights()
    }

    /// The session-end payload, present only once the game is over.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.status.is_game_over().then(|| self.current_result())
    }

    /// Score, level, and lines at this point of the game.
    #[must_use]
    pub fn current_result(&self) -> GameResult {
        GameResult {
            score: self.stats.score(),
            level: self.stats.level(),
            lines_cleared: self.stats.cleared_lines(),
        }
    }

    /// Read-only copy of everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            active: self.active,
            ghost: self.ghost_piece(),
            next: self.next_pieces().take(NEXT_PREVIEW_LEN).collect(),
            held: self.held,
            score: self.score(),
            level: self.level(),
            lines_cleared: self.lines_cleared(),
            status: self.status,
            clearing_lines: self.clearing_lines.clone(),
            last_action: self.last_action,
        }
    }
}

/// Immutable view of a [`GameState`] for renderers and observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub active: Option<Piece>,
    pub ghost: Option<Piece>,
    pub next: ArrayVec<PieceKind, NEXT_PREVIEW_LEN>,
    pub held: Option<PieceKind>,
    pub score: u64,
    pub level: u32,
    pub lines_cleared: u32,
    pub status: GameStatus,
    pub clearing_lines: Vec<usize>,
    pub last_action: Option<Action>,
}
