//! Game rules and session driving built on the [`core`](crate::core) types.
//!
//! - [`GameState`] - Authoritative state of one game (board, active piece,
//!   queue, hold, statistics, status)
//! - [`reduce`] / [`is_action_valid`] - The state machine over [`Action`]s
//! - [`DropScheduler`] - Turns elapsed frame time into gravity actions
//! - [`GameEvent`] - Observer events derived from two consecutive states
//! - [`GameSession`] - Ties the above together for a front-end
//! - [`PieceQueue`] - 7-bag piece generation
//! - [`GameStats`] - Score, level, and line statistics
//! - [`EngineConfig`] - Board size, timing curve, and seed
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] (or a bare [`GameState`]) in `ready` status
//! 2. Dispatch [`Action::StartGame`] to spawn the first piece
//! 3. Dispatch player actions; call [`GameSession::advance`] every frame
//! 4. Locked pieces with full rows are compacted by a follow-up
//!    [`Action::ClearLines`]
//! 5. The game ends when a new piece cannot be placed at the spawn position
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Action, GameState, PieceSeed, reduce};
//!
//! let state = GameState::with_seed(PieceSeed::from_u128(42));
//! let state = reduce(&state, Action::StartGame);
//! let state = reduce(&state, Action::HardDrop);
//!
//! assert_eq!(state.stats().completed_pieces(), 1);
//! assert!(state.score() > 0);
//! ```

pub use self::{
    action::*, config::*, event::*, piece_queue::*, reducer::*, scheduler::*, scoring::*,
    session::*, state::*,
};

mod action;
mod config;
mod event;
mod piece_queue;
mod reducer;
mod scheduler;
mod scoring;
mod session;
mod state;
