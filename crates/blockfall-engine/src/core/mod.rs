//! Spatial primitives: piece geometry, the board, and collision checks.
//!
//! - [`Piece`] / [`PieceKind`] - the shape catalog and falling piece values
//! - [`Board`] - fixed-size grid of locked cells with line queries
//! - collision and movement on [`Board`] and [`Piece`] (`can_place`,
//!   `try_move`, `try_rotate`, `find_hard_drop_position`, `should_lock`)

pub use self::{board::*, piece::*};

pub(crate) mod board;
mod movement;
pub(crate) mod piece;
