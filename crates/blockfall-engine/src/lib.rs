//! Falling-block puzzle engine.
//!
//! The [`core`] module holds the board, piece geometry, and collision rules.
//! The [`engine`] module builds the game on top of them: a pure reducer over
//! abstract actions, a frame-driven drop scheduler, and observer events.
//! Rendering and input belong to the caller.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
