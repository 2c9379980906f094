use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{core::Board, engine::piece_queue::PieceSeed};

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board width must be between {min} and {max}, got {value}")]
    BoardWidth { value: usize, min: usize, max: usize },
    #[display("board height must be between {min} and {max}, got {value}")]
    BoardHeight { value: usize, min: usize, max: usize },
    #[display("minimum drop interval must be greater than zero")]
    ZeroMinDropInterval,
}

/// Engine settings: board size, timing curve, and piece queue seed.
///
/// Every field has a default, so a partial JSON document such as
/// `{"board": {"height": 24}}` is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board: BoardConfig,
    pub timing: TimingConfig,
    /// Seed for the piece queue. A random seed is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<PieceSeed>,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()?;
        self.timing.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

impl BoardConfig {
    pub const MIN_WIDTH: usize = 4;
    pub const MAX_WIDTH: usize = 64;
    pub const MIN_HEIGHT: usize = 4;
    pub const MAX_HEIGHT: usize = 256;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_WIDTH..=Self::MAX_WIDTH).contains(&self.width) {
            return Err(ConfigError::BoardWidth {
                value: self.width,
                min: Self::MIN_WIDTH,
                max: Self::MAX_WIDTH,
            });
        }
        if !(Self::MIN_HEIGHT..=Self::MAX_HEIGHT).contains(&self.height) {
            return Err(ConfigError::BoardHeight {
                value: self.height,
                min: Self::MIN_HEIGHT,
                max: Self::MAX_HEIGHT,
            });
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: Board::STANDARD_WIDTH,
            height: Board::STANDARD_HEIGHT,
        }
    }
}

/// Drop speed curve and line-clear pacing, in milliseconds.
///
/// The drop interval at level `n` is
/// `max(base - step * (n - 1), min)`, which never increases with the level
/// and never falls below `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub base_drop_interval_ms: u64,
    pub drop_interval_step_ms: u64,
    pub min_drop_interval_ms: u64,
    /// Pause between marking full rows and compacting them.
    pub line_clear_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_drop_interval_ms: 1000,
            drop_interval_step_ms: 100,
            min_drop_interval_ms: 50,
            line_clear_delay_ms: 300,
        }
    }
}

impl TimingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_drop_interval_ms == 0 {
            return Err(ConfigError::ZeroMinDropInterval);
        }
        Ok(())
    }

    /// Time between automatic downward steps at `level`.
    #[must_use]
    pub fn drop_interval(&self, level: u32) -> Duration {
        let steps = u64::from(level.saturating_sub(1));
        let millis = self
            .base_drop_interval_ms
            .saturating_sub(self.drop_interval_step_ms.saturating_mul(steps))
            .max(self.min_drop_interval_ms);
        Duration::from_millis(millis)
    }

    #[must_use]
    pub fn line_clear_delay(&self) -> Duration {
        Duration::from_millis(self.line_clear_delay_ms)
    }
}

/// Drop interval at `level` with the default timing curve.
#[must_use]
pub fn drop_interval_for(level: u32) -> Duration {
    TimingConfig::default().drop_interval(level)
}
