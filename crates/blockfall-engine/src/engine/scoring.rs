use serde::{Deserialize, Serialize};

/// Base score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
const SCORE_TABLE: [u64; 5] = [0, 100, 300, 500, 800];

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// How a piece was moved downward by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropKind {
    Soft,
    Hard,
}

/// Points for clearing `line_count` lines at once on `level`.
///
/// Only 1 to 4 lines can be completed by a single piece. Counts above the
/// table are scored as a four-line clear.
#[must_use]
pub fn score_for_clear(line_count: usize, level: u32) -> u64 {
    SCORE_TABLE[line_count.min(SCORE_TABLE.len() - 1)] * u64::from(level)
}

/// Points for moving a piece down `cells_moved` rows.
#[must_use]
pub fn score_for_drop(cells_moved: u32, kind: DropKind) -> u64 {
    let per_cell = match kind {
        DropKind::Soft => 1,
        DropKind::Hard => 2,
    };
    u64::from(cells_moved) * per_cell
}

/// Level reached after clearing `total_lines` lines. Starts at 1.
#[must_use]
pub fn level_for(total_lines: u32) -> u32 {
    1 + total_lines / LINES_PER_LEVEL
}

/// Score, level, and line statistics of one game.
///
/// All counters only grow during a game; a restart replaces the whole value.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4); // Tetris (4 lines) at level 1
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: u64,
    level: u32,
    cleared_lines: u32,
    completed_pieces: u32,
    line_cleared_counter: [u32; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            cleared_lines: 0,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Current level, derived from the total lines cleared.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn cleared_lines(&self) -> u32 {
        self.cleared_lines
    }

    /// Number of pieces locked into the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> u32 {
        self.completed_pieces
    }

    /// Histogram of locks by lines cleared.
    ///
    /// - `[0]`: locks that cleared nothing
    /// - `[1]`: singles
    /// - `[2]`: doubles
    /// - `[3]`: triples
    /// - `[4]`: tetrises
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[u32; 5] {
        &self.line_cleared_counter
    }

    /// Adds soft or hard drop points.
    pub fn add_drop(&mut self, cells_moved: u32, kind: DropKind) {
        self.score += score_for_drop(cells_moved, kind);
    }

    /// Records a locked piece that completed `cleared_lines` rows.
    ///
    /// Line-clear points use the level in effect before the clear; the level
    /// is recomputed afterwards. Returns the points awarded.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> u64 {
        let points = if cleared_lines > 0 {
            score_for_clear(cleared_lines, self.level)
        } else {
            0
        };
        self.completed_pieces += 1;
        self.cleared_lines += u32::try_from(cleared_lines).unwrap_or(u32::MAX);
        let bucket = cleared_lines.min(self.line_cleared_counter.len() - 1);
        self.line_cleared_counter[bucket] += 1;
        self.score += points;
        self.level = level_for(self.cleared_lines);
        points
    }
}
