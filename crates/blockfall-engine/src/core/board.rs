use std::fmt;

use serde::{Serialize, Serializer};

use super::piece::{Piece, PieceKind};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Locked cell of a specific piece type.
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Filled(kind) => kind.as_char(),
        }
    }
}

/// Fixed-size grid of locked cells, stored row-major with row 0 at the top.
///
/// The dimensions never change after creation. Operations that alter the
/// contents ([`Board::lock_piece`], [`Board::clear_lines`]) return a new board
/// and leave `self` untouched, so earlier snapshots stay valid.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
///
/// let board = Board::standard();
/// let piece = Piece::spawn(PieceKind::O, board.width()).translated(0, 18);
/// let locked = board.lock_piece(&piece);
///
/// assert!(board.is_cell_free(4, 19));
/// assert!(!locked.is_cell_free(4, 19));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub const STANDARD_WIDTH: usize = 10;
    pub const STANDARD_HEIGHT: usize = 20;

    /// Creates an empty board with the given dimensions.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Creates an empty 10×20 board.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(Self::STANDARD_WIDTH, Self::STANDARD_HEIGHT)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the cell at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Overwrites a single cell. Out-of-bounds coordinates are ignored.
    ///
    /// Meant for building fixtures and boards restored by a front-end; game
    /// rules only go through [`Board::lock_piece`] and [`Board::clear_lines`].
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.width)
    }

    /// Returns `true` iff `(x, y)` lies on the board and holds no block.
    ///
    /// Out-of-bounds coordinates count as occupied.
    #[must_use]
    pub fn is_cell_free(&self, x: i16, y: i16) -> bool {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return false;
        };
        self.cell(x, y).is_some_and(Cell::is_empty)
    }

    /// Writes every cell of the piece into a copy of the board.
    ///
    /// Cells above row 0 (spawn overhang) are dropped silently.
    #[must_use]
    pub fn lock_piece(&self, piece: &Piece) -> Self {
        let mut board = self.clone();
        for (x, y) in piece.cells() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
                board.set_cell(x, y, Cell::Filled(piece.kind()));
            }
        }
        board
    }

    /// Returns `true` if every cell of row `y` is occupied.
    #[must_use]
    pub fn is_line_full(&self, y: usize) -> bool {
        self.rows()
            .nth(y)
            .is_some_and(|row| row.iter().all(|cell| !cell.is_empty()))
    }

    /// Returns the indices of all full rows in ascending order.
    #[must_use]
    pub fn find_full_lines(&self) -> Vec<usize> {
        (0..self.height).filter(|&y| self.is_line_full(y)).collect()
    }

    /// Removes the given rows and lets everything above them fall.
    ///
    /// Duplicate and out-of-range indices are ignored. The result has the
    /// same dimensions as `self`, with as many empty rows prepended at the top
    /// as were removed.
    #[must_use]
    pub fn clear_lines(&self, lines: &[usize]) -> Self {
        let remaining: Vec<Cell> = self
            .rows()
            .enumerate()
            .filter(|(y, _)| !lines.contains(y))
            .flat_map(|(_, row)| row.iter().copied())
            .collect();
        let removed = self.cells.len() - remaining.len();

        let mut cells = Vec::with_capacity(self.cells.len());
        cells.resize(removed, Cell::Empty);
        cells.extend(remaining);
        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// For each column, the row index of its topmost occupied cell, or the
    /// board height if the column is empty.
    #[must_use]
    pub fn column_heights(&self) -> Vec<usize> {
        (0..self.width)
            .map(|x| {
                (0..self.height)
                    .find(|&y| !self.cells[y * self.width + x].is_empty())
                    .unwrap_or(self.height)
            })
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Serialized as a list of row strings, e.g. `"...IIII..."`.
impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(
            self.rows()
                .map(|row| row.iter().map(|cell| cell.as_char()).collect::<String>()),
        )
    }
}
