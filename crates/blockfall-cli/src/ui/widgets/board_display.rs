use std::iter;

use blockfall_engine::{GameSnapshot, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use super::{BlockDisplay, Tile};

/// The playfield: locked cells, the ghost, the active piece, and rows being
/// cleared.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    snapshot: &'a GameSnapshot,
    show_ghost: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(snapshot: &'a GameSnapshot) -> Self {
        Self {
            snapshot,
            show_ghost: true,
            block: None,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        grid_len(self.snapshot.board.width()) * BlockDisplay::WIDTH
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        grid_len(self.snapshot.board.height()) * BlockDisplay::HEIGHT
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Tiles to draw, row by row.
    pub fn tiles(&self) -> Vec<Vec<Tile>> {
        let board = &self.snapshot.board;
        let mut tiles: Vec<Vec<Tile>> = board
            .rows()
            .map(|row| row.iter().copied().map(Tile::from).collect())
            .collect();
        for &y in &self.snapshot.clearing_lines {
            if let Some(row) = tiles.get_mut(y) {
                row.fill(Tile::Clearing);
            }
        }

        let mut paint = |piece: &Piece, tile: Tile| {
            for (x, y) in piece.cells() {
                if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                    && let Some(slot) = tiles.get_mut(y).and_then(|row| row.get_mut(x))
                {
                    *slot = tile;
                }
            }
        };
        if self.show_ghost
            && let Some(ghost) = &self.snapshot.ghost
        {
            paint(ghost, Tile::Ghost);
        }
        if let Some(piece) = &self.snapshot.active {
            paint(piece, Tile::Piece(piece.kind()));
        }
        tiles
    }
}

fn grid_len(cells: usize) -> u16 {
    u16::try_from(cells).unwrap_or(u16::MAX)
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let board = &self.snapshot.board;
        let col_constraints =
            (0..board.width()).map(|_| Constraint::Length(BlockDisplay::WIDTH));
        let row_constraints =
            (0..board.height()).map(|_| Constraint::Length(BlockDisplay::HEIGHT));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_rows = vertical.split(area);
        for (row_area, row) in iter::zip(grid_rows.iter().copied(), self.tiles()) {
            let grid_row = horizontal.split(row_area);
            for (grid_cell, tile) in iter::zip(grid_row.iter().copied(), row) {
                BlockDisplay::from_tile(tile, true).render(grid_cell, buf);
            }
        }
    }
}
