use blockfall_engine::{PieceKind, PieceRotation};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{BlockDisplay, Tile};

/// A single piece in spawn orientation, centered in its area.
#[derive(Debug, Default)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * BlockDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Occupancy grid of `kind` trimmed to its bounding box.
pub fn piece_grid(kind: PieceKind) -> Vec<Vec<bool>> {
    let offsets: Vec<_> = kind.occupied_offsets(PieceRotation::default()).collect();
    let min_x = offsets.iter().map(|(x, _)| *x).min().unwrap_or(0);
    let max_x = offsets.iter().map(|(x, _)| *x).max().unwrap_or(0);
    let min_y = offsets.iter().map(|(_, y)| *y).min().unwrap_or(0);
    let max_y = offsets.iter().map(|(_, y)| *y).max().unwrap_or(0);
    (min_y..=max_y)
        .map(|y| {
            (min_x..=max_x)
                .map(|x| offsets.contains(&(x, y)))
                .collect()
        })
        .collect()
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(kind) = self.piece else {
            return;
        };
        let grid = piece_grid(kind);
        let rows = u16::try_from(grid.len()).unwrap_or(0);
        let cols = u16::try_from(grid.first().map_or(0, Vec::len)).unwrap_or(0);
        let piece_area = area.centered(
            Constraint::Length(cols * BlockDisplay::WIDTH),
            Constraint::Length(rows * BlockDisplay::HEIGHT),
        );

        let col_constraints = (0..cols).map(|_| Constraint::Length(BlockDisplay::WIDTH));
        let row_constraints = (0..rows).map(|_| Constraint::Length(BlockDisplay::HEIGHT));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let occupied = BlockDisplay::from_tile(Tile::Piece(kind), false);
        let empty = BlockDisplay::from_tile(Tile::Empty, false);
        for (row_area, row) in vertical.split(piece_area).iter().copied().zip(grid) {
            for (grid_cell, filled) in horizontal.split(row_area).iter().copied().zip(row) {
                let block = if filled { &occupied } else { &empty };
                block.render(grid_cell, buf);
            }
        }
    }
}
