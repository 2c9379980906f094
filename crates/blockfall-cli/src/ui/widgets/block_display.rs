use blockfall_engine::{Cell, PieceKind};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use super::style;

/// What a single grid cell shows on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Ghost,
    Clearing,
    Piece(PieceKind),
}

impl From<Cell> for Tile {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Tile::Empty,
            Cell::Filled(kind) => Tile::Piece(kind),
        }
    }
}

#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn from_tile(tile: Tile, show_dots: bool) -> Self {
        match tile {
            Tile::Empty if show_dots => Self::new(style::EMPTY_DOT, "."),
            Tile::Empty => Self::new(style::EMPTY, ""),
            Tile::Ghost => Self::new(style::GHOST, "[]"),
            Tile::Clearing => Self::new(style::CLEARING, ""),
            Tile::Piece(kind) => Self::new(piece_style(kind), ""),
        }
    }
}

fn piece_style(kind: PieceKind) -> Style {
    match kind {
        PieceKind::I => style::I_BLOCK,
        PieceKind::O => style::O_BLOCK,
        PieceKind::S => style::S_BLOCK,
        PieceKind::Z => style::Z_BLOCK,
        PieceKind::J => style::J_BLOCK,
        PieceKind::L => style::L_BLOCK,
        PieceKind::T => style::T_BLOCK,
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // A Paragraph fills the whole area, not just the cells under the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
