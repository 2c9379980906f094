use blockfall_engine::PieceKind;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::PieceDisplay;

/// Upcoming pieces stacked vertically, next piece on top.
#[derive(Debug)]
pub struct PieceStackDisplay<'a> {
    pieces: Vec<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceStackDisplay<'a> {
    pub fn new<I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        Self {
            pieces: pieces.into_iter().collect(),
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        PieceDisplay::new().width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        // One blank row between pieces
        let count = u16::try_from(self.pieces.len()).unwrap_or(0);
        let pieces = count * PieceDisplay::new().height() + count.saturating_sub(1);
        pieces + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceStackDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let piece_height = PieceDisplay::new().height();
        let areas = Layout::vertical(self.pieces.iter().map(|_| Constraint::Length(piece_height)))
            .spacing(1)
            .split(area);
        for (kind, area) in self.pieces.iter().zip(areas.iter()) {
            PieceDisplay::new().piece(*kind).render(*area, buf);
        }
    }
}
