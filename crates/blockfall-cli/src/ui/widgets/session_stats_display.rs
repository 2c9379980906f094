use std::iter;

use blockfall_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::style;

pub struct SessionStatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
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
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(fn(&GameSession) -> String),
    LabelValue(&'static str, fn(&GameSession) -> String),
}

fn clear_count(session: &GameSession, lines: usize) -> String {
    session.state().stats().line_cleared_counter()[lines].to_string()
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(|session| session.state().score().to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(|session| {
        let time = session.play_time();
        format!(
            "{}:{:0>2}.{:0>2}",
            time.as_secs() / 60,
            time.as_secs() % 60,
            time.subsec_millis() / 10
        )
    }),
    Row::Empty,
    Row::LabelValue("LEVEL:", |session| session.state().level().to_string()),
    Row::LabelValue("LINES:", |session| {
        session.state().lines_cleared().to_string()
    }),
    Row::LabelValue("PIECES:", |session| {
        session.state().stats().completed_pieces().to_string()
    }),
    Row::Empty,
    Row::LabelValue("SINGLES:", |session| clear_count(session, 1)),
    Row::LabelValue("DOUBLES:", |session| clear_count(session, 2)),
    Row::LabelValue("TRIPLES:", |session| clear_count(session, 3)),
    Row::LabelValue("TETRIS:", |session| clear_count(session, 4)),
];

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
