use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::style;
use crate::observer::{Announcer, StackAlert};

/// Recent announcements, newest last, under a stack height indicator.
#[derive(Debug)]
pub struct MessageLogDisplay<'a> {
    announcer: &'a Announcer,
    alert: StackAlert,
    block: Option<BlockWidget<'a>>,
}

impl<'a> MessageLogDisplay<'a> {
    pub fn new(announcer: &'a Announcer, alert: StackAlert) -> Self {
        Self {
            announcer,
            alert,
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
        26 + super::block_horizontal_margin(self.block.as_ref())
    }
}

impl Widget for MessageLogDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        if area.height == 0 {
            return;
        }

        let alert = match self.alert {
            StackAlert::Safe => Line::styled("stack: ok", style::DEFAULT),
            StackAlert::Caution => Line::styled("stack: caution", style::CAUTION),
            StackAlert::Danger => Line::styled("stack: DANGER", style::DANGER),
        };
        alert.render(Rect { height: 1, ..area }, buf);

        let visible = usize::from(area.height.saturating_sub(1));
        let messages = self.announcer.messages();
        let skip = messages.len().saturating_sub(visible);
        for (row, message) in (1..area.height).zip(messages.iter().skip(skip)) {
            let line = Line::from(vec![
                Span::styled(message.at.format("%H:%M:%S ").to_string(), style::EMPTY_DOT),
                Span::styled(message.text.as_str(), style::DEFAULT),
            ]);
            line.render(
                Rect {
                    y: area.y + row,
                    height: 1,
                    ..area
                },
                buf,
            );
        }
    }
}
