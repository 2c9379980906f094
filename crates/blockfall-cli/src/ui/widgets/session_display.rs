use blockfall_engine::{GameSession, GameSnapshot, GameStatus};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::{
    observer::{Announcer, StackAlert},
    ui::widgets::{
        BoardDisplay, MessageLogDisplay, PieceDisplay, PieceStackDisplay, SessionStatsDisplay,
        color, style,
    },
};

/// Full game screen: hold, stats, board, next queue, and message log.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    snapshot: GameSnapshot,
    announcer: &'a Announcer,
    alert: StackAlert,
    show_ghost: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession, announcer: &'a Announcer, alert: StackAlert) -> Self {
        Self {
            session,
            snapshot: session.snapshot(),
            announcer,
            alert,
            show_ghost: true,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let status = self.snapshot.status;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match status {
            GameStatus::Ready => color::CYAN,
            GameStatus::Playing => color::WHITE,
            GameStatus::Paused => color::YELLOW,
            GameStatus::GameOver => color::RED,
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let game_board = BoardDisplay::new(&self.snapshot)
            .show_ghost(self.show_ghost)
            .block(
                Block::bordered()
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let hold_panel = {
            let widget = PieceDisplay::new().block(panel("HOLD"));
            match self.snapshot.held {
                Some(kind) => widget.piece(kind),
                None => widget,
            }
        };
        let piece_stack =
            PieceStackDisplay::new(self.snapshot.next.iter().copied()).block(panel("NEXT"));
        let session_stats = SessionStatsDisplay::new(self.session).block(panel("STATS"));
        let message_log =
            MessageLogDisplay::new(self.announcer, self.alert).block(panel("MESSAGES"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), session_stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(u16::max(piece_stack.width(), message_log.width())),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(session_stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(session_stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);

        let [piece_stack_area, message_area] = Layout::vertical([
            Constraint::Length(piece_stack.height()),
            Constraint::Fill(1),
        ])
        .spacing(1)
        .areas(right_column);
        let piece_stack_area = piece_stack_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(piece_stack.width())]).flex(Flex::Start),
        )[0];
        let message_area = message_area.intersection(Rect {
            height: game_board
                .height()
                .saturating_sub(piece_stack.height() + 1),
            ..message_area
        });

        let game_board_width = game_board.width();
        hold_panel.render(hold_area, buf);
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        piece_stack.render(piece_stack_area, buf);
        message_log.render(message_area, buf);

        let popup = match status {
            GameStatus::Playing => None,
            GameStatus::Ready => Some((
                "PRESS ENTER",
                Style::new().fg(color::BLACK).bg(color::CYAN),
            )),
            GameStatus::Paused => {
                Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
            }
            GameStatus::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
