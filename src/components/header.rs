use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{Component, ACCENT_YELLOW};
use crate::action::Action;

pub const TITLE: &str = "POKEMON APP";

pub struct Header;

pub struct HeaderProps {
    pub shown: usize,
    pub total: usize,
    pub is_refreshing: bool,
}

impl Component<Action> for Header {
    type Props<'a> = HeaderProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let bar = Style::default().bg(ACCENT_YELLOW).fg(Color::Black);
        let mut spans = vec![Span::styled(
            TITLE,
            bar.add_modifier(Modifier::BOLD),
        )];
        if props.total > 0 {
            spans.push(Span::styled(
                format!("  {}/{}", props.shown, props.total),
                bar,
            ));
        }
        if props.is_refreshing {
            spans.push(Span::styled("  refreshing...", bar));
        }

        let block = Block::default().borders(Borders::NONE).style(bar);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let line_area = Rect {
            y: inner.y + inner.height.saturating_sub(1) / 2,
            height: inner.height.min(1),
            ..inner
        };
        frame.render_widget(Paragraph::new(Line::from(spans).centered()), line_area);
    }
}
