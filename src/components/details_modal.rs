use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding};

use super::{
    format_name, half_block_lines, is_interrupt, Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL,
    TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::sprite::SpriteData;
use crate::state::{BaseStat, Pokemon};

const MODAL_WIDTH: u16 = 72;
const MODAL_HEIGHT: u16 = 24;
const SPRITE_COLUMN: u16 = 34;
/// Below this the bordered modal cannot fit its rows.
const MIN_WIDTH: u16 = 24;
const MIN_HEIGHT: u16 = 10;

pub struct DetailsModal {
    modal: Modal,
}

pub struct DetailsModalProps<'a> {
    pub pokemon: &'a Pokemon,
    pub sprite: Option<&'a SpriteData>,
    pub sprite_loading: bool,
    pub is_focused: bool,
}

impl DetailsModal {
    pub fn new() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

/// Centered rect of at most `width` x `height`, clamped to `area`.
pub fn modal_rect(area: Rect) -> Rect {
    let width = MODAL_WIDTH.min(area.width.saturating_sub(2));
    let height = MODAL_HEIGHT.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

impl Component<Action> for DetailsModal {
    type Props<'a> = DetailsModalProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || is_interrupt(event) {
            return None;
        }
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc
                | KeyCode::Enter
                | KeyCode::Backspace
                | KeyCode::Char(' ')
                | KeyCode::Char('q') => Some(Action::DetailsClose),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            render_too_small(frame, area, props.pokemon);
            return;
        }
        let modal_area = modal_rect(area);
        let pokemon = props.pokemon;
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT_TEAL))
                .title(Span::styled(
                    format!(" #{:03} {} ", pokemon.id, format_name(&pokemon.name)),
                    Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
                ))
                .title_bottom(Line::from(" Esc close ").right_aligned())
                .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
            let inner = block.inner(content_area);
            frame.render_widget(block, content_area);

            let columns = Layout::horizontal([
                Constraint::Length(SPRITE_COLUMN.min(inner.width / 2)),
                Constraint::Min(10),
            ])
            .split(inner);
            render_sprite(frame, columns[0], props.sprite, props.sprite_loading);
            let info = Paragraph::new(info_text(pokemon)).wrap(Wrap { trim: true });
            frame.render_widget(info, columns[1]);
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(BG_PANEL),
                        padding: Padding::default(),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::DetailsClose,
                render_content: &mut render_content,
            },
        );
    }
}

/// Fallback while the terminal is too small for the modal; the modal keeps focus.
fn render_too_small(frame: &mut Frame, area: Rect, pokemon: &Pokemon) {
    let lines = vec![
        Line::styled(
            format!("#{:03} {}", pokemon.id, format_name(&pokemon.name)),
            Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
        ),
        Line::styled("Too small", Style::default().fg(TEXT_DIM)),
        Line::styled("Esc close", Style::default().fg(TEXT_DIM)),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN)),
        area,
    );
}

fn info_text(pokemon: &Pokemon) -> Text<'static> {
    let mut lines = vec![
        info_row("Name", format_name(&pokemon.name)),
        info_row("Species", format_name(&pokemon.species)),
        info_row("Height", format_height(pokemon.height)),
        info_row("Weight", format_weight(pokemon.weight)),
        info_row("Types", join_names(&pokemon.types)),
        info_row("Abilities", join_names(&pokemon.abilities)),
        Line::raw(""),
        Line::from(Span::styled(
            "Base stats",
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
        )),
    ];
    if pokemon.stats.is_empty() {
        lines.push(Line::styled("  none", Style::default().fg(TEXT_DIM)));
    }
    lines.extend(pokemon.stats.iter().map(stat_line));
    Text::from(lines)
}

fn info_row(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<10}"),
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn join_names(names: &[String]) -> String {
    if names.is_empty() {
        return "-".to_string();
    }
    names
        .iter()
        .map(|name| format_name(name))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_height(decimetres: u32) -> String {
    format!("{decimetres} ({:.1} m)", decimetres as f32 / 10.0)
}

pub fn format_weight(hectograms: u32) -> String {
    format!("{hectograms} ({:.1} kg)", hectograms as f32 / 10.0)
}

fn stat_line(stat: &BaseStat) -> Line<'static> {
    let bar_len = (stat.base_stat as usize / 10).clamp(1, 20);
    let mut spans = vec![
        Span::styled(
            format!("  {:>4} {:>3} ", shorten_stat(&stat.name), stat.base_stat),
            Style::default().fg(TEXT_MAIN),
        ),
        Span::styled("#".repeat(bar_len), Style::default().fg(ACCENT_TEAL)),
    ];
    if stat.effort > 0 {
        spans.push(Span::styled(
            format!(" +{} EV", stat.effort),
            Style::default().fg(ACCENT_GOLD),
        ));
    }
    Line::from(spans)
}

fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SATK".to_string(),
        "special-defense" => "SDEF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

fn render_sprite(frame: &mut Frame, area: Rect, sprite: Option<&SpriteData>, loading: bool) {
    let Some(sprite) = sprite else {
        let content = if loading { "[loading sprite]" } else { "[no sprite]" };
        let placeholder_area = Rect {
            y: area.y + area.height / 2,
            height: area.height.min(1),
            ..area
        };
        frame.render_widget(
            Paragraph::new(content)
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM)),
            placeholder_area,
        );
        return;
    };

    let (cols, rows) = sprite.cell_size();
    let cols = cols.min(area.width);
    let rows = rows.min(area.height);
    let target = Rect {
        x: area.x + area.width.saturating_sub(cols) / 2,
        y: area.y + area.height.saturating_sub(rows) / 2,
        width: cols,
        height: rows,
    };
    frame.render_widget(Paragraph::new(half_block_lines(sprite, cols, rows)), target);
}
