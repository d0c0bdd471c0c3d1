//! Paginated card grid over the displayed subset.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{
    format_name, half_block_lines, Component, ACCENT_GOLD, ACCENT_TEAL, BG_HIGHLIGHT, BG_PANEL,
    TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::search;
use crate::sprite::SpriteData;
use crate::state::{
    grid_rows_for, page_count_for, page_size_for, Pokemon, CARD_HEIGHT, PAGER_HEIGHT, THUMB_ROWS,
};

#[derive(Default)]
pub struct PokemonGrid;

pub struct PokemonGridProps<'a> {
    pub pokemon: &'a [&'a Pokemon],
    pub selected: usize,
    pub columns: u16,
    pub query: &'a str,
    /// Cached sprites by id; cards without one draw only the name.
    pub sprites: &'a HashMap<u32, SpriteData>,
    pub is_focused: bool,
}

impl Component<Action> for PokemonGrid {
    type Props<'a> = PokemonGridProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let columns = props.columns.max(1) as i16;

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => Some(Action::SelectionMove(-1)),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::SelectionMove(1)),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionMove(-columns)),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionMove(columns)),
                KeyCode::PageUp => Some(Action::SelectionPage(-1)),
                KeyCode::PageDown => Some(Action::SelectionPage(1)),
                KeyCode::Home | KeyCode::Char('g') => Some(Action::SelectionJumpTop),
                KeyCode::End | KeyCode::Char('G') => Some(Action::SelectionJumpBottom),
                KeyCode::Enter | KeyCode::Char(' ') => Some(Action::DetailsOpen),
                KeyCode::Char('/') => Some(Action::SearchFocus),
                // Ctrl-C is left to the global quit handler.
                KeyCode::Char('c') if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Action::SearchClear)
                }
                KeyCode::Char('r') | KeyCode::F(5) => Some(Action::PokemonFetch),
                _ => None,
            },
            EventKind::Scroll { delta, .. } => {
                Some(Action::SelectionMove((*delta as i16).saturating_mul(columns)))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(PAGER_HEIGHT),
        ])
        .split(area);

        if props.pokemon.is_empty() {
            render_empty(frame, chunks[0], props.query);
            render_pager(frame, chunks[1], 0, 1, 0);
            return;
        }

        let rows = grid_rows_for(chunks[0].height);
        let columns = props.columns.max(1);
        let page_size = page_size_for(rows, columns);
        let selected = props.selected.min(props.pokemon.len() - 1);
        let page = selected / page_size;
        let start = page * page_size;
        let end = (start + page_size).min(props.pokemon.len());

        let row_areas =
            Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); rows]).split(chunks[0]);
        let column_constraints = vec![Constraint::Ratio(1, columns as u32); columns as usize];
        for (offset, pokemon) in props.pokemon[start..end].iter().enumerate() {
            let row = offset / columns as usize;
            let col = offset % columns as usize;
            let Some(row_area) = row_areas.get(row) else {
                break;
            };
            let cells = Layout::horizontal(column_constraints.clone()).split(*row_area);
            let card_area = Rect {
                height: CARD_HEIGHT.saturating_sub(1).min(cells[col].height),
                ..cells[col]
            };
            let is_selected = start + offset == selected;
            let sprite = props.sprites.get(&pokemon.id);
            render_card(frame, card_area, pokemon, sprite, is_selected, props.is_focused);
        }

        render_pager(
            frame,
            chunks[1],
            page,
            page_count_for(props.pokemon.len(), page_size),
            props.pokemon.len(),
        );
    }
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    pokemon: &Pokemon,
    sprite: Option<&SpriteData>,
    is_selected: bool,
    is_focused: bool,
) {
    let border = if is_selected && is_focused {
        Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD)
    } else if is_selected {
        Style::default().fg(ACCENT_GOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let bg = if is_selected { BG_HIGHLIGHT } else { BG_PANEL };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(format!("#{:03}", pokemon.id), border))
        .style(Style::default().bg(bg).fg(TEXT_MAIN));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    // Name on the last inner row, thumbnail above it.
    let name_area = Rect {
        y: inner.y + inner.height - 1,
        height: 1,
        ..inner
    };
    let name = Paragraph::new(Line::from(format_name(&pokemon.name)))
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(name, name_area);

    let thumb_rows = (inner.height - 1).min(THUMB_ROWS);
    if let Some(sprite) = sprite.filter(|_| thumb_rows > 0) {
        let thumb_area = Rect {
            height: thumb_rows,
            ..inner
        };
        render_thumbnail(frame, thumb_area, sprite);
    }
}

fn render_thumbnail(frame: &mut Frame, area: Rect, sprite: &SpriteData) {
    let thumb = sprite.thumbnail(area.width as u32, area.height as u32 * 2);
    let (cols, rows) = thumb.cell_size();
    let target = Rect {
        x: area.x + area.width.saturating_sub(cols) / 2,
        y: area.y + area.height.saturating_sub(rows) / 2,
        width: cols.min(area.width),
        height: rows.min(area.height),
    };
    frame.render_widget(
        Paragraph::new(half_block_lines(&thumb, target.width, target.height)),
        target,
    );
}

fn render_empty(frame: &mut Frame, area: Rect, query: &str) {
    let text = match search::active_needle(query) {
        Some(needle) => format!("No pokemon match \"{needle}\""),
        None => "No pokemon loaded".to_string(),
    };
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_DIM));
    frame.render_widget(paragraph, area);
}

fn render_pager(frame: &mut Frame, area: Rect, page: usize, page_count: usize, total: usize) {
    let line = Line::from(vec![
        Span::styled(
            format!("Page {}/{}", page + 1, page_count),
            Style::default().fg(ACCENT_GOLD),
        ),
        Span::styled(format!("  ({total} shown)"), Style::default().fg(TEXT_DIM)),
    ])
    .centered();
    frame.render_widget(Paragraph::new(line), area);
}
