//! Top-level screen: header, search, grid, footer and the details modal on top.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::{EventKind, HandlerResponse};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::{
    is_interrupt, Component, DetailsModal, DetailsModalProps, Header, HeaderProps, PokemonGrid,
    PokemonGridProps, SearchBar, SearchBarProps, ACCENT_GOLD, ACCENT_TEAL, ACCENT_YELLOW,
    BG_BASE, BG_PANEL, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::state::{AppState, Pokemon, FOOTER_HEIGHT, HEADER_HEIGHT, SEARCH_HEIGHT};

/// Screen regions, derived from the same constants the reducer pages with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HomeLayout {
    pub header: Rect,
    pub search: Rect,
    pub grid: Rect,
    pub footer: Rect,
}

impl HomeLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(SEARCH_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);
        Self {
            header: chunks[0],
            search: chunks[1],
            grid: chunks[2],
            footer: chunks[3],
        }
    }
}

pub struct HomeScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

pub struct HomeScreen {
    header: Header,
    search: SearchBar,
    grid: PokemonGrid,
    details: DetailsModal,
    status_bar: StatusBar,
}

impl HomeScreen {
    pub fn new() -> Self {
        Self {
            header: Header,
            search: SearchBar::new(),
            grid: PokemonGrid,
            details: DetailsModal::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        if is_interrupt(event) {
            return HandlerResponse::ignored();
        }
        let props = SearchBarProps {
            query: &state.search.query,
            is_focused: true,
            on_change: Action::SearchQueryChange,
            on_submit: Action::SearchSubmit,
        };
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    pub fn handle_grid_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let visible: Vec<&Pokemon> = state.visible().collect();
        let props = PokemonGridProps {
            pokemon: &visible,
            selected: state.selected_index,
            columns: state.columns,
            query: &state.search.query,
            sprites: &state.sprites,
            is_focused: true,
        };
        let actions: Vec<_> = self.grid.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    pub fn handle_details_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(pokemon) = state.modal_pokemon() else {
            return HandlerResponse::ignored();
        };
        if is_interrupt(event) {
            return HandlerResponse::ignored();
        }
        let props = DetailsModalProps {
            pokemon,
            sprite: state.sprites.get(&pokemon.id),
            sprite_loading: state.sprite_pending_for(pokemon.id),
            is_focused: true,
        };
        let actions: Vec<_> = self.details.handle_event(event, props).into_iter().collect();
        // The modal swallows everything else while it is open.
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

impl Default for HomeScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Action> for HomeScreen {
    type Props<'a> = HomeScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let state = props.state;
        let response = if state.modal_pokemon().is_some() {
            self.handle_details_event(event, state)
        } else if state.search.focused {
            self.handle_search_event(event, state)
        } else {
            self.handle_grid_event(event, state)
        };
        response.actions
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        if state.pokemon.data().is_none() {
            if let Some(error) = state.pokemon.error() {
                render_error(frame, area, error);
            } else {
                render_loading(frame, area, state.tick);
            }
            return;
        }

        let layout = HomeLayout::new(area);
        self.header.render(
            frame,
            layout.header,
            HeaderProps {
                shown: state.visible_len(),
                total: state.all_pokemon().len(),
                is_refreshing: state.is_refreshing,
            },
        );

        let modal_open = state.modal_pokemon().is_some();
        self.search.render(
            frame,
            layout.search,
            SearchBarProps {
                query: &state.search.query,
                is_focused: props.is_focused && state.search.focused && !modal_open,
                on_change: Action::SearchQueryChange,
                on_submit: Action::SearchSubmit,
            },
        );

        let visible: Vec<&Pokemon> = state.visible().collect();
        self.grid.render(
            frame,
            layout.grid,
            PokemonGridProps {
                pokemon: &visible,
                selected: state.selected_index,
                columns: state.columns,
                query: &state.search.query,
                sprites: &state.sprites,
                is_focused: props.is_focused && !state.search.focused && !modal_open,
            },
        );

        self.render_footer(frame, layout.footer, state);

        if let Some(pokemon) = state.modal_pokemon() {
            self.details.render(
                frame,
                area,
                DetailsModalProps {
                    pokemon,
                    sprite: state.sprites.get(&pokemon.id),
                    sprite_loading: state.sprite_pending_for(pokemon.id),
                    is_focused: props.is_focused,
                },
            );
        }
    }
}

impl HomeScreen {
    fn render_footer(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let hints = status_hints(state);
        let status = state.message.clone().unwrap_or_default();
        let status_items = [StatusBarItem::span(Span::styled(
            status.as_str(),
            Style::default().fg(ACCENT_GOLD),
        ))];

        let style = StatusBarStyle {
            base: BaseStyle {
                border: Some(BorderStyle {
                    borders: Borders::ALL,
                    style: Style::default().fg(TEXT_DIM),
                    focused_style: None,
                }),
                padding: Padding::xy(1, 0),
                bg: Some(BG_PANEL),
                fg: Some(TEXT_MAIN),
            },
            text: Style::default().fg(TEXT_DIM),
            hint_key: Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(TEXT_DIM),
            separator: Style::default().fg(TEXT_DIM),
        };

        let props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items).with_separator("  "),
            style,
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, props);
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.modal_pokemon().is_some() {
        vec![StatusBarHint::new("Esc", "close")]
    } else if state.search.focused {
        vec![
            StatusBarHint::new("Enter", "apply"),
            StatusBarHint::new("Esc", "back"),
        ]
    } else {
        vec![
            StatusBarHint::new("hjkl", "move"),
            StatusBarHint::new("Enter", "details"),
            StatusBarHint::new("/", "search"),
            StatusBarHint::new("c", "clear"),
            StatusBarHint::new("r", "refresh"),
            StatusBarHint::new("q", "quit"),
        ]
    }
}

fn centered_line(area: Rect) -> Rect {
    Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    }
}

fn render_loading(frame: &mut Frame, area: Rect, tick: u32) {
    let dots = ".".repeat(tick as usize % 4);
    let line = Line::from(vec![
        Span::styled(
            "Fetching pokemon data",
            Style::default()
                .fg(ACCENT_YELLOW)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{dots:<3}"), Style::default().fg(ACCENT_YELLOW)),
    ]);
    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center),
        centered_line(area),
    );
}

fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let line_area = centered_line(area);
    let text = vec![
        Line::styled(
            format!("Error: {error}"),
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
        ),
        Line::styled("press r to retry, q to quit", Style::default().fg(TEXT_DIM)),
    ];
    let block_area = Rect {
        height: area.height.saturating_sub(line_area.y - area.y).min(2),
        ..line_area
    };
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center),
        block_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;
    use tui_dispatch::DataResource;

    fn esc() -> EventKind {
        EventKind::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
    }

    fn loaded_state() -> AppState {
        let list = ["bulbasaur", "ivysaur", "venusaur"]
            .iter()
            .enumerate()
            .map(|(idx, name)| Pokemon {
                id: idx as u32 + 1,
                name: name.to_string(),
                ..Default::default()
            })
            .collect();
        let mut state = AppState {
            pokemon: DataResource::Loaded(list),
            ..Default::default()
        };
        state.rebuild_filtered();
        state
    }

    #[test]
    fn test_layout_splits_chrome() {
        let layout = HomeLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, HEADER_HEIGHT);
        assert_eq!(layout.search.height, SEARCH_HEIGHT);
        assert_eq!(layout.footer.height, FOOTER_HEIGHT);
        assert_eq!(layout.grid.height, 24 - HEADER_HEIGHT - SEARCH_HEIGHT - FOOTER_HEIGHT);
    }

    #[test]
    fn test_routing_prefers_search_when_focused() {
        let mut state = loaded_state();
        state.search.focused = true;
        let mut screen = HomeScreen::new();
        let actions: Vec<_> = screen
            .handle_event(
                &esc(),
                HomeScreenProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchBlur);
    }

    #[test]
    fn test_routing_prefers_modal_when_open() {
        let mut state = loaded_state();
        state.search.focused = true;
        state.modal = Some(2);
        let mut screen = HomeScreen::new();
        let actions: Vec<_> = screen
            .handle_event(
                &esc(),
                HomeScreenProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::DetailsClose);
    }

    #[test]
    fn test_ctrl_c_not_consumed_by_search_or_modal() {
        let ctrl_c = EventKind::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let mut state = loaded_state();
        state.search.focused = true;
        let mut screen = HomeScreen::new();
        let response = screen.handle_search_event(&ctrl_c, &state);
        assert!(!response.consumed);
        assert!(response.actions.is_empty());

        state.search.focused = false;
        state.modal = Some(1);
        let response = screen.handle_details_event(&ctrl_c, &state);
        assert!(!response.consumed);

        state.modal = None;
        let response = screen.handle_grid_event(&ctrl_c, &state);
        assert!(!response.consumed);
    }

    #[test]
    fn test_render_loading_dots() {
        let state = AppState {
            pokemon: DataResource::Loading,
            tick: 2,
            ..Default::default()
        };
        let mut render = RenderHarness::new(60, 12);
        let mut screen = HomeScreen::new();
        let output = render.render_to_string_plain(|frame| {
            screen.render(
                frame,
                frame.area(),
                HomeScreenProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });
        assert!(output.contains("Fetching pokemon data.."));
    }
}
