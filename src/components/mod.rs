pub mod details_modal;
pub mod header;
pub mod home_screen;
pub mod pokemon_grid;
pub mod search_bar;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use details_modal::{DetailsModal, DetailsModalProps};
pub use header::{Header, HeaderProps};
pub use home_screen::{HomeLayout, HomeScreen, HomeScreenProps};
pub use pokemon_grid::{PokemonGrid, PokemonGridProps};
pub use search_bar::{SearchBar, SearchBarProps};

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use tui_dispatch::EventKind;

use crate::sprite::SpriteData;

pub const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const ACCENT_YELLOW: Color = Color::Rgb(255, 222, 0);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);

/// `mr-mime` -> `Mr Mime`
pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ctrl-C. Every handler lets it through to the global quit binding.
pub fn is_interrupt(event: &EventKind) -> bool {
    matches!(
        event,
        EventKind::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
    )
}

/// One cell per column and pixel-row pair: upper half in fg, lower half in bg.
pub fn half_block_lines(sprite: &SpriteData, cols: u16, rows: u16) -> Vec<Line<'static>> {
    (0..rows as u32)
        .map(|row| {
            let spans = (0..cols as u32)
                .map(|x| {
                    let top = sprite.pixel(x, row * 2);
                    let bottom = sprite.pixel(x, row * 2 + 1);
                    match (top, bottom) {
                        (Some(t), Some(b)) => Span::styled(
                            "\u{2580}",
                            Style::default().fg(rgb(t)).bg(rgb(b)),
                        ),
                        (Some(t), None) => Span::styled("\u{2580}", Style::default().fg(rgb(t))),
                        (None, Some(b)) => Span::styled("\u{2584}", Style::default().fg(rgb(b))),
                        (None, None) => Span::raw(" "),
                    }
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}
