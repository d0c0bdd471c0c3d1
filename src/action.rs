//! Actions - intents from the UI and results from async tasks

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;
use crate::state::Pokemon;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,

    // ===== Pokemon category =====
    /// Intent: run the Pokemon query (initial load, retry or refresh)
    PokemonFetch,
    /// Result: full list, in API order
    PokemonDidLoad(Vec<Pokemon>),
    PokemonDidError(String),

    // ===== Search category =====
    SearchFocus,
    SearchBlur,
    /// Query text changed (every keystroke)
    SearchQueryChange(String),
    /// Enter in the search bar: apply and leave the input
    SearchSubmit(String),
    SearchClear,

    // ===== Selection category =====
    SelectionMove(i16),
    SelectionPage(i16),
    SelectionJumpTop,
    SelectionJumpBottom,

    // ===== Details category =====
    DetailsOpen,
    DetailsClose,

    // ===== Sprite category =====
    SpriteDidLoad { id: u32, sprite: SpriteData },
    SpriteDidError { id: u32, error: String },

    // ===== UI category =====
    UiTerminalResize(u16, u16),

    // ===== Uncategorized (global) =====
    /// Force a re-render (cursor movement in the search input)
    Render,
    Tick,
    Quit,
}
