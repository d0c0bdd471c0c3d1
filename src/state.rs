//! Application state - single source of truth

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::search;
use crate::sprite::SpriteData;

pub const DEFAULT_ENDPOINT: &str = "https://beta.pokeapi.co/graphql/v1beta";
pub const DEFAULT_SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/";
pub const DEFAULT_COLUMNS: u16 = 4;

/// Rows taken by the header bar.
pub const HEADER_HEIGHT: u16 = 3;
/// Rows taken by the bordered search input.
pub const SEARCH_HEIGHT: u16 = 3;
/// Rows taken by the status bar.
pub const FOOTER_HEIGHT: u16 = 3;
/// Pager line below the grid.
pub const PAGER_HEIGHT: u16 = 1;
/// Sprite thumbnail rows inside a card (two pixels per row).
pub const THUMB_ROWS: u16 = 3;
/// Bordered card: top border, thumbnail, name, bottom border plus one spacer row.
pub const CARD_HEIGHT: u16 = THUMB_ROWS + 4;

pub const LOADING_TICK_MS: u64 = 120;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BaseStat {
    pub name: String,
    pub base_stat: u32,
    pub effort: u32,
}

/// One record of `pokemon_v2_pokemon`, flattened.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// Decimetres.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    pub species: String,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<BaseStat>,
}

/// Where records and sprites come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ApiSource {
    pub endpoint: String,
    pub sprite_base_url: String,
    pub use_cache: bool,
}

impl Default for ApiSource {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            sprite_base_url: DEFAULT_SPRITE_BASE_URL.to_string(),
            use_cache: true,
        }
    }
}

impl ApiSource {
    pub fn sprite_url(&self, id: u32) -> String {
        format!("{}{id}.png", self.sprite_base_url)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub focused: bool,
    pub query: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub source: ApiSource,
    pub columns: u16,
    pub terminal_size: (u16, u16),

    /// Full list as fetched, never filtered in place.
    pub pokemon: DataResource<Vec<Pokemon>>,
    pub is_refreshing: bool,
    /// Indices into the full list that match the current query.
    pub filtered_indices: Vec<usize>,
    pub selected_index: usize,

    pub search: SearchState,
    /// Id of the record shown in the details modal; `None` when hidden.
    pub modal: Option<u32>,

    pub sprites: HashMap<u32, SpriteData>,
    /// Ids with a sprite download in flight.
    pub sprite_pending: Vec<u32>,
    pub sprite_failed: Vec<u32>,

    pub message: Option<String>,
    pub tick: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ApiSource::default(), DEFAULT_COLUMNS)
    }
}

impl AppState {
    pub fn new(source: ApiSource, columns: u16) -> Self {
        Self {
            source,
            columns: columns.max(1),
            terminal_size: (80, 24),
            pokemon: DataResource::Empty,
            is_refreshing: false,
            filtered_indices: Vec::new(),
            selected_index: 0,
            search: SearchState::default(),
            modal: None,
            sprites: HashMap::new(),
            sprite_pending: Vec::new(),
            sprite_failed: Vec::new(),
            message: None,
            tick: 0,
        }
    }

    pub fn all_pokemon(&self) -> &[Pokemon] {
        self.pokemon.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn visible(&self) -> impl Iterator<Item = &Pokemon> + '_ {
        let all = self.all_pokemon();
        self.filtered_indices
            .iter()
            .filter_map(move |idx| all.get(*idx))
    }

    pub fn visible_len(&self) -> usize {
        self.filtered_indices.len()
    }

    pub fn selected(&self) -> Option<&Pokemon> {
        self.filtered_indices
            .get(self.selected_index)
            .and_then(|idx| self.all_pokemon().get(*idx))
    }

    pub fn find(&self, id: u32) -> Option<&Pokemon> {
        self.all_pokemon().iter().find(|pokemon| pokemon.id == id)
    }

    pub fn modal_pokemon(&self) -> Option<&Pokemon> {
        self.modal.and_then(|id| self.find(id))
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.filtered_indices.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.filtered_indices.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    /// Re-derive the displayed subset from the full list and the current query.
    pub fn rebuild_filtered(&mut self) {
        self.filtered_indices = search::filter_indices(self.all_pokemon(), &self.search.query);
        if self.selected_index >= self.filtered_indices.len() {
            self.selected_index = 0;
        }
    }

    pub fn grid_rows(&self) -> usize {
        let chrome = HEADER_HEIGHT + SEARCH_HEIGHT + FOOTER_HEIGHT + PAGER_HEIGHT;
        grid_rows_for(self.terminal_size.1.saturating_sub(chrome))
    }

    pub fn page_size(&self) -> usize {
        page_size_for(self.grid_rows(), self.columns)
    }

    pub fn current_page(&self) -> usize {
        self.selected_index / self.page_size().max(1)
    }

    pub fn page_count(&self) -> usize {
        page_count_for(self.visible_len(), self.page_size())
    }

    pub fn is_loading(&self) -> bool {
        self.pokemon.is_loading() || self.is_refreshing
    }

    pub fn sprite_failed_for(&self, id: u32) -> bool {
        self.sprite_failed.contains(&id)
    }

    pub fn sprite_pending_for(&self, id: u32) -> bool {
        self.sprite_pending.contains(&id)
    }

    /// Ids on the page holding the selection.
    pub fn page_ids(&self) -> Vec<u32> {
        let page_size = self.page_size();
        let start = self.current_page() * page_size;
        self.visible()
            .skip(start)
            .take(page_size)
            .map(|pokemon| pokemon.id)
            .collect()
    }
}

/// Card rows that fit in a grid area of `height` rows.
pub fn grid_rows_for(height: u16) -> usize {
    (height / CARD_HEIGHT).max(1) as usize
}

pub fn page_size_for(rows: usize, columns: u16) -> usize {
    (rows * columns.max(1) as usize).max(1)
}

pub fn page_count_for(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    len.div_ceil(page_size).max(1)
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let status = if self.pokemon.is_loading() {
            "loading".to_string()
        } else if let Some(error) = self.pokemon.error() {
            format!("failed: {error}")
        } else if self.pokemon.is_loaded() {
            "loaded".to_string()
        } else {
            "empty".to_string()
        };
        vec![
            DebugSection::new("Source")
                .entry("endpoint", ron_string(&self.source.endpoint))
                .entry("sprites", ron_string(&self.source.sprite_base_url))
                .entry("cache", ron_string(&self.source.use_cache)),
            DebugSection::new("Dex")
                .entry("status", status)
                .entry("total", ron_string(&self.all_pokemon().len()))
                .entry("filtered", ron_string(&self.visible_len()))
                .entry("selected", ron_string(&self.selected_index))
                .entry(
                    "page",
                    format!("{}/{}", self.current_page() + 1, self.page_count()),
                )
                .entry("refreshing", ron_string(&self.is_refreshing)),
            DebugSection::new("Search")
                .entry("query", ron_string(&self.search.query))
                .entry("focused", ron_string(&self.search.focused))
                .entry(
                    "needle",
                    ron_string(&search::active_needle(&self.search.query)),
                ),
            DebugSection::new("Details")
                .entry("modal", ron_string(&self.modal))
                .entry("sprite_pending", ron_string(&self.sprite_pending))
                .entry("sprites_cached", ron_string(&self.sprites.len()))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
