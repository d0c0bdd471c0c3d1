//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::AppState;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init | Action::PokemonFetch => {
            if state.is_loading() {
                return DispatchResult::unchanged();
            }
            let refresh = state.pokemon.is_loaded();
            if refresh {
                state.is_refreshing = true;
            } else {
                state.pokemon = DataResource::Loading;
            }
            state.tick = 0;
            state.message = None;
            DispatchResult::changed_with(Effect::FetchPokemon {
                endpoint: state.source.endpoint.clone(),
                use_cache: state.source.use_cache,
                refresh,
            })
        }

        Action::PokemonDidLoad(list) => {
            state.pokemon = DataResource::Loaded(list);
            state.is_refreshing = false;
            state.message = None;
            state.rebuild_filtered();
            if state.modal.is_some() && state.modal_pokemon().is_none() {
                state.modal = None;
            }
            with_page_sprites(state, true)
        }

        Action::PokemonDidError(error) => {
            if state.is_refreshing && state.pokemon.is_loaded() {
                state.message = Some(format!("Refresh failed: {error}"));
            } else {
                state.pokemon = DataResource::Failed(error);
            }
            state.is_refreshing = false;
            DispatchResult::changed()
        }

        Action::SearchFocus => {
            if state.search.focused || state.modal.is_some() {
                return DispatchResult::unchanged();
            }
            state.search.focused = true;
            DispatchResult::changed()
        }

        Action::SearchBlur => {
            if !state.search.focused {
                return DispatchResult::unchanged();
            }
            state.search.focused = false;
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            if state.search.query == query {
                return DispatchResult::unchanged();
            }
            apply_query(state, query);
            with_page_sprites(state, true)
        }

        Action::SearchSubmit(query) => {
            apply_query(state, query);
            state.search.focused = false;
            with_page_sprites(state, true)
        }

        Action::SearchClear => {
            if state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            apply_query(state, String::new());
            with_page_sprites(state, true)
        }

        Action::SelectionMove(delta) => move_selection(state, delta as isize),

        Action::SelectionPage(delta) => {
            let page = state.page_size() as isize;
            move_selection(state, delta as isize * page)
        }

        Action::SelectionJumpTop => {
            let changed = state.set_selected_index(0);
            with_page_sprites(state, changed)
        }

        Action::SelectionJumpBottom => {
            let last = state.visible_len().saturating_sub(1);
            let changed = state.set_selected_index(last);
            with_page_sprites(state, changed)
        }

        Action::DetailsOpen => {
            let Some(id) = state.selected().map(|pokemon| pokemon.id) else {
                return DispatchResult::unchanged();
            };
            state.modal = Some(id);
            state.search.focused = false;
            match sprite_effect(state, id) {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::changed(),
            }
        }

        Action::DetailsClose => {
            if state.modal.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SpriteDidLoad { id, sprite } => {
            state.sprites.insert(id, sprite);
            state.sprite_pending.retain(|pending| *pending != id);
            DispatchResult::changed()
        }

        // Cards and the modal fall back to a placeholder; the footer stays quiet.
        Action::SpriteDidError { id, .. } => {
            state.sprite_pending.retain(|pending| *pending != id);
            if !state.sprite_failed.contains(&id) {
                state.sprite_failed.push(id);
            }
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            with_page_sprites(state, true)
        }

        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            if !state.is_loading() {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn apply_query(state: &mut AppState, query: String) {
    state.search.query = query;
    state.rebuild_filtered();
    state.selected_index = 0;
}

fn move_selection(state: &mut AppState, delta: isize) -> DispatchResult<Effect> {
    let index = (state.selected_index as isize)
        .saturating_add(delta)
        .max(0) as usize;
    let changed = state.set_selected_index(index);
    with_page_sprites(state, changed)
}

/// Requests thumbnails for the visible page after a change that may move it.
fn with_page_sprites(state: &mut AppState, changed: bool) -> DispatchResult<Effect> {
    if !changed {
        return DispatchResult::unchanged();
    }
    let effects: Vec<Effect> = state
        .page_ids()
        .into_iter()
        .filter_map(|id| sprite_effect(state, id))
        .collect();
    DispatchResult::changed_with_many(effects)
}

fn sprite_effect(state: &mut AppState, id: u32) -> Option<Effect> {
    if state.sprites.contains_key(&id)
        || state.sprite_pending_for(id)
        || state.sprite_failed_for(id)
    {
        return None;
    }
    state.sprite_pending.push(id);
    Some(Effect::LoadSprite {
        id,
        url: state.source.sprite_url(id),
        use_cache: state.source.use_cache,
    })
}
