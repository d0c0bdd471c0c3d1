//! Store flows with EffectStoreTestHarness, driven through the screen where it matters

use pokegql::{
    action::Action,
    components::{Component, HomeScreen, HomeScreenProps},
    effect::Effect,
    reducer::reducer,
    sprite::SpriteData,
    state::{AppState, BaseStat, Pokemon},
};
use tui_dispatch::testing::*;
use tui_dispatch::{DataResource, NumericComponentId};

fn dex() -> Vec<Pokemon> {
    ["bulbasaur", "ivysaur", "venusaur", "charmander", "charmeleon", "charizard"]
        .iter()
        .enumerate()
        .map(|(idx, name)| Pokemon {
            id: idx as u32 + 1,
            name: name.to_string(),
            species: name.to_string(),
            types: vec!["grass".into()],
            stats: vec![BaseStat {
                name: "hp".into(),
                base_stat: 45,
                effort: 0,
            }],
            ..Default::default()
        })
        .collect()
}

fn loaded_state() -> AppState {
    let mut state = AppState {
        pokemon: DataResource::Loaded(dex()),
        ..Default::default()
    };
    state.rebuild_filtered();
    state
}

fn tiny_sprite() -> SpriteData {
    SpriteData {
        width: 1,
        height: 1,
        pixels: vec![255, 0, 0, 255],
    }
}

#[test]
fn test_pokemon_fetch_flow_with_harness() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.pokemon.is_loading());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::FetchPokemon { .. }));

    harness.complete_action(Action::PokemonDidLoad(dex()));
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 1);

    harness.assert_state(|s| s.pokemon.is_loaded());
    harness.assert_state(|s| s.visible_len() == 6);
}

#[test]
fn test_first_load_error_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.drain_effects();
    harness.complete_action(Action::PokemonDidError("HTTP 503".into()));
    harness.process_emitted();

    harness.assert_state(|s| s.pokemon.is_failed());
    harness.assert_state(|s| s.pokemon.error() == Some("HTTP 503"));

    // Retry goes back to loading
    harness.dispatch_collect(Action::PokemonFetch);
    harness.assert_state(|s| s.pokemon.is_loading());
    harness.drain_effects().effects_count(1);
}

#[test]
fn test_refresh_error_keeps_loaded_data() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_collect(Action::PokemonFetch);
    harness.assert_state(|s| s.is_refreshing && s.pokemon.is_loaded());

    harness.complete_action(Action::PokemonDidError("timeout".into()));
    harness.process_emitted();

    harness.assert_state(|s| s.pokemon.is_loaded() && !s.is_refreshing);
    harness.assert_state(|s| s.message.as_deref() == Some("Refresh failed: timeout"));
}

#[test]
fn test_search_typing_through_screen() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);
    let mut screen = HomeScreen::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("/", |state, event| {
        screen
            .handle_event(
                &event.kind,
                HomeScreenProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_first(Action::SearchFocus);
    harness.dispatch_collect(Action::SearchFocus);
    harness.assert_state(|s| s.search.focused);

    // Typing goes to the search input now, not the grid
    for input in ["c", "h", "a", "r"] {
        let actions = harness.send_keys::<NumericComponentId, _, _>(input, |state, event| {
            screen
                .handle_event(
                    &event.kind,
                    HomeScreenProps {
                        state,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect::<Vec<_>>()
        });
        assert!(!actions.is_empty(), "no action for {input:?}");
        for action in actions {
            harness.dispatch_collect(action);
        }
    }

    harness.assert_state(|s| s.search.query == "char");
    harness.assert_state(|s| {
        s.visible().map(|p| p.name.as_str()).collect::<Vec<_>>()
            == ["charmander", "charmeleon", "charizard"]
    });
}

#[test]
fn test_details_flow_loads_sprite_once() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    // Moving on the page requests every card thumbnail on it
    harness.dispatch_collect(Action::SelectionMove(3));
    let effects = harness.drain_effects();
    effects.effects_count(6);
    effects.effects_all_match(|e| matches!(e, Effect::LoadSprite { .. }));

    // The modal reuses the pending card load
    harness.dispatch_collect(Action::DetailsOpen);
    harness.assert_state(|s| s.modal == Some(4));
    harness.assert_state(|s| s.sprite_pending_for(4));
    harness.drain_effects().effects_count(0);

    harness.complete_action(Action::SpriteDidLoad {
        id: 4,
        sprite: tiny_sprite(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.sprites.contains_key(&4) && !s.sprite_pending_for(4));

    harness.dispatch_collect(Action::DetailsClose);
    harness.assert_state(|s| s.modal.is_none());

    // Cached sprite: reopening emits nothing
    harness.dispatch_collect(Action::DetailsOpen);
    harness.assert_state(|s| s.modal == Some(4));
    harness.drain_effects().effects_count(0);
}

#[test]
fn test_sprite_error_is_not_retried() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_collect(Action::DetailsOpen);
    harness.drain_effects();
    harness.complete_action(Action::SpriteDidError {
        id: 1,
        error: "404".into(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.sprite_failed_for(1));
    harness.assert_state(|s| s.message.is_none());

    harness.dispatch_collect(Action::DetailsClose);
    harness.dispatch_collect(Action::DetailsOpen);
    harness.drain_effects().effects_count(0);
}

#[test]
fn test_search_focus_blocked_while_modal_open() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_collect(Action::DetailsOpen);
    harness.dispatch_collect(Action::SearchFocus);
    harness.assert_state(|s| !s.search.focused);
}

#[test]
fn test_reload_drops_vanished_modal() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_collect(Action::SelectionJumpBottom);
    harness.dispatch_collect(Action::DetailsOpen);
    harness.assert_state(|s| s.modal == Some(6));

    let shorter: Vec<Pokemon> = dex().into_iter().take(3).collect();
    harness.dispatch_collect(Action::PokemonDidLoad(shorter));
    harness.assert_state(|s| s.modal.is_none());
    harness.assert_state(|s| s.selected_index < 3);
}
