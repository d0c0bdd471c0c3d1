//! Key routing through the real EventBus wiring

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pokegql::{
    action::Action,
    components::HomeScreen,
    routing::{self, PokeContext},
    state::{AppState, Pokemon},
};
use tui_dispatch::{DataResource, EventKind, Keybindings};

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

fn ctrl_c() -> EventKind {
    EventKind::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
}

fn press(c: char) -> EventKind {
    EventKind::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn route(state: &AppState, event: &EventKind) -> Vec<Action> {
    let mut bus = routing::event_bus(Rc::new(RefCell::new(HomeScreen::new())));
    let keybindings: Keybindings<PokeContext> = Keybindings::new();
    bus.handle_event(event, state, &keybindings).actions
}

#[test]
fn test_ctrl_c_quits_from_every_focus() {
    let grid = loaded_state();

    let mut searching = loaded_state();
    searching.search.focused = true;
    searching.search.query = "bul".into();

    let mut details = loaded_state();
    details.modal = Some(2);

    for (label, state) in [("grid", grid), ("search", searching), ("details", details)] {
        let actions = route(&state, &ctrl_c());
        assert_eq!(actions, vec![Action::Quit], "ctrl-c in {label}");
    }
}

#[test]
fn test_plain_c_still_clears_and_types() {
    let mut state = loaded_state();
    state.search.query = "ivy".into();
    assert_eq!(route(&state, &press('c')), vec![Action::SearchClear]);

    state.search.query.clear();
    state.search.focused = true;
    let actions = route(&state, &press('c'));
    assert!(actions.contains(&Action::SearchQueryChange("c".into())));
    assert!(!actions.contains(&Action::Quit));
}

#[test]
fn test_q_quits_only_from_grid() {
    let mut state = loaded_state();
    assert_eq!(route(&state, &press('q')), vec![Action::Quit]);

    state.modal = Some(1);
    assert_eq!(route(&state, &press('q')), vec![Action::DetailsClose]);

    state.modal = None;
    state.search.focused = true;
    assert!(!route(&state, &press('q')).contains(&Action::Quit));
}

#[test]
fn test_resize_reaches_global_handler_under_modal() {
    let mut state = loaded_state();
    state.modal = Some(1);
    let actions = route(&state, &EventKind::Resize(100, 40));
    assert_eq!(actions, vec![Action::UiTerminalResize(100, 40)]);
}
