//! Event routing: component ids, focus rules and the bus wiring.
//!
//! The modal owns focus while open, then the search input, then the grid.
//! Global handlers run last and only see events no component consumed.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyModifiers};
use tui_dispatch::{EventBus, EventKind, EventRoutingState, HandlerResponse};

use crate::action::Action;
use crate::components::HomeScreen;
use crate::state::AppState;

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PokeComponentId {
    Grid,
    Search,
    Details,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokeContext {
    Grid,
    Search,
    Details,
}

pub type PokeEventBus = EventBus<AppState, Action, PokeComponentId, PokeContext>;

impl EventRoutingState<PokeComponentId, PokeContext> for AppState {
    fn focused(&self) -> Option<PokeComponentId> {
        if self.modal_pokemon().is_some() {
            Some(PokeComponentId::Details)
        } else if self.search.focused {
            Some(PokeComponentId::Search)
        } else {
            Some(PokeComponentId::Grid)
        }
    }

    fn modal(&self) -> Option<PokeComponentId> {
        self.modal_pokemon().map(|_| PokeComponentId::Details)
    }

    fn binding_context(&self, id: PokeComponentId) -> PokeContext {
        match id {
            PokeComponentId::Grid => PokeContext::Grid,
            PokeComponentId::Search => PokeContext::Search,
            PokeComponentId::Details => PokeContext::Details,
        }
    }

    fn default_context(&self) -> PokeContext {
        PokeContext::Grid
    }
}

/// Ctrl-C anywhere; `q` only from the grid.
pub fn is_quit_key(kind: &EventKind, state: &AppState) -> bool {
    let EventKind::Key(key) = kind else {
        return false;
    };
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    key.code == KeyCode::Char('q') && !state.search.focused && state.modal_pokemon().is_none()
}

/// Bus with one handler per region of `home` plus the global resize and quit handler.
pub fn event_bus(home: Rc<RefCell<HomeScreen>>) -> PokeEventBus {
    let mut bus = PokeEventBus::new();

    let grid = Rc::clone(&home);
    bus.register(PokeComponentId::Grid, move |event, state| {
        grid.borrow_mut().handle_grid_event(&event.kind, state)
    });

    let search = Rc::clone(&home);
    bus.register(PokeComponentId::Search, move |event, state| {
        search.borrow_mut().handle_search_event(&event.kind, state)
    });

    let details = home;
    bus.register(PokeComponentId::Details, move |event, state| {
        details.borrow_mut().handle_details_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        ref kind if is_quit_key(kind, state) => HandlerResponse::action(Action::Quit),
        _ => HandlerResponse::ignored(),
    });

    bus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn press(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_q_quits_only_from_grid() {
        let mut state = AppState::default();
        assert!(is_quit_key(&press(KeyCode::Char('q')), &state));
        state.search.focused = true;
        assert!(!is_quit_key(&press(KeyCode::Char('q')), &state));
        assert!(!is_quit_key(&EventKind::Resize(80, 24), &state));
    }

    #[test]
    fn test_focus_order() {
        let mut state = AppState::default();
        assert_eq!(state.focused(), Some(PokeComponentId::Grid));
        state.search.focused = true;
        assert_eq!(state.focused(), Some(PokeComponentId::Search));
        // No record behind the id: the modal does not take focus.
        state.modal = Some(1);
        assert_eq!(state.modal(), None);
    }
}
