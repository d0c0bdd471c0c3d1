//! Pokemon GraphQL browser - tui-dispatch TUI
//!
//! Fetches the Pokemon list from a PokeAPI-compatible GraphQL endpoint and
//! shows it as a searchable, paginated grid with a details modal.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod logging;
pub mod reducer;
pub mod routing;
pub mod search;
pub mod sprite;
pub mod state;
