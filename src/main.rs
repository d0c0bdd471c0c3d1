//! pokegql - Pokemon GraphQL browser

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventContext, Keybindings,
    RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokegql::action::Action;
use pokegql::api;
use pokegql::components::details_modal::modal_rect;
use pokegql::components::{Component, HomeLayout, HomeScreen, HomeScreenProps};
use pokegql::effect::Effect;
use pokegql::logging;
use pokegql::reducer::reducer;
use pokegql::routing::{self, PokeComponentId, PokeContext};
use pokegql::state::{
    ApiSource, AppState, DEFAULT_COLUMNS, DEFAULT_ENDPOINT, DEFAULT_SPRITE_BASE_URL,
    LOADING_TICK_MS,
};

/// Browse Pokemon from a PokeAPI GraphQL endpoint
#[derive(Parser, Debug)]
#[command(name = "pokegql")]
#[command(about = "Searchable Pokemon grid over the PokeAPI GraphQL endpoint")]
struct Args {
    /// GraphQL endpoint to query
    #[arg(long, env = "POKEGQL_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Base URL for `<id>.png` sprites
    #[arg(long, env = "POKEGQL_SPRITE_BASE_URL", default_value = DEFAULT_SPRITE_BASE_URL)]
    sprite_base_url: String,

    /// Cards per grid row
    #[arg(
        long,
        default_value_t = DEFAULT_COLUMNS,
        value_parser = clap::value_parser!(u16).range(1..=8)
    )]
    columns: u16,

    /// Skip the on-disk response cache
    #[arg(long)]
    no_cache: bool,

    /// Write tracing output to this file
    #[arg(long, env = "POKEGQL_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        endpoint,
        sprite_base_url,
        columns,
        no_cache,
        log_file,
        debug: debug_args,
    } = Args::parse();

    logging::init(log_file.as_deref())?;

    let debug = DebugSession::new(debug_args);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let source = ApiSource {
        endpoint,
        sprite_base_url,
        use_cache: !no_cache,
    };
    tracing::info!(endpoint = %source.endpoint, cache = source.use_cache, "starting");

    let mut state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(source, columns))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    state.terminal_size = (size.width, size.height);

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct PokeUi {
    home: Rc<RefCell<HomeScreen>>,
}

impl PokeUi {
    fn new(home: Rc<RefCell<HomeScreen>>) -> Self {
        Self { home }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokeComponentId>,
    ) {
        let layout = HomeLayout::new(area);
        event_ctx.set_component_area(PokeComponentId::Grid, layout.grid);
        event_ctx.set_component_area(PokeComponentId::Search, layout.search);
        if state.modal_pokemon().is_some() {
            event_ctx.set_component_area(PokeComponentId::Details, modal_rect(area));
        } else {
            event_ctx
                .component_areas
                .remove(&PokeComponentId::Details);
        }

        let props = HomeScreenProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.home.borrow_mut().render(frame, area, props);
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let home = Rc::new(RefCell::new(HomeScreen::new()));
    let mut ui = PokeUi::new(Rc::clone(&home));
    let mut bus = routing::event_bus(home);
    let keybindings: Keybindings<PokeContext> = Keybindings::new();

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::FetchPokemon {
            endpoint,
            use_cache,
            refresh,
        } => {
            tracing::debug!(%endpoint, use_cache, refresh, "spawning pokemon fetch");
            ctx.tasks().spawn(TaskKey::new("pokemon"), async move {
                match api::fetch_pokemon(&endpoint, use_cache, refresh).await {
                    Ok(list) => Action::PokemonDidLoad(list),
                    Err(error) => {
                        tracing::warn!(%error, "pokemon fetch failed");
                        Action::PokemonDidError(error.to_string())
                    }
                }
            });
        }
        Effect::LoadSprite { id, url, use_cache } => {
            tracing::debug!(id, %url, "spawning sprite load");
            let key = format!("sprite_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_sprite(&url, use_cache).await {
                    Ok(sprite) => Action::SpriteDidLoad { id, sprite },
                    Err(error) => {
                        tracing::warn!(id, %error, "sprite load failed");
                        Action::SpriteDidError {
                            id,
                            error: error.to_string(),
                        }
                    }
                }
            });
        }
    }
}
