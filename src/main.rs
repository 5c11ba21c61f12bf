//! Pokedex TUI entry point

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api;
use pokedex::effect::Effect;
use pokedex::reducer::reducer;
use pokedex::sprite;
use pokedex::state::{AppState, Screen, DEFAULT_ROSTER_LIMIT};
use pokedex::ui::DexUi;

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Catalog and detail browser for PokeAPI")]
struct Args {
    /// Open the detail screen for this Pokemon id directly
    #[arg(long)]
    id: Option<u16>,

    /// Roster size fetched for the catalog screen
    #[arg(long, default_value_t = DEFAULT_ROSTER_LIMIT)]
    limit: u16,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DexComponentId {
    List,
    Search,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DexContext {
    List,
    Search,
    Detail,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if self.search.active {
            return Some(DexComponentId::Search);
        }
        match self.screen {
            Screen::Catalog => Some(DexComponentId::List),
            Screen::Detail => Some(DexComponentId::Detail),
        }
    }

    fn modal(&self) -> Option<DexComponentId> {
        if self.search.active {
            Some(DexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DexComponentId) -> DexContext {
        match id {
            DexComponentId::List => DexContext::List,
            DexComponentId::Search => DexContext::Search,
            DexComponentId::Detail => DexContext::Detail,
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::List
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        id,
        limit,
        debug: debug_args,
    } = Args::parse();

    let debug = DebugSession::new(debug_args);
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(match id {
                Some(id) => AppState::with_detail(limit, id),
                None => AppState::new(limit),
            })
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

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
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
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
    let ui = Rc::new(RefCell::new(DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(DexComponentId::List, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(DexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(DexComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Char('q') if !state.search.active => {
                HandlerResponse::action(Action::Quit)
            }
            crossterm::event::KeyCode::Char('/')
                if state.screen == Screen::Catalog && !state.search.active =>
            {
                HandlerResponse::action(Action::SearchStart)
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

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
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(250), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, _render_ctx, event_ctx| {
                let areas = ui.borrow_mut().render(frame, area, state);
                match state.screen {
                    Screen::Catalog => {
                        event_ctx.set_component_area(DexComponentId::List, areas.list);
                        event_ctx.component_areas.remove(&DexComponentId::Detail);
                    }
                    Screen::Detail => {
                        event_ctx.set_component_area(DexComponentId::Detail, areas.detail);
                        event_ctx.component_areas.remove(&DexComponentId::List);
                    }
                }
                if state.search.active {
                    event_ctx.set_component_area(DexComponentId::Search, areas.search);
                } else {
                    event_ctx.component_areas.remove(&DexComponentId::Search);
                }
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks; every completion comes back as an
/// action. Task keys are per entry, so a superseded search pass never
/// cancels another entry's fetch.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadRoster { limit } => {
            ctx.tasks().spawn(TaskKey::new("roster"), async move {
                match api::fetch_roster(limit).await {
                    Ok(entries) => Action::RosterDidLoad(entries),
                    Err(error) => Action::RosterDidError(error.to_string()),
                }
            });
        }
        Effect::LoadEntry { entry } => {
            let key = format!("entry_{}", entry.name);
            match api::id_from_url(&entry.url) {
                Some(id) => {
                    let name = entry.name;
                    ctx.tasks().spawn(TaskKey::new(key), async move {
                        match api::fetch_entry(id).await {
                            Ok(record) => Action::CatalogItemDidLoad(record),
                            Err(error) => Action::CatalogItemDidError {
                                name,
                                error: error.to_string(),
                            },
                        }
                    });
                }
                None => {
                    let error = api::ApiError::BadEntryUrl(entry.url).to_string();
                    ctx.tasks().spawn(TaskKey::new(key), async move {
                        Action::CatalogItemDidError {
                            name: entry.name,
                            error,
                        }
                    });
                }
            }
        }
        Effect::PrefetchEntry { id } => {
            let key = format!("prefetch_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_entry(id).await {
                    Ok(_) => Action::PrefetchDidLoad { id },
                    Err(error) => Action::PrefetchDidError {
                        id,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadDetailRecord { id } => {
            let key = format!("pokemon_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_pokemon(&id.to_string()).await {
                    Ok(record) => Action::DetailDidLoad(record),
                    Err(error) => Action::DetailDidError {
                        id,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadDetailSpecies { id } => {
            let key = format!("species_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_species(id).await {
                    Ok(species) => Action::SpeciesDidLoad { id, species },
                    Err(error) => Action::SpeciesDidError {
                        id,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::ResolveEvolutions { id, url } => {
            let key = format!("evolution_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::resolve_evolution_line(&url).await {
                    Ok(line) => Action::EvolutionsDidResolve { id, line },
                    Err(error) => Action::EvolutionsDidError {
                        id,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadSprite { id } => {
            let key = format!("sprite_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_bytes(&api::sprite_url(id)).await {
                    Ok(bytes) => match sprite::decode_sprite(&bytes) {
                        Ok(sprite) => Action::SpriteDidLoad { id, sprite },
                        Err(error) => Action::SpriteDidError { id, error },
                    },
                    Err(error) => Action::SpriteDidError {
                        id,
                        error: error.to_string(),
                    },
                }
            });
        }
    }
}
