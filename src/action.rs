//! Actions with automatic category inference and async `DidLoad`/`DidError`
//! completion pairs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;
use crate::state::{PokemonRecord, RosterEntry, SpeciesRecord};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Kick off whichever screen the app was launched on.
    Init,

    // ===== Catalog: roster and per-entry loads =====
    RosterDidLoad(Vec<RosterEntry>),
    RosterDidError(String),
    /// One entry's fetch resolved; appended in arrival order.
    CatalogItemDidLoad(PokemonRecord),
    CatalogItemDidError {
        name: String,
        error: String,
    },

    // ===== Search =====
    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    // ===== Selection and activation =====
    SelectionMove(i16),
    SelectionPage(i16),
    CatalogSelect(usize),
    /// Activate the selected item: prefetch it, navigate on success.
    CatalogActivate,
    PrefetchDidLoad {
        id: u16,
    },
    PrefetchDidError {
        id: u16,
        error: String,
    },

    // ===== Detail flow =====
    DetailDidLoad(PokemonRecord),
    DetailDidError {
        id: u16,
        error: String,
    },
    SpeciesDidLoad {
        id: u16,
        species: SpeciesRecord,
    },
    SpeciesDidError {
        id: u16,
        error: String,
    },
    EvolutionsDidResolve {
        id: u16,
        line: Vec<PokemonRecord>,
    },
    EvolutionsDidError {
        id: u16,
        error: String,
    },
    SpriteDidLoad {
        id: u16,
        sprite: SpriteData,
    },
    SpriteDidError {
        id: u16,
        error: String,
    },
    BackToCatalog,

    // ===== Uncategorized (global) =====
    #[action(category = "ui")]
    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
