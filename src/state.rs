//! Application state - single source of truth

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::sprite::SpriteData;

pub const DEFAULT_ROSTER_LIMIT: u16 = 151;

/// Which of the two screens is active. Each screen starts fresh on entry;
/// nothing carries over when navigating between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Screen {
    Catalog,
    Detail,
}

/// One entry of the roster listing (`/pokemon?limit=N`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RosterEntry {
    pub name: String,
    pub url: String,
}

/// A full Pokemon record with the wire wrappers flattened to name lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonRecord {
    pub id: u16,
    pub name: String,
    pub types: Vec<String>,
    /// Tenths of a kilogram, as served by the API.
    pub weight: u16,
    /// Tenths of a meter, as served by the API.
    pub height: u16,
    pub abilities: Vec<String>,
}

impl PokemonRecord {
    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    pub fn dex_number(&self) -> String {
        format!("#{:03}", self.id)
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    pub fn weight_display(&self) -> String {
        format!("Weight: {}", format_measure(self.weight, "kg"))
    }

    pub fn height_display(&self) -> String {
        format!("Height: {}", format_measure(self.height, "m"))
    }

    pub fn abilities_display(&self) -> String {
        format!("Abilities: {}", self.abilities.join(", "))
    }
}

/// Species record; only the evolution chain reference matters here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeciesRecord {
    pub evolution_chain_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

/// Capitalize the way the detail header wants it: first letter upper,
/// the rest lower.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Render a tenths-unit API value as a decimal with unit suffix. Whole
/// values drop the fraction (69 -> "6.9 kg", 70 -> "7 kg").
pub fn format_measure(raw: u16, unit: &str) -> String {
    if raw % 10 == 0 {
        format!("{} {unit}", raw / 10)
    } else {
        format!("{}.{} {unit}", raw / 10, raw % 10)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub screen: Screen,
    pub roster_limit: u16,

    // Catalog flow
    pub roster: DataResource<Vec<RosterEntry>>,
    pub filtered_indices: Vec<usize>,
    /// Loaded catalog items in arrival order. Per-entry fetches complete
    /// independently, so this order need not match the roster order.
    pub catalog_items: Vec<PokemonRecord>,
    pub selected_index: usize,
    pub search: SearchState,
    /// Entry id whose activation prefetch is in flight; navigation to the
    /// detail screen happens only when that prefetch succeeds.
    pub pending_nav: Option<u16>,

    // Detail flow
    pub detail_id: Option<u16>,
    pub detail: DataResource<PokemonRecord>,
    pub detail_species: DataResource<SpeciesRecord>,
    pub evolutions: DataResource<Vec<PokemonRecord>>,

    pub sprite_cache: HashMap<u16, SpriteData>,
    pub sprite_loading: bool,
    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_ROSTER_LIMIT)
    }
}

impl AppState {
    pub fn new(roster_limit: u16) -> Self {
        Self {
            terminal_size: (80, 24),
            screen: Screen::Catalog,
            roster_limit,
            roster: DataResource::Empty,
            filtered_indices: Vec::new(),
            catalog_items: Vec::new(),
            selected_index: 0,
            search: SearchState::default(),
            pending_nav: None,
            detail_id: None,
            detail: DataResource::Empty,
            detail_species: DataResource::Empty,
            evolutions: DataResource::Empty,
            sprite_cache: HashMap::new(),
            sprite_loading: false,
            message: None,
            tick: 0,
        }
    }

    /// State for a launch that lands directly on the detail screen.
    pub fn with_detail(roster_limit: u16, id: u16) -> Self {
        let mut state = Self::new(roster_limit);
        state.screen = Screen::Detail;
        state.detail_id = Some(id);
        state
    }

    pub fn roster_entries(&self) -> &[RosterEntry] {
        self.roster.data().map(Vec::as_slice).unwrap_or_default()
    }

    /// Entries matching the current search term, in roster order.
    pub fn filtered_entries(&self) -> Vec<RosterEntry> {
        let entries = self.roster_entries();
        self.filtered_indices
            .iter()
            .filter_map(|idx| entries.get(*idx))
            .cloned()
            .collect()
    }

    /// Recompute the filtered set: case-insensitive prefix match on the
    /// entry name. An empty term keeps the full roster.
    pub fn rebuild_filtered(&mut self) {
        let term = self.search.query.to_lowercase();
        self.filtered_indices = self
            .roster_entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.name.to_lowercase().starts_with(&term))
            .map(|(idx, _)| idx)
            .collect();
    }

    /// The "not found" indicator is driven purely by filter emptiness.
    pub fn nothing_found(&self) -> bool {
        self.roster.is_loaded() && self.filtered_indices.is_empty()
    }

    pub fn selected_item(&self) -> Option<&PokemonRecord> {
        self.catalog_items.get(self.selected_index)
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.catalog_items.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.catalog_items.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    /// Reset to a fresh catalog screen, as if the list page had just been
    /// loaded. Everything from a previous visit is discarded.
    pub fn reset_catalog(&mut self) {
        self.screen = Screen::Catalog;
        self.roster = DataResource::Loading;
        self.filtered_indices.clear();
        self.catalog_items.clear();
        self.selected_index = 0;
        self.search = SearchState::default();
        self.pending_nav = None;
        self.detail_id = None;
        self.detail = DataResource::Empty;
        self.detail_species = DataResource::Empty;
        self.evolutions = DataResource::Empty;
        self.sprite_cache.clear();
        self.sprite_loading = false;
        self.message = None;
    }

    /// Reset to a fresh detail screen for the given id.
    pub fn reset_detail(&mut self, id: u16) {
        self.screen = Screen::Detail;
        self.detail_id = Some(id);
        self.detail = DataResource::Loading;
        self.detail_species = DataResource::Loading;
        self.evolutions = DataResource::Empty;
        self.catalog_items.clear();
        self.filtered_indices.clear();
        self.selected_index = 0;
        self.search = SearchState::default();
        self.pending_nav = None;
        self.sprite_cache.clear();
        self.sprite_loading = false;
        self.message = None;
    }

    pub fn detail_record(&self) -> Option<&PokemonRecord> {
        self.detail.data()
    }

    /// Resolved evolution line, or an empty slice while unresolved. The
    /// evolution section is rendered only when this is non-empty.
    pub fn resolved_evolutions(&self) -> &[PokemonRecord] {
        self.evolutions.data().map(Vec::as_slice).unwrap_or_default()
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Screen")
                .entry("screen", ron_string(&self.screen))
                .entry("message", ron_string(&self.message)),
            DebugSection::new("Catalog")
                .entry("roster", ron_string(&self.roster_entries().len()))
                .entry("filtered", ron_string(&self.filtered_indices.len()))
                .entry("loaded", ron_string(&self.catalog_items.len()))
                .entry("selected", ron_string(&self.selected_index))
                .entry("search", ron_string(&self.search.query))
                .entry("pending_nav", ron_string(&self.pending_nav)),
            DebugSection::new("Detail")
                .entry("id", ron_string(&self.detail_id))
                .entry("record", ron_string(&self.detail.is_loaded()))
                .entry("species", ron_string(&self.detail_species.is_loaded()))
                .entry("evolutions", ron_string(&self.resolved_evolutions().len())),
        ]
    }
}
