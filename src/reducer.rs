//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, Screen};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => match (state.screen, state.detail_id) {
            (Screen::Detail, Some(id)) => {
                state.reset_detail(id);
                DispatchResult::changed_with_many(vec![
                    Effect::LoadDetailRecord { id },
                    Effect::LoadDetailSpecies { id },
                ])
            }
            // Detail entry without an id falls back to the catalog.
            _ => {
                state.reset_catalog();
                DispatchResult::changed_with(Effect::LoadRoster {
                    limit: state.roster_limit,
                })
            }
        },

        Action::RosterDidLoad(entries) => {
            state.roster = DataResource::Loaded(entries);
            state.rebuild_filtered();
            state.catalog_items.clear();
            state.selected_index = 0;
            changed_with_effects(entry_load_effects(state))
        }

        Action::RosterDidError(error) => {
            state.message = Some(format!("Roster error: {error}"));
            state.roster = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::CatalogItemDidLoad(record) => {
            // Arrival-order append. Completions from a superseded search
            // pass land here too; the view is never re-sorted.
            let id = record.id;
            state.catalog_items.push(record);
            if state.catalog_items.len() - 1 == state.selected_index {
                if let Some(effect) = sprite_effect(state, id) {
                    return DispatchResult::changed_with(effect);
                }
            }
            DispatchResult::changed()
        }

        Action::CatalogItemDidError { name, error } => {
            state.message = Some(format!("{name} load error: {error}"));
            DispatchResult::changed()
        }

        Action::SearchStart => {
            if state.screen != Screen::Catalog {
                return DispatchResult::unchanged();
            }
            let had_query = !state.search.query.is_empty();
            state.search.active = true;
            state.search.query.clear();
            if had_query {
                return changed_with_effects(refilter(state));
            }
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            let had_query = !state.search.query.is_empty();
            state.search.active = false;
            state.search.query.clear();
            if had_query {
                return changed_with_effects(refilter(state));
            }
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            state.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            changed_with_effects(refilter(state))
        }

        Action::SearchBackspace => {
            state.search.query.pop();
            changed_with_effects(refilter(state))
        }

        Action::SelectionMove(delta) => {
            let index = (state.selected_index as i16 + delta).max(0);
            selection_result(state, index as usize)
        }

        Action::SelectionPage(delta) => {
            let page = list_page_size(state) as i16;
            let index = (state.selected_index as i16 + delta * page).max(0);
            selection_result(state, index as usize)
        }

        Action::CatalogSelect(index) => selection_result(state, index),

        Action::CatalogActivate => {
            let Some(item) = state.selected_item() else {
                return DispatchResult::unchanged();
            };
            let id = item.id;
            state.pending_nav = Some(id);
            DispatchResult::changed_with(Effect::PrefetchEntry { id })
        }

        Action::PrefetchDidLoad { id } => {
            if state.pending_nav != Some(id) {
                return DispatchResult::unchanged();
            }
            state.reset_detail(id);
            DispatchResult::changed_with_many(vec![
                Effect::LoadDetailRecord { id },
                Effect::LoadDetailSpecies { id },
            ])
        }

        Action::PrefetchDidError { id, error } => {
            if state.pending_nav == Some(id) {
                state.pending_nav = None;
            }
            state.message = Some(format!("#{id:03} load error: {error}"));
            DispatchResult::changed()
        }

        Action::DetailDidLoad(record) => {
            if state.screen != Screen::Detail || state.detail_id != Some(record.id) {
                return DispatchResult::unchanged();
            }
            let id = record.id;
            state.detail = DataResource::Loaded(record);
            if let Some(effect) = sprite_effect(state, id) {
                state.sprite_loading = true;
                return DispatchResult::changed_with(effect);
            }
            DispatchResult::changed()
        }

        Action::DetailDidError { id, error } => {
            if state.detail_id != Some(id) {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("#{id:03} load error: {error}"));
            state.detail = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::SpeciesDidLoad { id, species } => {
            if state.screen != Screen::Detail || state.detail_id != Some(id) {
                return DispatchResult::unchanged();
            }
            let chain_url = species.evolution_chain_url.clone();
            state.detail_species = DataResource::Loaded(species);
            match chain_url {
                Some(url) => {
                    state.evolutions = DataResource::Loading;
                    DispatchResult::changed_with(Effect::ResolveEvolutions { id, url })
                }
                None => {
                    state.evolutions = DataResource::Loaded(Vec::new());
                    DispatchResult::changed()
                }
            }
        }

        Action::SpeciesDidError { id, error } => {
            if state.detail_id != Some(id) {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("Species #{id:03} error: {error}"));
            state.detail_species = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::EvolutionsDidResolve { id, line } => {
            if state.detail_id != Some(id) {
                return DispatchResult::unchanged();
            }
            let effects: Vec<Effect> = line
                .iter()
                .filter_map(|record| sprite_effect(state, record.id))
                .collect();
            state.evolutions = DataResource::Loaded(line);
            changed_with_effects(effects)
        }

        Action::EvolutionsDidError { id, error } => {
            if state.detail_id != Some(id) {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("Evolution error: {error}"));
            state.evolutions = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::SpriteDidLoad { id, sprite } => {
            state.sprite_cache.insert(id, sprite);
            if state.detail_id == Some(id) {
                state.sprite_loading = false;
            }
            DispatchResult::changed()
        }

        Action::SpriteDidError { id, error } => {
            if state.detail_id == Some(id) {
                state.sprite_loading = false;
            }
            state.message = Some(format!("Sprite #{id:03} error: {error}"));
            DispatchResult::changed()
        }

        Action::BackToCatalog => {
            if state.screen != Screen::Detail {
                return DispatchResult::unchanged();
            }
            state.reset_catalog();
            DispatchResult::changed_with(Effect::LoadRoster {
                limit: state.roster_limit,
            })
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::unchanged()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn changed_with_effects(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

/// Reapply the prefix filter and re-issue the concurrent fetch set for the
/// matching entries. Runs on every keystroke; fetches already in flight for
/// a previous pass are left running.
fn refilter(state: &mut AppState) -> Vec<Effect> {
    state.rebuild_filtered();
    state.catalog_items.clear();
    state.selected_index = 0;
    entry_load_effects(state)
}

fn entry_load_effects(state: &AppState) -> Vec<Effect> {
    state
        .filtered_entries()
        .into_iter()
        .map(|entry| Effect::LoadEntry { entry })
        .collect()
}

fn selection_result(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    if !state.set_selected_index(index) {
        return DispatchResult::unchanged();
    }
    let effect = state
        .selected_item()
        .map(|item| item.id)
        .and_then(|id| sprite_effect(state, id));
    match effect {
        Some(effect) => DispatchResult::changed_with(effect),
        None => DispatchResult::changed(),
    }
}

fn sprite_effect(state: &AppState, id: u16) -> Option<Effect> {
    (!state.sprite_cache.contains_key(&id)).then_some(Effect::LoadSprite { id })
}

fn list_page_size(state: &AppState) -> usize {
    state.terminal_size.1.saturating_sub(8) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PokemonRecord, RosterEntry, SpeciesRecord};

    fn roster3() -> Vec<RosterEntry> {
        ["bulbasaur", "ivysaur", "venusaur"]
            .iter()
            .enumerate()
            .map(|(idx, name)| RosterEntry {
                name: name.to_string(),
                url: format!("https://pokeapi.co/api/v2/pokemon/{}/", idx + 1),
            })
            .collect()
    }

    fn record(id: u16, name: &str, first_type: &str) -> PokemonRecord {
        PokemonRecord {
            id,
            name: name.to_string(),
            types: vec![first_type.to_string()],
            weight: 69,
            height: 7,
            abilities: vec!["overgrow".to_string()],
        }
    }

    #[test]
    fn test_init_on_catalog_loads_roster() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);
        assert!(result.changed);
        assert!(state.roster.is_loading());
        assert_eq!(result.effects, vec![Effect::LoadRoster { limit: 151 }]);
    }

    #[test]
    fn test_init_on_detail_loads_record_and_species() {
        let mut state = AppState::with_detail(151, 1);
        let result = reducer(&mut state, Action::Init);
        assert_eq!(
            result.effects,
            vec![
                Effect::LoadDetailRecord { id: 1 },
                Effect::LoadDetailSpecies { id: 1 },
            ]
        );
        assert!(state.detail.is_loading());
        assert!(state.detail_species.is_loading());
    }

    #[test]
    fn test_roster_load_fans_out_one_fetch_per_entry() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let result = reducer(&mut state, Action::RosterDidLoad(roster3()));
        assert_eq!(result.effects.len(), 3);
        assert!(result
            .effects
            .iter()
            .all(|effect| matches!(effect, Effect::LoadEntry { .. })));
    }

    #[test]
    fn test_items_append_in_arrival_order() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::RosterDidLoad(roster3()));

        // completions arrive out of roster order and stay that way
        reducer(&mut state, Action::CatalogItemDidLoad(record(3, "venusaur", "grass")));
        reducer(&mut state, Action::CatalogItemDidLoad(record(1, "bulbasaur", "grass")));
        let ids: Vec<u16> = state.catalog_items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_keystroke_refilters_and_refetches() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::RosterDidLoad(roster3()));
        reducer(&mut state, Action::CatalogItemDidLoad(record(1, "bulbasaur", "grass")));
        reducer(&mut state, Action::SearchStart);

        reducer(&mut state, Action::SearchInput('i'));
        let result = reducer(&mut state, Action::SearchInput('v'));

        assert_eq!(state.filtered_indices, vec![1]);
        assert!(state.catalog_items.is_empty());
        assert_eq!(
            result.effects,
            vec![Effect::LoadEntry {
                entry: roster3()[1].clone()
            }]
        );
    }

    #[test]
    fn test_empty_filter_sets_not_found() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::RosterDidLoad(roster3()));
        reducer(&mut state, Action::SearchStart);
        let result = reducer(&mut state, Action::SearchInput('z'));
        assert!(result.effects.is_empty());
        assert!(state.nothing_found());
    }

    #[test]
    fn test_activation_prefetches_before_navigating() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::RosterDidLoad(roster3()));
        reducer(&mut state, Action::CatalogItemDidLoad(record(1, "bulbasaur", "grass")));

        let result = reducer(&mut state, Action::CatalogActivate);
        assert_eq!(result.effects, vec![Effect::PrefetchEntry { id: 1 }]);
        assert_eq!(state.screen, Screen::Catalog);

        let result = reducer(&mut state, Action::PrefetchDidLoad { id: 1 });
        assert_eq!(state.screen, Screen::Detail);
        assert_eq!(state.detail_id, Some(1));
        assert_eq!(result.effects.len(), 2);
    }

    #[test]
    fn test_prefetch_error_blocks_navigation() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::RosterDidLoad(roster3()));
        reducer(&mut state, Action::CatalogItemDidLoad(record(1, "bulbasaur", "grass")));
        reducer(&mut state, Action::CatalogActivate);

        reducer(
            &mut state,
            Action::PrefetchDidError {
                id: 1,
                error: "boom".to_string(),
            },
        );
        assert_eq!(state.screen, Screen::Catalog);
        assert_eq!(state.pending_nav, None);
        assert!(state.message.is_some());
    }

    #[test]
    fn test_species_without_chain_yields_empty_line() {
        let mut state = AppState::with_detail(151, 83);
        reducer(&mut state, Action::Init);
        let result = reducer(
            &mut state,
            Action::SpeciesDidLoad {
                id: 83,
                species: SpeciesRecord {
                    evolution_chain_url: None,
                },
            },
        );
        assert!(result.effects.is_empty());
        assert!(state.evolutions.is_loaded());
        assert!(state.resolved_evolutions().is_empty());
    }

    #[test]
    fn test_species_with_chain_resolves_it() {
        let mut state = AppState::with_detail(151, 1);
        reducer(&mut state, Action::Init);
        let result = reducer(
            &mut state,
            Action::SpeciesDidLoad {
                id: 1,
                species: SpeciesRecord {
                    evolution_chain_url: Some("https://pokeapi.co/api/v2/evolution-chain/1/".into()),
                },
            },
        );
        assert_eq!(
            result.effects,
            vec![Effect::ResolveEvolutions {
                id: 1,
                url: "https://pokeapi.co/api/v2/evolution-chain/1/".into()
            }]
        );
        assert!(state.evolutions.is_loading());
    }

    #[test]
    fn test_detail_error_leaves_placeholder_state() {
        let mut state = AppState::with_detail(151, 1);
        reducer(&mut state, Action::Init);
        reducer(
            &mut state,
            Action::DetailDidError {
                id: 1,
                error: "timeout".to_string(),
            },
        );
        assert!(state.detail.is_failed());
        assert_eq!(state.screen, Screen::Detail);
        assert!(state.message.as_deref().unwrap().contains("timeout"));
    }

    #[test]
    fn test_stale_detail_load_is_ignored() {
        let mut state = AppState::with_detail(151, 1);
        reducer(&mut state, Action::Init);
        let result = reducer(&mut state, Action::DetailDidLoad(record(2, "ivysaur", "grass")));
        assert!(!result.changed);
        assert!(state.detail.is_loading());
    }

    #[test]
    fn test_back_to_catalog_reloads_roster() {
        let mut state = AppState::with_detail(151, 1);
        reducer(&mut state, Action::Init);
        let result = reducer(&mut state, Action::BackToCatalog);
        assert_eq!(state.screen, Screen::Catalog);
        assert_eq!(result.effects, vec![Effect::LoadRoster { limit: 151 }]);
        assert!(state.detail.is_empty());
    }
}
