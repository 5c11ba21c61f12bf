//! Render tests through the harness render_plain helper

use tui_dispatch::testing::*;
use tui_dispatch::DataResource;

use pokedex::{
    action::Action,
    reducer::reducer,
    state::{AppState, PokemonRecord, RosterEntry},
    ui::DexUi,
};

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

fn bulbasaur() -> PokemonRecord {
    PokemonRecord {
        id: 1,
        name: "bulbasaur".into(),
        types: vec!["grass".into(), "poison".into()],
        weight: 69,
        height: 7,
        abilities: vec!["overgrow".into(), "chlorophyll".into()],
    }
}

#[test]
fn test_render_catalog_lists_loaded_items() {
    let mut harness = EffectStoreTestHarness::new(AppState::new(3), reducer);
    let mut ui = DexUi::new();

    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::RosterDidLoad(roster3()));
    harness.dispatch_collect(Action::CatalogItemDidLoad(bulbasaur()));

    let output = harness.render_plain(90, 24, |frame, area, state| {
        ui.render(frame, area, state);
    });

    assert!(output.contains("POKEDEX"), "header missing:\n{}", output);
    assert!(output.contains("#001"), "dex number missing:\n{}", output);
    assert!(output.contains("bulbasaur"), "name missing:\n{}", output);
}

#[test]
fn test_render_catalog_loading_placeholder() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let mut ui = DexUi::new();

    harness.dispatch_collect(Action::Init);
    let output = harness.render_plain(90, 24, |frame, area, state| {
        ui.render(frame, area, state);
    });

    assert!(
        output.contains("Loading roster..."),
        "loading placeholder missing:\n{}",
        output
    );
}

#[test]
fn test_render_not_found_indicator() {
    let mut harness = EffectStoreTestHarness::new(AppState::new(3), reducer);
    let mut ui = DexUi::new();

    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::RosterDidLoad(roster3()));
    harness.dispatch_collect(Action::SearchStart);
    harness.dispatch_collect(Action::SearchInput('z'));

    let output = harness.render_plain(90, 24, |frame, area, state| {
        ui.render(frame, area, state);
    });

    assert!(
        output.contains("No Pokemon found."),
        "indicator missing:\n{}",
        output
    );

    // backing the term off hides it again
    harness.dispatch_collect(Action::SearchBackspace);
    let output = harness.render_plain(90, 24, |frame, area, state| {
        ui.render(frame, area, state);
    });
    assert!(!output.contains("No Pokemon found."));
}

#[test]
fn test_render_detail_profile_fields() {
    let mut harness = EffectStoreTestHarness::new(AppState::with_detail(151, 1), reducer);
    let mut ui = DexUi::new();

    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::DetailDidLoad(bulbasaur()));

    let output = harness.render_plain(100, 30, |frame, area, state| {
        ui.render(frame, area, state);
    });

    assert!(output.contains("Bulbasaur #001"), "heading missing:\n{}", output);
    assert!(output.contains("Weight: 6.9 kg"), "weight missing:\n{}", output);
    assert!(output.contains("Height: 0.7 m"), "height missing:\n{}", output);
    assert!(
        output.contains("Abilities: overgrow, chlorophyll"),
        "abilities missing:\n{}",
        output
    );
}

#[test]
fn test_render_detail_hides_empty_evolution_section() {
    let mut harness = EffectStoreTestHarness::new(AppState::with_detail(151, 83), reducer);
    let mut ui = DexUi::new();

    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::DetailDidLoad(PokemonRecord {
        id: 83,
        name: "farfetchd".into(),
        types: vec!["normal".into(), "flying".into()],
        weight: 150,
        height: 8,
        abilities: vec!["keen-eye".into()],
    }));

    let output = harness.render_plain(100, 30, |frame, area, state| {
        ui.render(frame, area, state);
    });

    assert!(!output.contains("EVOLUTIONS"), "section should be hidden:\n{}", output);
    assert!(output.contains("Weight: 15 kg"));
}

#[test]
fn test_render_detail_shows_resolved_evolutions() {
    let mut harness = EffectStoreTestHarness::new(AppState::with_detail(151, 1), reducer);
    let mut ui = DexUi::new();

    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::DetailDidLoad(bulbasaur()));
    harness.dispatch_collect(Action::EvolutionsDidResolve {
        id: 1,
        line: vec![
            PokemonRecord {
                id: 2,
                name: "ivysaur".into(),
                types: vec!["grass".into()],
                weight: 130,
                height: 10,
                abilities: vec!["overgrow".into()],
            },
            PokemonRecord {
                id: 3,
                name: "venusaur".into(),
                types: vec!["grass".into()],
                weight: 1000,
                height: 20,
                abilities: vec!["overgrow".into()],
            },
        ],
    });

    let output = harness.render_plain(100, 30, |frame, area, state| {
        ui.render(frame, area, state);
    });

    assert!(output.contains("EVOLUTIONS"), "section missing:\n{}", output);
    assert!(output.contains("#002 Ivysaur"), "first form missing:\n{}", output);
    assert!(output.contains("#003 Venusaur"), "second form missing:\n{}", output);
}

#[test]
fn test_render_changes_with_search_query() {
    let mut harness = EffectStoreTestHarness::new(AppState::new(3), reducer);
    let mut ui = DexUi::new();

    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::RosterDidLoad(roster3()));

    let before = harness.render_plain(90, 24, |frame, area, state| {
        ui.render(frame, area, state);
    });

    harness.dispatch_collect(Action::SearchStart);
    harness.dispatch_collect(Action::SearchInput('i'));
    harness.dispatch_collect(Action::SearchInput('v'));

    let after = harness.render_plain(90, 24, |frame, area, state| {
        ui.render(frame, area, state);
    });

    assert_ne!(before, after, "query should be reflected in the header");
    assert!(after.contains("/iv_"), "active query missing:\n{}", after);
}

#[test]
fn test_render_sprite_cells_for_selected_preview() {
    let mut harness = EffectStoreTestHarness::new(AppState::new(3), reducer);
    let mut ui = DexUi::new();

    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::RosterDidLoad(roster3()));
    harness.dispatch_collect(Action::CatalogItemDidLoad(bulbasaur()));
    harness.dispatch_collect(Action::SpriteDidLoad {
        id: 1,
        sprite: pokedex::sprite::SpriteData {
            width: 2,
            height: 2,
            pixels: vec![255; 2 * 2 * 4],
        },
    });

    let output = harness.render_plain(90, 24, |frame, area, state| {
        ui.render(frame, area, state);
    });

    assert!(output.contains('▀'), "half-block cells missing:\n{}", output);
    assert!(!output.contains("[loading sprite]"));
}

// DataResource used directly to exercise the unused-roster placeholder path
#[test]
fn test_render_empty_state_before_init() {
    let mut state = AppState::default();
    state.roster = DataResource::Empty;
    let mut harness = EffectStoreTestHarness::new(state, reducer);
    let mut ui = DexUi::new();

    let output = harness.render_plain(90, 24, |frame, area, state| {
        ui.render(frame, area, state);
    });
    assert!(output.contains("Loading entries..."));
}
