//! PokeAPI client
//!
//! Thin typed layer over the public REST API. Every function fetches fresh;
//! nothing is cached between requests.

use std::sync::OnceLock;

use serde::Deserialize;

use crate::state::{PokemonRecord, RosterEntry, SpeciesRecord};

const API_BASE: &str = "https://pokeapi.co/api/v2";
const SPRITE_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

#[derive(Clone, Debug, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct RosterResponse {
    results: Vec<RosterEntryResponse>,
}

#[derive(Clone, Debug, Deserialize)]
struct RosterEntryResponse {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    types: Vec<PokemonTypeSlot>,
    weight: u16,
    height: u16,
    abilities: Vec<PokemonAbilitySlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct EvolutionChainResponse {
    chain: ChainNode,
}

/// One node of the evolution tree. A node with empty `evolves_to` is a
/// terminal form.
#[derive(Clone, Debug, Deserialize)]
pub struct ChainNode {
    pub species: NamedResource,
    pub evolves_to: Vec<ChainNode>,
}

/// Client error type
#[derive(Debug)]
pub enum ApiError {
    Request(reqwest::Error),
    BadEntryUrl(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Request(e) => write!(f, "request failed: {}", e),
            ApiError::BadEntryUrl(url) => write!(f, "no numeric id in entry url: {}", url),
        }
    }
}

impl std::error::Error for ApiError {}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(ApiError::Request)?;
    let response = response.error_for_status().map_err(ApiError::Request)?;
    response.json().await.map_err(ApiError::Request)
}

/// Fetch the fixed-size roster listing.
pub async fn fetch_roster(limit: u16) -> Result<Vec<RosterEntry>, ApiError> {
    let url = format!("{API_BASE}/pokemon?limit={limit}");
    let response: RosterResponse = fetch_json(&url).await?;
    Ok(response
        .results
        .into_iter()
        .map(|entry| RosterEntry {
            name: entry.name,
            url: entry.url,
        })
        .collect())
}

/// Fetch one full record by numeric id or species name.
pub async fn fetch_pokemon(key: &str) -> Result<PokemonRecord, ApiError> {
    let url = format!("{API_BASE}/pokemon/{key}");
    let response: PokemonResponse = fetch_json(&url).await?;
    Ok(PokemonRecord {
        id: response.id,
        name: response.name,
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        weight: response.weight,
        height: response.height,
        abilities: response
            .abilities
            .into_iter()
            .map(|slot| slot.ability.name)
            .collect(),
    })
}

/// Resolve a species name to its numeric id.
pub async fn lookup_pokemon_id(name: &str) -> Result<u16, ApiError> {
    fetch_pokemon(name).await.map(|record| record.id)
}

pub async fn fetch_species(id: u16) -> Result<SpeciesRecord, ApiError> {
    let url = format!("{API_BASE}/pokemon-species/{id}");
    let response: SpeciesResponse = fetch_json(&url).await?;
    Ok(SpeciesRecord {
        evolution_chain_url: response.evolution_chain.map(|chain| chain.url),
    })
}

/// The shared entry fetch: record and species together. The species half is
/// a byproduct that catalog callers discard.
pub async fn fetch_entry(id: u16) -> Result<PokemonRecord, ApiError> {
    let id_string = id.to_string();
    let (record, _species) =
        tokio::try_join!(fetch_pokemon(&id_string), fetch_species(id))?;
    Ok(record)
}

/// Raw asset fetch, used for sprite images.
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ApiError> {
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(ApiError::Request)?;
    let response = response.error_for_status().map_err(ApiError::Request)?;
    let bytes = response.bytes().await.map_err(ApiError::Request)?;
    Ok(bytes.to_vec())
}

pub async fn fetch_evolution_chain(url: &str) -> Result<ChainNode, ApiError> {
    let response: EvolutionChainResponse = fetch_json(url).await?;
    Ok(response.chain)
}

/// Forward-only, single-branch walk of the evolution tree: from the root,
/// follow only the first child of each node and collect its species name.
/// Siblings beyond the first are ignored at every level; the base form is
/// excluded. This is a deliberate policy, not an accident of traversal.
pub fn first_child_line(root: &ChainNode) -> Vec<String> {
    let mut names = Vec::new();
    let mut node = root;
    while let Some(next) = node.evolves_to.first() {
        names.push(next.species.name.clone());
        node = next;
    }
    names
}

/// Resolve the evolution line behind a chain url to full records: each name
/// goes through the id lookup, then a record fetch by that id, in order.
pub async fn resolve_evolution_line(url: &str) -> Result<Vec<PokemonRecord>, ApiError> {
    let chain = fetch_evolution_chain(url).await?;
    let mut resolved = Vec::new();
    for name in first_child_line(&chain) {
        let id = lookup_pokemon_id(&name).await?;
        resolved.push(fetch_pokemon(&id.to_string()).await?);
    }
    Ok(resolved)
}

/// Numeric id from the trailing path segment of a roster entry url.
pub fn id_from_url(url: &str) -> Option<u16> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

/// Flat PNG sprite, used for list previews and the detail render.
pub fn sprite_url(id: u16) -> String {
    format!("{SPRITE_BASE}/{id}.png")
}

/// Dream-world vector artwork, surfaced as a profile line on the detail
/// screen.
pub fn artwork_url(id: u16) -> String {
    format!("{SPRITE_BASE}/other/dream-world/{id}.svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, children: Vec<ChainNode>) -> ChainNode {
        ChainNode {
            species: NamedResource {
                name: name.to_string(),
            },
            evolves_to: children,
        }
    }

    #[test]
    fn test_id_from_url() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/4/"), Some(4));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/151"), Some(151));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/abc/"), None);
        assert_eq!(id_from_url(""), None);
    }

    #[test]
    fn test_first_child_line_follows_one_branch() {
        // eevee has many branches; only the first listed is walked
        let chain = node(
            "eevee",
            vec![
                node("vaporeon", vec![]),
                node("jolteon", vec![]),
                node("flareon", vec![]),
            ],
        );
        assert_eq!(first_child_line(&chain), vec!["vaporeon"]);
    }

    #[test]
    fn test_first_child_line_ignores_branches_transitively() {
        let chain = node(
            "base",
            vec![
                node("mid-a", vec![node("final-a", vec![]), node("final-b", vec![])]),
                node("mid-b", vec![]),
            ],
        );
        assert_eq!(first_child_line(&chain), vec!["mid-a", "final-a"]);
    }

    #[test]
    fn test_first_child_line_excludes_root_and_handles_terminal() {
        let chain = node("tauros", vec![]);
        assert!(first_child_line(&chain).is_empty());

        let chain = node("bulbasaur", vec![node("ivysaur", vec![node("venusaur", vec![])])]);
        assert_eq!(first_child_line(&chain), vec!["ivysaur", "venusaur"]);
    }

    #[test]
    fn test_sprite_url_templates() {
        assert_eq!(
            sprite_url(25),
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png"
        );
        assert_eq!(
            artwork_url(25),
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/dream-world/25.svg"
        );
    }
}
