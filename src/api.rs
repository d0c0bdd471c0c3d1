//! PokeAPI GraphQL client

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::sprite::{self, SpriteData};
use crate::state::{BaseStat, Pokemon};

pub const OPERATION_NAME: &str = "GetPokemonDataQuery";

pub const POKEMON_QUERY: &str = r#"
query GetPokemonDataQuery {
    pokemon_v2_pokemon(order_by: {id: asc}) {
        id
        name
        height
        weight
        pokemon_v2_pokemonspecy {
            name
        }
        pokemon_v2_pokemontypes {
            pokemon_v2_type {
                name
            }
        }
        pokemon_v2_pokemonabilities {
            pokemon_v2_ability {
                name
            }
        }
        pokemon_v2_pokemonstats {
            base_stat
            effort
            pokemon_v2_stat {
                name
            }
        }
    }
}
"#;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("query failed: {}", .0.join("; "))]
    GraphQl(Vec<String>),
    #[error("response carried no data")]
    NoData,
    #[error("sprite decode failed: {0}")]
    Sprite(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
    query: &'a str,
    operation_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PokemonData {
    pokemon_v2_pokemon: Vec<PokemonRow>,
}

#[derive(Debug, Deserialize)]
struct NameRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PokemonRow {
    id: u32,
    name: String,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    weight: Option<u32>,
    pokemon_v2_pokemonspecy: Option<NameRef>,
    #[serde(default)]
    pokemon_v2_pokemontypes: Vec<TypeSlot>,
    #[serde(default)]
    pokemon_v2_pokemonabilities: Vec<AbilitySlot>,
    #[serde(default)]
    pokemon_v2_pokemonstats: Vec<StatSlot>,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    pokemon_v2_type: Option<NameRef>,
}

#[derive(Debug, Deserialize)]
struct AbilitySlot {
    pokemon_v2_ability: Option<NameRef>,
}

#[derive(Debug, Deserialize)]
struct StatSlot {
    base_stat: u32,
    effort: u32,
    pokemon_v2_stat: Option<NameRef>,
}

impl From<PokemonRow> for Pokemon {
    fn from(row: PokemonRow) -> Self {
        Pokemon {
            id: row.id,
            name: row.name,
            height: row.height.unwrap_or_default(),
            weight: row.weight.unwrap_or_default(),
            species: row
                .pokemon_v2_pokemonspecy
                .map(|species| species.name)
                .unwrap_or_default(),
            types: row
                .pokemon_v2_pokemontypes
                .into_iter()
                .filter_map(|slot| slot.pokemon_v2_type)
                .map(|kind| kind.name)
                .collect(),
            abilities: row
                .pokemon_v2_pokemonabilities
                .into_iter()
                .filter_map(|slot| slot.pokemon_v2_ability)
                .map(|ability| ability.name)
                .collect(),
            stats: row
                .pokemon_v2_pokemonstats
                .into_iter()
                .map(|slot| BaseStat {
                    name: slot
                        .pokemon_v2_stat
                        .map(|stat| stat.name)
                        .unwrap_or_default(),
                    base_stat: slot.base_stat,
                    effort: slot.effort,
                })
                .collect(),
        }
    }
}

/// Run the fixed Pokemon query against `endpoint`.
///
/// With `use_cache` the response body is stored on disk and served on the
/// next start. `refresh` always goes to the network but still updates the cache.
pub async fn fetch_pokemon(
    endpoint: &str,
    use_cache: bool,
    refresh: bool,
) -> Result<Vec<Pokemon>, ApiError> {
    let request = GraphQlRequest {
        query: POKEMON_QUERY,
        operation_name: OPERATION_NAME,
    };
    let body = serde_json::to_vec(&request)?;
    let cache_key = format!("{endpoint}\n{POKEMON_QUERY}");
    let cache_path = cache_path("graphql", &cache_key);

    if use_cache && !refresh {
        if let Some(bytes) = read_cache(&cache_path).await {
            match decode_pokemon(&bytes) {
                Ok(list) => {
                    tracing::debug!(count = list.len(), "pokemon list served from cache");
                    return Ok(list);
                }
                Err(err) => {
                    tracing::warn!(%err, "dropping unreadable cache entry");
                    let _ = fs::remove_file(&cache_path).await;
                }
            }
        }
    }

    tracing::info!(endpoint, "fetching pokemon list");
    let response = http_client()
        .post(endpoint)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    let bytes = response.bytes().await?.to_vec();
    let list = decode_pokemon(&bytes)?;
    tracing::info!(count = list.len(), "pokemon list loaded");
    if use_cache {
        write_cache(&cache_path, &bytes).await;
    }
    Ok(list)
}

/// Decode a GraphQL response body into records, in response order.
pub fn decode_pokemon(bytes: &[u8]) -> Result<Vec<Pokemon>, ApiError> {
    let response: GraphQlResponse<PokemonData> = serde_json::from_slice(bytes)?;
    if !response.errors.is_empty() {
        return Err(ApiError::GraphQl(
            response
                .errors
                .into_iter()
                .map(|error| error.message)
                .collect(),
        ));
    }
    let data = response.data.ok_or(ApiError::NoData)?;
    Ok(data
        .pokemon_v2_pokemon
        .into_iter()
        .map(Pokemon::from)
        .collect())
}

pub async fn fetch_bytes(url: &str, use_cache: bool) -> Result<Vec<u8>, ApiError> {
    let cache_path = cache_path("http", url);
    if use_cache {
        if let Some(bytes) = read_cache(&cache_path).await {
            return Ok(bytes);
        }
    }

    tracing::debug!(url, "downloading");
    let response = http_client().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    let bytes = response.bytes().await?.to_vec();
    if use_cache {
        write_cache(&cache_path, &bytes).await;
    }
    Ok(bytes)
}

pub async fn fetch_sprite(url: &str, use_cache: bool) -> Result<SpriteData, ApiError> {
    let bytes = fetch_bytes(url, use_cache).await?;
    sprite::decode_sprite(&bytes).map_err(ApiError::Sprite)
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

fn cache_root() -> PathBuf {
    dirs_next::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("pokegql")
}

fn cache_path(kind: &str, key: &str) -> PathBuf {
    cache_root().join(kind).join(cache_digest(key))
}

fn cache_digest(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

async fn read_cache(path: &Path) -> Option<Vec<u8>> {
    fs::read(path).await.ok()
}

async fn write_cache(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent).await;
    }
    if let Err(err) = fs::write(path, bytes).await {
        tracing::warn!(path = %path.display(), %err, "cache write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BULBASAUR: &str = r#"{
        "data": {
            "pokemon_v2_pokemon": [
                {
                    "id": 1,
                    "name": "bulbasaur",
                    "height": 7,
                    "weight": 69,
                    "pokemon_v2_pokemonspecy": { "name": "bulbasaur" },
                    "pokemon_v2_pokemontypes": [
                        { "pokemon_v2_type": { "name": "grass" } },
                        { "pokemon_v2_type": { "name": "poison" } }
                    ],
                    "pokemon_v2_pokemonabilities": [
                        { "pokemon_v2_ability": { "name": "overgrow" } },
                        { "pokemon_v2_ability": { "name": "chlorophyll" } }
                    ],
                    "pokemon_v2_pokemonstats": [
                        { "base_stat": 45, "effort": 0, "pokemon_v2_stat": { "name": "hp" } },
                        { "base_stat": 65, "effort": 1, "pokemon_v2_stat": { "name": "special-attack" } }
                    ]
                },
                {
                    "id": 10001,
                    "name": "deoxys-attack",
                    "height": 17,
                    "weight": 608,
                    "pokemon_v2_pokemonspecy": null,
                    "pokemon_v2_pokemontypes": [],
                    "pokemon_v2_pokemonabilities": [],
                    "pokemon_v2_pokemonstats": []
                }
            ]
        }
    }"#;

    #[test]
    fn test_decode_maps_nested_shape() {
        let list = decode_pokemon(BULBASAUR.as_bytes()).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(
            list[0],
            Pokemon {
                id: 1,
                name: "bulbasaur".into(),
                height: 7,
                weight: 69,
                species: "bulbasaur".into(),
                types: vec!["grass".into(), "poison".into()],
                abilities: vec!["overgrow".into(), "chlorophyll".into()],
                stats: vec![
                    BaseStat {
                        name: "hp".into(),
                        base_stat: 45,
                        effort: 0,
                    },
                    BaseStat {
                        name: "special-attack".into(),
                        base_stat: 65,
                        effort: 1,
                    },
                ],
            }
        );
        assert_eq!(list[1].species, "");
        assert!(list[1].types.is_empty());
    }

    #[test]
    fn test_decode_surfaces_graphql_errors() {
        let body = r#"{"errors":[{"message":"field not found"},{"message":"bad order_by"}]}"#;
        match decode_pokemon(body.as_bytes()) {
            Err(ApiError::GraphQl(messages)) => {
                assert_eq!(messages, vec!["field not found", "bad order_by"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_decode_without_data_is_error() {
        assert!(matches!(
            decode_pokemon(br#"{"data":null}"#),
            Err(ApiError::NoData)
        ));
        assert!(matches!(
            decode_pokemon(b"<html>"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = ApiError::GraphQl(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "query failed: a; b");
        assert_eq!(ApiError::NoData.to_string(), "response carried no data");
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GraphQlRequest {
            query: POKEMON_QUERY,
            operation_name: OPERATION_NAME,
        })
        .unwrap();
        assert_eq!(body["operationName"], "GetPokemonDataQuery");
        assert!(body["query"]
            .as_str()
            .unwrap()
            .contains("order_by: {id: asc}"));
    }

    #[test]
    fn test_cache_digest_is_stable_per_key() {
        assert_eq!(cache_digest("a"), cache_digest("a"));
        assert_ne!(cache_digest("a"), cache_digest("b"));
        assert_eq!(cache_digest("a").len(), 64);
    }
}
