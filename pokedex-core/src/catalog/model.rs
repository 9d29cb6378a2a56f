//! Catalog documents and their parsed forms
//!
//! Raw `serde` shapes mirror the PokeAPI JSON; the public types are what
//! the rest of the engine and the renderer work with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CatalogError;

/// Lightweight pointer to an entity, as listed on a catalog page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub name: String,
    #[serde(rename = "url")]
    pub detail_url: String,
}

impl EntityRef {
    pub fn new(name: impl Into<String>, detail_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail_url: detail_url.into(),
        }
    }

    /// Numeric id encoded as the last path segment of the detail URL
    ///
    /// `https://pokeapi.co/api/v2/pokemon/25/` -> `Some(25)`
    pub fn id_hint(&self) -> Option<u32> {
        self.detail_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse::<u32>().ok())
            .filter(|id| *id > 0)
    }
}

/// Image URLs for one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sprites {
    pub default_url: String,
    pub shiny_url: Option<String>,
    pub back_default_url: Option<String>,
    pub back_shiny_url: Option<String>,
    pub artwork_url: Option<String>,
}

/// One base stat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub name: String,
    pub base: u32,
}

/// Fully resolved entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDetail {
    pub id: u32,
    pub name: String,
    pub sprites: Sprites,
    /// Display order
    pub types: Vec<String>,
    /// Display order
    pub stats: Vec<Stat>,
    pub height_deci: u32,
    pub weight_deci: u32,
    pub abilities: Vec<String>,
}

impl EntityDetail {
    /// Parse a detail document fetched from `url`
    pub fn from_json(url: &str, value: &Value) -> Result<Self, CatalogError> {
        let raw: RawDetail = serde_json::from_value(value.clone())
            .map_err(|e| CatalogError::malformed(url, e.to_string()))?;

        if raw.id == 0 {
            return Err(CatalogError::malformed(url, "entity id must be positive"));
        }

        let sprites = raw.sprites.resolve(url)?;

        let mut types = raw.types;
        types.sort_by_key(|t| t.slot);
        let mut abilities = raw.abilities;
        abilities.sort_by_key(|a| a.slot);

        Ok(EntityDetail {
            id: raw.id,
            name: raw.name,
            sprites,
            types: types.into_iter().map(|t| t.kind.name).collect(),
            stats: raw
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    base: s.base_stat,
                })
                .collect(),
            height_deci: raw.height,
            weight_deci: raw.weight,
            abilities: abilities.into_iter().map(|a| a.ability.name).collect(),
        })
    }

    /// Base value of a named stat
    pub fn stat(&self, name: &str) -> Option<u32> {
        self.stats.iter().find(|s| s.name == name).map(|s| s.base)
    }

    pub fn height_m(&self) -> f32 {
        self.height_deci as f32 / 10.0
    }

    pub fn weight_kg(&self) -> f32 {
        self.weight_deci as f32 / 10.0
    }
}

/// Pagination links of one list response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Parsed list response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEnvelope {
    pub total: Option<u32>,
    pub links: PageLinks,
    pub refs: Vec<EntityRef>,
}

impl PageEnvelope {
    /// Parse a list document fetched from `url`
    pub fn from_json(url: &str, value: &Value) -> Result<Self, CatalogError> {
        let raw: RawPage = serde_json::from_value(value.clone())
            .map_err(|e| CatalogError::malformed(url, e.to_string()))?;

        Ok(PageEnvelope {
            total: raw.count,
            links: PageLinks {
                next: raw.next,
                previous: raw.previous,
            },
            refs: raw.results,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    previous: Option<String>,
    results: Vec<EntityRef>,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawTypeSlot {
    #[serde(default)]
    slot: u32,
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Deserialize)]
struct RawStat {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct RawAbilitySlot {
    ability: NamedResource,
    #[serde(default)]
    slot: u32,
}

#[derive(Debug, Deserialize)]
struct RawDetail {
    id: u32,
    name: String,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    types: Vec<RawTypeSlot>,
    #[serde(default)]
    stats: Vec<RawStat>,
    #[serde(default)]
    abilities: Vec<RawAbilitySlot>,
    sprites: RawSprites,
}

#[derive(Debug, Default, Deserialize)]
struct RawSpriteSet {
    #[serde(default)]
    front_default: Option<String>,
    #[serde(default)]
    front_shiny: Option<String>,
    #[serde(default)]
    back_default: Option<String>,
    #[serde(default)]
    back_shiny: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSprites {
    #[serde(flatten)]
    base: RawSpriteSet,
    #[serde(default)]
    other: Option<Value>,
    #[serde(default)]
    versions: Option<Value>,
}

impl RawSprites {
    /// Prefer the animated Gen-V set, then the static sprites, then artwork
    fn resolve(self, url: &str) -> Result<Sprites, CatalogError> {
        let artwork_url = self
            .other
            .as_ref()
            .and_then(|other| other.pointer("/official-artwork/front_default"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let animated = self
            .versions
            .as_ref()
            .and_then(|versions| versions.pointer("/generation-v/black-white/animated"))
            .and_then(|set| serde_json::from_value::<RawSpriteSet>(set.clone()).ok())
            .filter(|set| set.front_default.is_some());

        let set = animated.unwrap_or(self.base);

        let default_url = set
            .front_default
            .or_else(|| artwork_url.clone())
            .ok_or_else(|| CatalogError::malformed(url, "entity has no default sprite"))?;

        Ok(Sprites {
            default_url,
            shiny_url: set.front_shiny,
            back_default_url: set.back_default,
            back_shiny_url: set.back_shiny,
            artwork_url,
        })
    }
}
