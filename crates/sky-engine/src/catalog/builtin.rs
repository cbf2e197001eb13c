//! Catalog data compiled into the engine.
//!
//! - `hip_subset.json`: id-keyed positions for every star referenced by line data
//! - `bright_stars.json`: curated named bright stars
//! - `constellation_lines.json`: IAU abbreviation → `[[idA, idB], ...]`
//! - `constellations.json`: IAU abbreviation → display metadata

use std::collections::BTreeMap;

use crate::api::services::{CatalogSource, ConstellationLineSource, ServiceError};
use crate::api::types::StarId;
use crate::catalog::constellation::ConstellationMeta;
use crate::catalog::star::{stars_from_json, CatalogStar};

const HIP_SUBSET_JSON: &str = include_str!("../../data/hip_subset.json");
const BRIGHT_STARS_JSON: &str = include_str!("../../data/bright_stars.json");
const LINES_JSON: &str = include_str!("../../data/constellation_lines.json");
const META_JSON: &str = include_str!("../../data/constellations.json");

/// Built-in star, line and metadata source.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    named: Vec<CatalogStar>,
    lines: BTreeMap<String, Vec<(u32, u32)>>,
    meta: BTreeMap<String, ConstellationMeta>,
}

impl BuiltinCatalog {
    /// Parse the embedded data.
    pub fn new() -> Result<Self, serde_json::Error> {
        Ok(Self {
            named: stars_from_json(BRIGHT_STARS_JSON)?,
            lines: serde_json::from_str(LINES_JSON)?,
            meta: serde_json::from_str(META_JSON)?,
        })
    }
}

impl CatalogSource for BuiltinCatalog {
    fn load(&self) -> Result<Vec<CatalogStar>, ServiceError> {
        Ok(stars_from_json(HIP_SUBSET_JSON)?)
    }

    fn named_stars(&self) -> Vec<CatalogStar> {
        self.named.clone()
    }

    fn cache_key(&self) -> Option<String> {
        Some("builtin".to_string())
    }
}

impl ConstellationLineSource for BuiltinCatalog {
    fn keys(&self) -> Vec<String> {
        self.lines.keys().cloned().collect()
    }

    fn for_key(&self, abbrev: &str) -> Vec<(StarId, StarId)> {
        self.lines
            .get(abbrev)
            .map(|segments| segments.iter().map(|&(a, b)| (StarId(a), StarId(b))).collect())
            .unwrap_or_default()
    }

    fn meta(&self, abbrev: &str) -> Option<ConstellationMeta> {
        self.meta.get(abbrev).cloned()
    }
}
