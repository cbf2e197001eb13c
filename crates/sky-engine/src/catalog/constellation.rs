//! Constellation stick figures resolved against the star catalog.

use serde::{Deserialize, Serialize};

use crate::api::services::ConstellationLineSource;
use crate::api::types::StarId;
use crate::catalog::builder::StarCatalog;

/// Display metadata for a constellation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstellationMeta {
    /// Display name (e.g. "Ursa Major").
    pub name: String,
    /// Content section the constellation links to.
    #[serde(default)]
    pub section: Option<String>,
    /// Route path the constellation links to.
    #[serde(default)]
    pub path: Option<String>,
}

/// A resolved constellation.
///
/// `stars` holds catalog indices (the frame star array uses the same
/// order); `connections` are index pairs into `stars`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constellation {
    /// IAU abbreviation.
    pub key: String,
    pub name: String,
    pub section: Option<String>,
    pub path: Option<String>,
    pub stars: Vec<usize>,
    pub connections: Vec<(usize, usize)>,
}

impl Constellation {
    /// Section tag if present, otherwise the route path.
    pub fn section_or_path(&self) -> Option<&str> {
        self.section.as_deref().or(self.path.as_deref())
    }

    /// Catalog indices of both endpoints of every connection.
    pub fn segments(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.connections.iter().map(|&(a, b)| (self.stars[a], self.stars[b]))
    }
}

/// Resolve one constellation's line data against the catalog.
///
/// Keeps the distinct endpoints found in the catalog, in order of first
/// appearance, and remaps segments into that list. Segments with a missing
/// endpoint, and self-segments, are skipped. Returns `None` unless at least
/// two stars and one connection resolve.
pub fn assemble_one(
    key: &str,
    meta: Option<ConstellationMeta>,
    segments: &[(StarId, StarId)],
    catalog: &StarCatalog,
) -> Option<Constellation> {
    let mut stars: Vec<usize> = Vec::new();
    let mut connections: Vec<(usize, usize)> = Vec::new();

    for &(a, b) in segments {
        if a == b {
            continue;
        }
        let (Some(ia), Some(ib)) = (catalog.index_of(a), catalog.index_of(b)) else {
            continue;
        };
        let la = local_index(&mut stars, ia);
        let lb = local_index(&mut stars, ib);
        connections.push((la, lb));
    }

    if stars.len() < 2 || connections.is_empty() {
        return None;
    }

    let meta = meta.unwrap_or_default();
    Some(Constellation {
        key: key.to_string(),
        name: if meta.name.is_empty() { key.to_string() } else { meta.name },
        section: meta.section,
        path: meta.path,
        stars,
        connections,
    })
}

fn local_index(stars: &mut Vec<usize>, catalog_index: usize) -> usize {
    match stars.iter().position(|&s| s == catalog_index) {
        Some(i) => i,
        None => {
            stars.push(catalog_index);
            stars.len() - 1
        }
    }
}

/// Resolve every constellation the line source knows about.
pub fn assemble(source: &dyn ConstellationLineSource, catalog: &StarCatalog) -> Vec<Constellation> {
    let keys = source.keys();
    let total = keys.len();
    let built: Vec<Constellation> = keys
        .iter()
        .filter_map(|key| assemble_one(key, source.meta(key), &source.for_key(key), catalog))
        .collect();
    log::info!("constellations: {} of {} resolved", built.len(), total);
    built
}
