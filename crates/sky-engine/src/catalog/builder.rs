//! Star catalog assembly.
//!
//! Base entries keyed by stable ids, overlaid with curated named stars,
//! padded with synthetic filler stars. The result is immutable and shared
//! through [`CatalogCache`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::api::config::SkyConfig;
use crate::api::types::StarId;
use crate::catalog::star::CatalogStar;
use crate::systems::rng::Rng;

/// Fraction of filler stars drawn from the bright band.
const FILLER_BRIGHT_FRACTION: f64 = 0.1;

/// Immutable, deduplicated star set with an id index.
#[derive(Debug, Clone, Default)]
pub struct StarCatalog {
    stars: Vec<CatalogStar>,
    index: HashMap<StarId, usize>,
}

impl StarCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// All entries, in build order. Frame arrays use the same order.
    pub fn stars(&self) -> &[CatalogStar] {
        &self.stars
    }

    pub fn get(&self, id: StarId) -> Option<&CatalogStar> {
        self.index.get(&id).map(|&i| &self.stars[i])
    }

    /// Position of `id` in [`StarCatalog::stars`].
    pub fn index_of(&self, id: StarId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn contains(&self, id: StarId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of entries with a proper name.
    pub fn named_count(&self) -> usize {
        self.stars.iter().filter(|s| s.is_named()).count()
    }

    fn insert(&mut self, star: CatalogStar) {
        self.index.insert(star.id, self.stars.len());
        self.stars.push(star);
    }
}

/// Builds a [`StarCatalog`] from base data, a named overlay and filler.
#[derive(Debug, Clone)]
pub struct StarCatalogBuilder {
    base: Vec<CatalogStar>,
    named: Vec<CatalogStar>,
    filler_count: u32,
    filler_id_base: u32,
    filler_seed: u64,
}

impl StarCatalogBuilder {
    pub fn new() -> Self {
        Self {
            base: Vec::new(),
            named: Vec::new(),
            filler_count: 0,
            filler_id_base: 1_000_000,
            filler_seed: 1,
        }
    }

    /// Builder preloaded with the filler settings from `config`.
    pub fn from_config(config: &SkyConfig) -> Self {
        Self::new().filler(config.filler_star_count, config.filler_id_base, config.filler_seed)
    }

    pub fn base(mut self, stars: Vec<CatalogStar>) -> Self {
        self.base = stars;
        self
    }

    pub fn named(mut self, stars: Vec<CatalogStar>) -> Self {
        self.named = stars;
        self
    }

    pub fn filler(mut self, count: u32, id_base: u32, seed: u64) -> Self {
        self.filler_count = count;
        self.filler_id_base = id_base;
        self.filler_seed = seed;
        self
    }

    pub fn build(self) -> StarCatalog {
        let mut catalog = StarCatalog {
            stars: Vec::with_capacity(self.base.len() + self.named.len() + self.filler_count as usize),
            index: HashMap::new(),
        };
        let mut invalid = 0usize;
        let mut duplicates = 0usize;

        for star in self.base {
            if !star.is_valid() {
                invalid += 1;
            } else if catalog.contains(star.id) {
                duplicates += 1;
            } else {
                catalog.insert(star);
            }
        }

        // Overlay only fills gaps; an existing name or constellation wins.
        for star in self.named {
            if !star.is_valid() {
                invalid += 1;
                continue;
            }
            match catalog.index_of(star.id) {
                Some(i) => {
                    let existing = &mut catalog.stars[i];
                    if existing.name.is_none() {
                        existing.name = star.name;
                    }
                    if existing.constellation.is_none() {
                        existing.constellation = star.constellation;
                    }
                }
                None => catalog.insert(star),
            }
        }

        if invalid > 0 || duplicates > 0 {
            log::debug!("star catalog: dropped {invalid} invalid and {duplicates} duplicate entries");
        }

        let real_count = catalog.len();
        let max_real_id = catalog.stars.iter().map(|s| s.id.0).max().unwrap_or(0);
        let first_id = self.filler_id_base.max(max_real_id.saturating_add(1));
        let mut rng = Rng::new(self.filler_seed);

        for i in 0..self.filler_count {
            let Some(id) = first_id.checked_add(i) else {
                break;
            };
            let ra = rng.range(0.0, 24.0);
            let dec = rng.range(-90.0, 90.0);
            let mag = if rng.next_f64() < FILLER_BRIGHT_FRACTION {
                rng.range(0.0, 2.0)
            } else {
                rng.range(2.0, 6.5)
            };
            catalog.insert(CatalogStar::new(id, ra, dec, mag));
        }

        log::info!(
            "star catalog built: {} stars ({} real, {} named, {} filler)",
            catalog.len(),
            real_count,
            catalog.named_count(),
            catalog.len() - real_count,
        );
        catalog
    }
}

impl Default for StarCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a built catalog depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogKey {
    /// Identity of the data source, see [`CatalogSource::cache_key`].
    pub source: String,
    pub filler_count: u32,
    pub filler_id_base: u32,
    pub filler_seed: u64,
}

impl CatalogKey {
    pub fn new(source: impl Into<String>, config: &SkyConfig) -> Self {
        Self {
            source: source.into(),
            filler_count: config.filler_star_count,
            filler_id_base: config.filler_id_base,
            filler_seed: config.filler_seed,
        }
    }
}

/// Owns the built catalog so the same source and filler settings are only
/// assembled once.
#[derive(Debug, Default)]
pub struct CatalogCache {
    entry: Option<(CatalogKey, Arc<StarCatalog>)>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the catalog cached under `key`, building (and replacing any
    /// catalog cached under another key) on a miss.
    pub fn get_or_build(&mut self, key: CatalogKey, build: impl FnOnce() -> StarCatalog) -> Arc<StarCatalog> {
        match &self.entry {
            Some((cached, catalog)) if *cached == key => catalog.clone(),
            _ => {
                let catalog = Arc::new(build());
                self.entry = Some((key, catalog.clone()));
                catalog
            }
        }
    }

    /// Drop the cached catalog; the next `get_or_build` rebuilds it.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}
