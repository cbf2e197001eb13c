//! External collaborators the engine consumes.
//!
//! Each service is a trait so hosts can plug in their own data and tests can
//! use plain fakes. Failures never reach the view: the `*_or_*` helpers
//! substitute the documented fallback and log a warning.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::api::types::{GeoLocation, SolarBody, StarId};
use crate::catalog::constellation::ConstellationMeta;
use crate::catalog::star::CatalogStar;
use crate::systems::hash::hash_str32;

/// Failure reported by an external service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("geolocation unavailable: {0}")]
    Geolocation(String),
    #[error("catalog load failed: {0}")]
    Catalog(String),
    #[error("ephemeris unavailable: {0}")]
    Ephemeris(String),
    #[error("malformed data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolves the observer's position.
pub trait GeolocationProvider {
    fn resolve(&self) -> Result<GeoLocation, ServiceError>;
}

/// Supplies catalog entries.
pub trait CatalogSource {
    /// Base entries keyed by stable ids.
    fn load(&self) -> Result<Vec<CatalogStar>, ServiceError>;

    /// Curated named stars overlaid on the base entries.
    fn named_stars(&self) -> Vec<CatalogStar> {
        Vec::new()
    }

    /// Stable identity of the data this source yields. Sources reporting
    /// the same key share a built catalog; `None` always rebuilds.
    fn cache_key(&self) -> Option<String> {
        None
    }
}

/// Supplies constellation stick-figure data keyed by IAU abbreviation.
pub trait ConstellationLineSource {
    /// Every abbreviation with line data, in display order.
    fn keys(&self) -> Vec<String>;

    /// Line segments as pairs of catalog ids.
    fn for_key(&self, abbrev: &str) -> Vec<(StarId, StarId)>;

    /// Display metadata for an abbreviation.
    fn meta(&self, abbrev: &str) -> Option<ConstellationMeta> {
        let _ = abbrev;
        None
    }
}

/// Computes apparent positions of the Sun, Moon and planets.
pub trait EphemerisProvider {
    fn bodies(&self, instant: &DateTime<Utc>, latitude: f64, longitude: f64) -> Vec<SolarBody>;
}

/// Resolve the observer location, falling back to Greenwich.
pub fn resolve_location(provider: &dyn GeolocationProvider) -> GeoLocation {
    match provider.resolve() {
        Ok(location) if location.is_finite() => location,
        Ok(location) => {
            log::warn!("geolocation returned non-finite position {location:?}, using Greenwich");
            GeoLocation::GREENWICH
        }
        Err(err) => {
            log::warn!("{err}, using Greenwich");
            GeoLocation::GREENWICH
        }
    }
}

/// Load the base catalog, falling back to an empty list.
pub fn load_catalog_or_empty(source: &dyn CatalogSource) -> Vec<CatalogStar> {
    match source.load() {
        Ok(stars) => stars,
        Err(err) => {
            log::warn!("{err}, continuing with an empty catalog");
            Vec::new()
        }
    }
}

/// Fixed location, for hosts that already know where the observer is.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub GeoLocation);

impl GeolocationProvider for FixedLocation {
    fn resolve(&self) -> Result<GeoLocation, ServiceError> {
        Ok(self.0)
    }
}

/// Catalog parsed from a host-supplied JSON array of stars.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    json: String,
}

impl JsonCatalog {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl CatalogSource for JsonCatalog {
    fn load(&self) -> Result<Vec<CatalogStar>, ServiceError> {
        Ok(crate::catalog::star::stars_from_json(&self.json)?)
    }

    fn cache_key(&self) -> Option<String> {
        Some(format!("json:{:08x}:{}", hash_str32(&self.json), self.json.len()))
    }
}
