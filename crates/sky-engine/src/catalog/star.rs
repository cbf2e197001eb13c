use serde::{Deserialize, Deserializer, Serialize};

use crate::api::types::StarId;

/// One catalog entry. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStar {
    pub id: StarId,
    /// Proper name, if the star has one.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    /// Right ascension, hours [0, 24).
    pub ra: f64,
    /// Declination, degrees [-90, 90].
    pub dec: f64,
    /// Apparent visual magnitude.
    pub mag: f64,
    /// IAU constellation abbreviation.
    #[serde(default, deserialize_with = "blank_as_none", alias = "con")]
    pub constellation: Option<String>,
}

impl CatalogStar {
    pub fn new(id: u32, ra: f64, dec: f64, mag: f64) -> Self {
        Self {
            id: StarId(id),
            name: None,
            ra,
            dec,
            mag,
            constellation: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn in_constellation(mut self, abbrev: &str) -> Self {
        self.constellation = Some(abbrev.to_string());
        self
    }

    /// Whether the entry can be placed on the sky at all.
    pub fn is_valid(&self) -> bool {
        self.ra.is_finite() && self.dec.is_finite() && self.mag.is_finite()
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

/// Parse a list of catalog stars from a JSON array.
pub fn stars_from_json(json: &str) -> Result<Vec<CatalogStar>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Data files write missing names as `""`.
fn blank_as_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value: Option<String> = Option::deserialize(d)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entry_with_blank_fields() {
        let stars = stars_from_json(r#"[{"id": 7, "name": "", "ra": 1.0, "dec": 2.0, "mag": 3.0, "constellation": ""}]"#).unwrap();
        assert_eq!(stars[0].id, StarId(7));
        assert_eq!(stars[0].name, None);
        assert_eq!(stars[0].constellation, None);
    }

    #[test]
    fn accepts_con_alias_and_missing_name() {
        let stars = stars_from_json(r#"[{"id": 11767, "ra": 2.53, "dec": 89.26, "mag": 1.97, "con": "UMi"}]"#).unwrap();
        assert_eq!(stars[0].constellation.as_deref(), Some("UMi"));
        assert!(!stars[0].is_named());
    }

    #[test]
    fn validity_requires_finite_fields() {
        assert!(CatalogStar::new(1, 1.0, 1.0, 1.0).is_valid());
        assert!(!CatalogStar::new(1, f64::NAN, 1.0, 1.0).is_valid());
        assert!(!CatalogStar::new(1, 1.0, 1.0, f64::INFINITY).is_valid());
    }
}
