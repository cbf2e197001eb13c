use serde::{Deserialize, Serialize};

/// Stable catalog identifier (Hipparcos number for real stars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StarId(pub u32);

/// Observer position on Earth, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    /// Royal Observatory, Greenwich. Substituted whenever no location is known.
    pub const GREENWICH: Self = Self {
        latitude: 51.4779,
        longitude: 0.0,
    };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl Default for GeoLocation {
    fn default() -> Self {
        Self::GREENWICH
    }
}

/// Kind of a solar-system body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Sun,
    Moon,
    Planet,
}

/// A solar-system body as delivered by an ephemeris provider.
/// Only the Moon carries `phase_fraction` (0 = new, 1 = full).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarBody {
    pub name: String,
    pub kind: BodyKind,
    /// Right ascension, hours.
    pub ra: f64,
    /// Declination, degrees.
    pub dec: f64,
    pub altitude: f64,
    pub azimuth: f64,
    pub visible: bool,
    #[serde(default)]
    pub magnitude: Option<f64>,
    #[serde(default)]
    pub phase_fraction: Option<f64>,
}

/// What a click selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Body,
    Constellation,
}

/// Screen point a host popover should attach to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

impl From<glam::Vec2> for Anchor {
    fn from(v: glam::Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Click/selection event delivered to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEvent {
    pub kind: TargetKind,
    /// Constellation abbreviation or body name.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Content section (constellations) or route path, when known.
    pub section_or_path: Option<String>,
    pub anchor: Anchor,
}

/// Kind of entity under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverKind {
    Body,
    Star,
    Constellation,
}

/// What the pointer is over, for host tooltips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverInfo {
    pub kind: HoverKind,
    /// Body name, star id or constellation abbreviation.
    pub key: String,
    pub name: String,
}

/// Discrete signals emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SkyEvent {
    /// The first full frame is ready.
    Loaded,
    /// The user panned the sky for the first time in this view.
    FirstDrag,
    /// A body or constellation was clicked.
    Selected(SelectionEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_string(&SkyEvent::FirstDrag).unwrap();
        assert_eq!(json, r#"{"type":"firstDrag"}"#);

        let selected = SkyEvent::Selected(SelectionEvent {
            kind: TargetKind::Constellation,
            key: "Ori".into(),
            name: "Orion".into(),
            section_or_path: Some("projects".into()),
            anchor: Anchor { x: 10.0, y: 20.0 },
        });
        let value: serde_json::Value = serde_json::to_value(&selected).unwrap();
        assert_eq!(value["type"], "selected");
        assert_eq!(value["kind"], "constellation");
        assert_eq!(value["sectionOrPath"], "projects");
        assert_eq!(value["anchor"]["x"], 10.0);
    }

    #[test]
    fn star_id_is_transparent() {
        let id: StarId = serde_json::from_str("11767").unwrap();
        assert_eq!(id, StarId(11767));
    }
}
