pub mod api;
pub mod core;
pub mod catalog;
pub mod ephemeris;
pub mod systems;
pub mod sim;
pub mod input;
pub mod interaction;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::SkyConfig;
pub use api::services::{
    CatalogSource, ConstellationLineSource, EphemerisProvider, FixedLocation, GeolocationProvider, JsonCatalog,
    ServiceError,
};
pub use api::types::{
    Anchor, BodyKind, GeoLocation, HoverInfo, HoverKind, SelectionEvent, SkyEvent, SolarBody, StarId, TargetKind,
};
pub use catalog::builder::{CatalogCache, CatalogKey, StarCatalog, StarCatalogBuilder};
pub use catalog::builtin::BuiltinCatalog;
pub use catalog::constellation::{Constellation, ConstellationMeta};
pub use catalog::star::CatalogStar;
pub use core::astronomy::{equatorial_to_horizontal, Horizontal};
pub use core::projection::{horizontal_to_screen, ProjectionMode};
pub use ephemeris::KeplerianEphemeris;
pub use input::queue::{InputEvent, InputQueue};
pub use sim::view::SkyView;
pub use systems::render::{SkyCanvas, BACKGROUND};
pub use systems::vector::{VectorState, VectorVertex, VectorColor};

// Extensions: animation helpers shared by the view
pub use extensions::{Easing, lerp, ease, approach};
