//! Per-recompute derived entities.
//!
//! Rebuilt from scratch on every astronomy recompute, then re-projected in
//! place each frame from their stored altitude/azimuth.

use glam::Vec2;

use crate::api::types::{BodyKind, SolarBody, StarId};
use crate::catalog::constellation::Constellation;
use crate::catalog::star::CatalogStar;
use crate::core::astronomy::Horizontal;
use crate::core::projection::horizontal_to_screen;
use crate::systems::appearance::{base_alpha, star_rgb, star_size, Twinkle};

/// Anything that has a known sky position and a screen position.
pub trait Projected {
    fn altitude(&self) -> f64;
    fn azimuth(&self) -> f64;
    fn set_screen(&mut self, pos: Option<Vec2>);

    /// Recompute the screen position from the stored altitude/azimuth.
    fn reproject(&mut self, width: f32, height: f32, blend: f64) {
        let pos = horizontal_to_screen(self.altitude(), self.azimuth(), width, height, blend);
        self.set_screen(pos);
    }
}

/// Re-project a whole slice.
pub fn reproject_slice<P: Projected>(items: &mut [P], width: f32, height: f32, blend: f64) {
    for item in items {
        item.reproject(width, height, blend);
    }
}

/// A catalog star placed on the sky.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStar {
    /// Index into the catalog (and into the frame star array).
    pub catalog_index: usize,
    pub id: StarId,
    pub named: bool,
    pub mag: f64,
    pub altitude: f64,
    pub azimuth: f64,
    /// Above the horizon and projected.
    pub visible: bool,
    pub pos: Vec2,
    pub size: f32,
    pub base_alpha: f64,
    pub rgb: [u8; 3],
    pub twinkle: Twinkle,
}

impl FrameStar {
    pub fn new(catalog_index: usize, star: &CatalogStar, horizontal: Horizontal) -> Self {
        Self {
            catalog_index,
            id: star.id,
            named: star.is_named(),
            mag: star.mag,
            altitude: horizontal.altitude,
            azimuth: horizontal.azimuth,
            visible: false,
            pos: Vec2::ZERO,
            size: star_size(star.mag),
            base_alpha: base_alpha(star.mag),
            rgb: star_rgb(star.id, star.mag),
            twinkle: Twinkle::for_star(star.id),
        }
    }
}

impl Projected for FrameStar {
    fn altitude(&self) -> f64 {
        self.altitude
    }

    fn azimuth(&self) -> f64 {
        self.azimuth
    }

    fn set_screen(&mut self, pos: Option<Vec2>) {
        self.visible = pos.is_some() && self.altitude > 0.0;
        self.pos = pos.unwrap_or(Vec2::ZERO);
    }
}

/// A solar-system body placed on the sky.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBody {
    pub body: SolarBody,
    pub visible: bool,
    pub pos: Vec2,
}

impl FrameBody {
    pub fn new(body: SolarBody) -> Self {
        Self {
            body,
            visible: false,
            pos: Vec2::ZERO,
        }
    }

    pub fn kind(&self) -> BodyKind {
        self.body.kind
    }

    pub fn name(&self) -> &str {
        &self.body.name
    }
}

impl Projected for FrameBody {
    fn altitude(&self) -> f64 {
        self.body.altitude
    }

    fn azimuth(&self) -> f64 {
        self.body.azimuth
    }

    fn set_screen(&mut self, pos: Option<Vec2>) {
        self.visible = pos.is_some() && self.body.altitude > 0.0;
        self.pos = pos.unwrap_or(Vec2::ZERO);
    }
}

/// A galactic-plane sample for the Milky Way band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MilkyWayPoint {
    pub altitude: f64,
    pub azimuth: f64,
    pub visible: bool,
    pub pos: Vec2,
}

impl MilkyWayPoint {
    pub fn new(horizontal: Horizontal) -> Self {
        Self {
            altitude: horizontal.altitude,
            azimuth: horizontal.azimuth,
            visible: false,
            pos: Vec2::ZERO,
        }
    }
}

impl Projected for MilkyWayPoint {
    fn altitude(&self) -> f64 {
        self.altitude
    }

    fn azimuth(&self) -> f64 {
        self.azimuth
    }

    fn set_screen(&mut self, pos: Option<Vec2>) {
        self.visible = pos.is_some();
        self.pos = pos.unwrap_or(Vec2::ZERO);
    }
}

/// Borrowed view of one frame's entities, shared by drawing and hit testing.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    /// Parallel to the catalog: `stars[i]` is catalog entry `i`.
    pub stars: &'a [FrameStar],
    pub constellations: &'a [Constellation],
    pub bodies: &'a [FrameBody],
    pub milky_way: &'a [MilkyWayPoint],
}
