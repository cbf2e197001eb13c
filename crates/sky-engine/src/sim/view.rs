//! The sky view controller.
//!
//! One `SkyView` owns all state for a running sky. The host feeds it input
//! and calls [`SkyView::tick`] once per display refresh; each tick runs two
//! explicit phases, [`SkyView::maybe_recompute_astronomy`] (low frequency)
//! and [`SkyView::reproject_all`] (whenever the blend or the data moved),
//! then redraws the vertex layers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use glam::Vec2;

use crate::api::config::SkyConfig;
use crate::api::services::{
    load_catalog_or_empty, resolve_location, CatalogSource, ConstellationLineSource, EphemerisProvider,
    GeolocationProvider,
};
use crate::api::types::{
    GeoLocation, HoverInfo, HoverKind, SelectionEvent, SkyEvent, TargetKind,
};
use crate::catalog::builder::{CatalogCache, CatalogKey, StarCatalog, StarCatalogBuilder};
use crate::catalog::constellation::{assemble, Constellation};
use crate::core::astronomy::{equatorial_to_horizontal_at, local_sidereal_degrees};
use crate::core::projection::{dome_radius, ProjectionMode};
use crate::core::time::{FrameClock, RecomputeTimer};
use crate::ephemeris::KeplerianEphemeris;
use crate::input::queue::{InputEvent, InputQueue};
use crate::interaction::hit_test::{click_at, constellation_anchor, hover_at, ClickTarget, HitRadii, HoverTarget};
use crate::interaction::pointer::{PointerAction, PointerMachine};
use crate::interaction::reset::ResetAnimation;
use crate::sim::frame::{reproject_slice, FrameBody, FrameStar, Scene};
use crate::sim::state::{clamp_brightness, SimulationState, Viewport};
use crate::systems::milky_way::sample_plane;
use crate::systems::render::{DrawOptions, SkyCanvas};

/// Keys of constellations with at least one line whose ends are both up.
pub fn eligible_for_pulse(constellations: &[Constellation], stars: &[FrameStar]) -> Vec<String> {
    constellations
        .iter()
        .filter(|c| {
            c.segments().any(|(a, b)| {
                matches!((stars.get(a), stars.get(b)), (Some(s), Some(t)) if s.visible && t.visible)
            })
        })
        .map(|c| c.key.clone())
        .collect()
}

pub struct SkyView {
    config: SkyConfig,
    state: SimulationState,
    catalog: Arc<StarCatalog>,
    catalog_cache: CatalogCache,
    constellations: Vec<Constellation>,
    ephemeris: Box<dyn EphemerisProvider>,
    clock: FrameClock,
    recompute: RecomputeTimer,
    recompute_count: u64,
    /// Wall clock of the latest tick.
    last_wall_ms: Option<f64>,
    pointer: PointerMachine,
    radii: HitRadii,
    reset: Option<ResetAnimation>,
    input: InputQueue,
    canvas: SkyCanvas,
    events: Vec<SkyEvent>,
    loaded: bool,
    torn_down: bool,
}

impl SkyView {
    /// A view with an empty catalog and the built-in ephemeris, observing
    /// from Greenwich until a location is supplied.
    pub fn new(config: SkyConfig) -> Self {
        Self {
            state: SimulationState::new(&config),
            catalog: Arc::new(StarCatalog::empty()),
            catalog_cache: CatalogCache::new(),
            constellations: Vec::new(),
            ephemeris: Box::new(KeplerianEphemeris::new()),
            clock: FrameClock::new(config.max_frame_dt_ms),
            recompute: RecomputeTimer::new(config.recompute_interval_ms),
            recompute_count: 0,
            last_wall_ms: None,
            pointer: PointerMachine::from_config(&config),
            radii: HitRadii::from_config(&config),
            reset: None,
            input: InputQueue::new(),
            canvas: SkyCanvas::new(),
            events: Vec::new(),
            loaded: false,
            torn_down: false,
            config,
        }
    }

    // ---- Data sources ----

    /// Build the catalog and assemble constellations. A source with a cache
    /// key reuses the catalog built for the same key and filler settings.
    pub fn load_catalog(&mut self, source: &dyn CatalogSource, lines: &dyn ConstellationLineSource) {
        let build = || {
            StarCatalogBuilder::from_config(&self.config)
                .base(load_catalog_or_empty(source))
                .named(source.named_stars())
                .build()
        };
        let catalog = match source.cache_key() {
            Some(key) => {
                let key = CatalogKey::new(key, &self.config);
                self.catalog_cache.get_or_build(key, build)
            }
            None => {
                let catalog = Arc::new(build());
                self.catalog_cache.invalidate();
                catalog
            }
        };
        let constellations = assemble(lines, &catalog);
        self.set_catalog(catalog, constellations);
    }

    /// Install a prebuilt catalog and its constellations.
    pub fn set_catalog(&mut self, catalog: Arc<StarCatalog>, constellations: Vec<Constellation>) {
        log::info!(
            "sky view: {} stars, {} constellations",
            catalog.len(),
            constellations.len()
        );
        self.catalog = catalog;
        self.constellations = constellations;
        self.state.hover = None;
        self.state.frame.stars.clear();
        self.recompute.invalidate();
    }

    pub fn set_ephemeris(&mut self, ephemeris: Box<dyn EphemerisProvider>) {
        self.ephemeris = ephemeris;
        self.recompute.invalidate();
    }

    /// Resolve the detected location through `provider` (Greenwich on failure).
    pub fn locate(&mut self, provider: &dyn GeolocationProvider) {
        self.set_detected_location(resolve_location(provider));
    }

    pub fn set_detected_location(&mut self, location: GeoLocation) {
        self.state.observer.set_detected(location);
        self.recompute.invalidate();
    }

    // ---- Observer controls ----

    /// Override (or with `None`, clear) the observer location.
    pub fn set_custom_location(&mut self, location: Option<GeoLocation>) {
        self.reset = None;
        self.state.observer.set_custom(location);
        self.recompute.invalidate();
    }

    /// Ease the time offset toward `hours`.
    pub fn set_time_offset_target(&mut self, hours: f64) {
        self.reset = None;
        self.state.observer.time_offset_mut().set_target(hours);
    }

    /// Jump the time offset to `hours` without easing.
    pub fn set_time_offset(&mut self, hours: f64) {
        self.reset = None;
        self.state.observer.time_offset_mut().jump(hours);
        self.recompute.invalidate();
    }

    /// Animate back to the detected location and zero offset.
    pub fn reset_view(&mut self) {
        let observer = &self.state.observer;
        match ResetAnimation::start(
            observer.location(),
            observer.time_offset_hours(),
            observer.detected(),
            self.config.reset_duration_ms,
        ) {
            Some(anim) => {
                log::debug!("reset view started");
                self.reset = Some(anim);
            }
            None => {
                self.state.observer.set_custom(None);
                self.state.observer.time_offset_mut().jump(0.0);
                self.recompute.invalidate();
            }
        }
    }

    pub fn is_resetting(&self) -> bool {
        self.reset.is_some()
    }

    // ---- Display controls ----

    pub fn set_projection_mode(&mut self, mode: ProjectionMode) {
        self.state.projection.set_mode(mode);
    }

    pub fn toggle_projection(&mut self) {
        self.state.projection.toggle();
    }

    /// Host-driven override of the projection mode; `None` releases it.
    pub fn set_forced_projection(&mut self, mode: Option<ProjectionMode>) {
        self.state.projection.set_forced(mode);
    }

    pub fn set_show_all_constellations(&mut self, on: bool) {
        self.state.toggles.show_all_constellations = on;
    }

    pub fn set_show_all_stars(&mut self, on: bool) {
        self.state.toggles.show_all_stars = on;
    }

    pub fn set_show_solar_system(&mut self, on: bool) {
        if self.state.toggles.show_solar_system != on {
            self.state.toggles.show_solar_system = on;
            self.state.hover = None;
            self.recompute.invalidate();
        }
    }

    pub fn set_show_milky_way(&mut self, on: bool) {
        if self.state.toggles.show_milky_way != on {
            self.state.toggles.show_milky_way = on;
            self.recompute.invalidate();
        }
    }

    pub fn set_star_brightness(&mut self, mul: f64) {
        self.state.toggles.star_brightness = clamp_brightness(mul);
    }

    /// Replace the set of host-selected constellation keys.
    pub fn set_selected_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.selected = keys.into_iter().map(Into::into).collect();
    }

    // ---- Input ----

    pub fn push_input(&mut self, event: InputEvent) {
        if !self.torn_down {
            self.input.push(event);
        }
    }

    /// Apply a new viewport size. Any press in progress is dropped. The
    /// astronomy recomputes right away once a tick has supplied a wall clock.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.viewport = Viewport::new(width, height);
        self.pointer.abort();
        self.state.hover = None;
        self.recompute.invalidate();
        if let Some(wall_ms) = self.last_wall_ms {
            let sim_ms = self.state.observer.simulated_ms(wall_ms);
            self.maybe_recompute_astronomy(sim_ms);
        }
        self.reproject_all();
    }

    fn handle_input(&mut self) {
        for event in self.input.drain() {
            match event {
                InputEvent::PointerDown { id, x, y } => {
                    let from = self.state.observer.location();
                    let Viewport { width, height } = self.state.viewport;
                    if self.pointer.down(id, Vec2::new(x, y), from, width, height) == PointerAction::Pressed {
                        self.reset = None;
                        self.state.hover = None;
                    }
                }
                InputEvent::PointerMove { id, x, y } => {
                    let action = self.pointer.move_to(id, Vec2::new(x, y));
                    self.apply_pointer_action(action);
                }
                InputEvent::PointerUp { id, x, y } => {
                    let action = self.pointer.up(id, Vec2::new(x, y));
                    self.apply_pointer_action(action);
                }
                InputEvent::PointerCancel { id } => {
                    self.pointer.cancel(id);
                }
                InputEvent::Resize { width, height } => self.resize(width, height),
            }
        }
    }

    fn apply_pointer_action(&mut self, action: PointerAction) {
        match action {
            PointerAction::Hover(pos) => self.update_hover(pos),
            PointerAction::Pan { location, first_drag } => {
                self.state.observer.set_custom(Some(location));
                self.recompute.invalidate();
                if first_drag {
                    self.events.push(SkyEvent::FirstDrag);
                }
            }
            PointerAction::Click(pos) => self.click(pos),
            PointerAction::Ignored | PointerAction::Pressed | PointerAction::Released => {}
        }
    }

    fn scene(&self) -> Scene<'_> {
        Scene {
            stars: &self.state.frame.stars,
            constellations: &self.constellations,
            bodies: &self.state.frame.bodies,
            milky_way: &self.state.frame.milky_way,
        }
    }

    fn current_dome_radius(&self) -> f64 {
        let Viewport { width, height } = self.state.viewport;
        dome_radius(width, height, self.state.projection.blend())
    }

    fn update_hover(&mut self, pos: Vec2) {
        let toggles = self.state.toggles;
        self.state.hover = hover_at(
            pos,
            &self.scene(),
            &self.radii,
            toggles.show_solar_system,
            toggles.show_all_stars,
        );
    }

    fn click(&mut self, pos: Vec2) {
        let target = click_at(
            pos,
            &self.scene(),
            &self.radii,
            self.state.toggles.show_solar_system,
            self.current_dome_radius(),
        );

        let selection = match target {
            Some(ClickTarget::Body(i)) => {
                let name = self.state.frame.bodies[i].name().to_string();
                SelectionEvent {
                    kind: TargetKind::Body,
                    key: name.clone(),
                    name,
                    section_or_path: None,
                    anchor: pos.into(),
                }
            }
            Some(ClickTarget::Constellation(i)) => {
                let c = &self.constellations[i];
                let selection = SelectionEvent {
                    kind: TargetKind::Constellation,
                    key: c.key.clone(),
                    name: c.name.clone(),
                    section_or_path: c.section_or_path().map(str::to_string),
                    anchor: constellation_anchor(c, &self.state.frame.stars).into(),
                };
                self.state.pulse.disable();
                self.state.highlight = None;
                selection
            }
            None => return,
        };

        log::debug!("selected {:?} {}", selection.kind, selection.key);
        self.events.push(SkyEvent::Selected(selection));
    }

    // ---- Frame ----

    /// Advance one display frame.
    ///
    /// `now_ms` is a monotonic animation clock; `wall_ms` is the real Unix
    /// time in milliseconds.
    pub fn tick(&mut self, now_ms: f64, wall_ms: f64) {
        if self.torn_down {
            return;
        }
        let dt = self.clock.advance(now_ms);
        if wall_ms.is_finite() {
            self.last_wall_ms = Some(wall_ms);
        }

        self.handle_input();

        if let Some(anim) = &mut self.reset {
            let frame = anim.sample(now_ms);
            if frame.done {
                self.reset = None;
                self.state.observer.set_custom(None);
            } else {
                self.state.observer.set_custom(Some(frame.location));
            }
            self.state.observer.time_offset_mut().jump(frame.time_offset_hours);
            self.recompute.invalidate();
        } else if self.state.observer.time_offset_mut().step(dt) {
            self.recompute.invalidate();
        }

        let blend_moved = self.state.projection.step(dt);
        let sim_ms = self.state.observer.simulated_ms(wall_ms);
        let recomputed = self.maybe_recompute_astronomy(sim_ms);
        if blend_moved || recomputed {
            self.reproject_all();
        }
        if recomputed {
            if let Some(pos) = self.pointer.hover_pos() {
                self.update_hover(pos);
            }
        }

        let constellations = &self.constellations;
        let stars = &self.state.frame.stars;
        self.state.highlight = self.state.pulse.tick(now_ms, || eligible_for_pulse(constellations, stars));

        self.draw(now_ms);

        if !self.loaded {
            self.loaded = true;
            log::info!("sky view loaded");
            self.events.push(SkyEvent::Loaded);
        }
    }

    /// Recompute horizontal coordinates for every star, body and Milky Way
    /// sample when the timer is due. Returns whether it ran.
    pub fn maybe_recompute_astronomy(&mut self, sim_ms: f64) -> bool {
        if !self.recompute.is_due(sim_ms) {
            return false;
        }
        let instant = Some(sim_ms)
            .filter(|ms| ms.is_finite())
            .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64));
        let Some(instant) = instant else {
            log::warn!("simulated time {sim_ms} is out of range, skipping recompute");
            return false;
        };

        self.recompute.mark_done(sim_ms);
        self.recompute_at(&instant);
        true
    }

    fn recompute_at(&mut self, instant: &DateTime<Utc>) {
        let location = self.state.observer.location();
        let lst = local_sidereal_degrees(location.longitude, instant);
        let toggles = self.state.toggles;

        let frame = &mut self.state.frame;
        frame.stars.clear();
        frame.stars.extend(self.catalog.stars().iter().enumerate().map(|(i, star)| {
            FrameStar::new(i, star, equatorial_to_horizontal_at(star.ra, star.dec, location.latitude, lst))
        }));

        frame.bodies.clear();
        if toggles.show_solar_system {
            frame.bodies.extend(
                self.ephemeris
                    .bodies(instant, location.latitude, location.longitude)
                    .into_iter()
                    .filter(|b| b.altitude.is_finite() && b.azimuth.is_finite())
                    .map(FrameBody::new),
            );
        }

        frame.milky_way = if toggles.show_milky_way {
            sample_plane(self.config.milky_way_step_deg, location.latitude, lst)
        } else {
            Vec::new()
        };

        self.recompute_count += 1;
        log::debug!(
            "astronomy recompute #{} at {instant} ({:.3}, {:.3})",
            self.recompute_count,
            location.latitude,
            location.longitude
        );
    }

    /// Re-project every derived entity with the current blend and viewport.
    pub fn reproject_all(&mut self) {
        let Viewport { width, height } = self.state.viewport;
        let blend = self.state.projection.blend();
        let frame = &mut self.state.frame;
        reproject_slice(&mut frame.stars, width, height, blend);
        reproject_slice(&mut frame.bodies, width, height, blend);
        reproject_slice(&mut frame.milky_way, width, height, blend);
    }

    fn draw(&mut self, t_ms: f64) {
        let toggles = self.state.toggles;
        let hovered = match self.state.hover {
            Some(HoverTarget::Constellation(i)) => self.constellations.get(i).map(|c| c.key.as_str()),
            _ => None,
        };
        let opts = DrawOptions {
            t_ms,
            star_brightness: toggles.star_brightness,
            dome_radius: self.current_dome_radius(),
            show_all_constellations: toggles.show_all_constellations,
            show_solar_system: toggles.show_solar_system,
            show_milky_way: toggles.show_milky_way,
            hovered,
            selected: &self.state.selected,
            pulse: self.state.highlight.as_ref(),
        };
        let scene = Scene {
            stars: &self.state.frame.stars,
            constellations: &self.constellations,
            bodies: &self.state.frame.bodies,
            milky_way: &self.state.frame.milky_way,
        };
        self.canvas.draw(&scene, &opts);
    }

    /// Stop all animation. Further ticks and input are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.reset = None;
        self.pointer.abort();
        self.input.clear();
        self.state.projection.settle();
        self.state.pulse.disable();
        self.state.highlight = None;
        self.state.hover = None;
        self.canvas.clear();
        log::info!("sky view torn down");
    }

    // ---- Output ----

    /// Take the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<SkyEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn canvas(&self) -> &SkyCanvas {
        &self.canvas
    }

    pub fn hover(&self) -> Option<HoverTarget> {
        self.state.hover
    }

    /// Tooltip details for the current hover target.
    pub fn hover_info(&self) -> Option<HoverInfo> {
        let info = match self.state.hover? {
            HoverTarget::Body(i) => {
                let name = self.state.frame.bodies.get(i)?.name().to_string();
                HoverInfo { kind: HoverKind::Body, key: name.clone(), name }
            }
            HoverTarget::Star(i) => {
                let star = self.catalog.stars().get(i)?;
                HoverInfo {
                    kind: HoverKind::Star,
                    key: star.id.0.to_string(),
                    name: star.name.clone().unwrap_or_else(|| format!("HIP {}", star.id.0)),
                }
            }
            HoverTarget::Constellation(i) => {
                let c = self.constellations.get(i)?;
                HoverInfo { kind: HoverKind::Constellation, key: c.key.clone(), name: c.name.clone() }
            }
        };
        Some(info)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &SkyConfig {
        &self.config
    }

    pub fn catalog(&self) -> &StarCatalog {
        &self.catalog
    }

    pub fn constellations(&self) -> &[Constellation] {
        &self.constellations
    }

    pub fn location(&self) -> GeoLocation {
        self.state.observer.location()
    }

    pub fn time_offset_hours(&self) -> f64 {
        self.state.observer.time_offset_hours()
    }

    pub fn projection_blend(&self) -> f64 {
        self.state.projection.blend()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Number of astronomy recomputes so far.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }
}
