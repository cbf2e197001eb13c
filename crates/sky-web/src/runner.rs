use sky_engine::{
    BuiltinCatalog, CatalogSource, CatalogStar, FixedLocation, GeoLocation, InputEvent, JsonCatalog, ProjectionMode, ServiceError,
    SkyConfig, SkyView, BACKGROUND,
};

/// Owns the sky view for the browser bridge.
///
/// wasm-bindgen cannot export the view's borrowed accessors directly, so the
/// bridge keeps one runner in a `thread_local!` and forwards free functions
/// to it.
pub struct SkyRunner {
    view: SkyView,
}

impl SkyRunner {
    pub fn new(config: SkyConfig) -> Self {
        Self {
            view: SkyView::new(config),
        }
    }

    /// Build from a host JSON config fragment. Malformed JSON falls back to
    /// the defaults.
    pub fn from_config_json(json: &str) -> Self {
        let config = SkyConfig::from_json(json).unwrap_or_else(|err| {
            log::warn!("invalid sky config ({err}), using defaults");
            SkyConfig::default()
        });
        Self::new(config)
    }

    pub fn view(&self) -> &SkyView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut SkyView {
        &mut self.view
    }

    // ---- Data ----

    /// Load the embedded stars, lines and metadata.
    pub fn load_builtin(&mut self) -> bool {
        match BuiltinCatalog::new() {
            Ok(builtin) => {
                self.view.load_catalog(&builtin, &builtin);
                true
            }
            Err(err) => {
                log::warn!("built-in catalog unavailable: {err}");
                false
            }
        }
    }

    /// Load host-supplied base stars, keeping the embedded named stars and
    /// constellation lines.
    pub fn load_catalog_json(&mut self, stars_json: &str) -> bool {
        let builtin = match BuiltinCatalog::new() {
            Ok(builtin) => builtin,
            Err(err) => {
                log::warn!("built-in catalog unavailable: {err}");
                return false;
            }
        };
        let base = JsonCatalog::new(stars_json);
        self.view.load_catalog(&MergedSource { base: &base, builtin: &builtin }, &builtin);
        true
    }

    /// Non-finite coordinates from the host fall back to Greenwich.
    pub fn set_detected_location(&mut self, latitude: f64, longitude: f64) {
        self.view.locate(&FixedLocation(GeoLocation::new(latitude, longitude)));
    }

    pub fn set_custom_location(&mut self, latitude: f64, longitude: f64) {
        self.view.set_custom_location(Some(GeoLocation::new(latitude, longitude)));
    }

    pub fn clear_custom_location(&mut self) {
        self.view.set_custom_location(None);
    }

    /// `keys_json` is a JSON array of constellation abbreviations.
    pub fn set_selected_keys_json(&mut self, keys_json: &str) {
        match serde_json::from_str::<Vec<String>>(keys_json) {
            Ok(keys) => self.view.set_selected_keys(keys),
            Err(err) => log::warn!("ignoring selected keys: {err}"),
        }
    }

    pub fn set_projection(&mut self, name: &str) {
        match ProjectionMode::from_name(name) {
            Some(mode) => self.view.set_projection_mode(mode),
            None => log::warn!("unknown projection mode {name:?}"),
        }
    }

    /// Empty string releases a forced mode.
    pub fn set_forced_projection(&mut self, name: &str) {
        let forced = ProjectionMode::from_name(name);
        if forced.is_none() && !name.is_empty() {
            log::warn!("unknown projection mode {name:?}");
            return;
        }
        self.view.set_forced_projection(forced);
    }

    // ---- Frame ----

    pub fn push_input(&mut self, event: InputEvent) {
        self.view.push_input(event);
    }

    pub fn tick(&mut self, now_ms: f64, wall_ms: f64) {
        self.view.tick(now_ms, wall_ms);
    }

    /// Pending events as a JSON array.
    pub fn drain_events_json(&mut self) -> String {
        let events = self.view.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|err| {
            log::warn!("failed to encode events: {err}");
            "[]".to_string()
        })
    }

    /// Current hover target as JSON, or `null`.
    pub fn hover_json(&self) -> String {
        serde_json::to_string(&self.view.hover_info()).unwrap_or_else(|_| "null".to_string())
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn sky_vertices_ptr(&self) -> *const f32 {
        self.view.canvas().sky.buffer_ptr()
    }

    pub fn sky_vertex_count(&self) -> u32 {
        self.view.canvas().sky.vertex_count() as u32
    }

    pub fn haze_vertices_ptr(&self) -> *const f32 {
        self.view.canvas().haze.buffer_ptr()
    }

    pub fn haze_vertex_count(&self) -> u32 {
        self.view.canvas().haze.vertex_count() as u32
    }

    pub fn background(&self) -> [f32; 3] {
        [BACKGROUND.r, BACKGROUND.g, BACKGROUND.b]
    }
}

/// Host base stars overlaid with the embedded named stars.
struct MergedSource<'a> {
    base: &'a JsonCatalog,
    builtin: &'a BuiltinCatalog,
}

impl CatalogSource for MergedSource<'_> {
    fn load(&self) -> Result<Vec<CatalogStar>, ServiceError> {
        self.base.load()
    }

    fn named_stars(&self) -> Vec<CatalogStar> {
        self.builtin.named_stars()
    }

    fn cache_key(&self) -> Option<String> {
        self.base.cache_key().map(|key| format!("{key}+named"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALL: f64 = 1_710_936_000_000.0;

    #[test]
    fn bad_config_falls_back_to_defaults() {
        let runner = SkyRunner::from_config_json("{not json");
        assert_eq!(runner.view().config().recompute_interval_ms, 2000.0);
    }

    #[test]
    fn partial_config_is_applied() {
        let runner = SkyRunner::from_config_json(r#"{"projection":"accurate"}"#);
        assert_eq!(runner.view().projection_blend(), 1.0);
    }

    #[test]
    fn first_tick_emits_loaded_json() {
        let mut runner = SkyRunner::new(SkyConfig {
            filler_star_count: 0,
            ..SkyConfig::default()
        });
        assert!(runner.load_builtin());
        runner.tick(0.0, WALL);
        assert_eq!(runner.drain_events_json(), r#"[{"type":"loaded"}]"#);
        assert_eq!(runner.drain_events_json(), "[]");
        assert!(runner.sky_vertex_count() > 0);
        assert_eq!(runner.hover_json(), "null");
    }

    #[test]
    fn host_catalog_keeps_named_stars() {
        let mut runner = SkyRunner::new(SkyConfig {
            filler_star_count: 0,
            ..SkyConfig::default()
        });
        let named = BuiltinCatalog::new().unwrap().named_stars().len();
        assert!(runner.load_catalog_json("[]"));
        let len = runner.view().catalog().len();
        assert!(len > 0 && len <= named);
    }

    #[test]
    fn repeated_host_catalog_is_built_once() {
        let mut runner = SkyRunner::new(SkyConfig::default());
        assert!(runner.load_catalog_json("[]"));
        let first: *const _ = runner.view().catalog();
        assert!(runner.load_catalog_json("[]"));
        assert!(std::ptr::eq(first, runner.view().catalog()));
    }

    #[test]
    fn broken_detected_location_falls_back_to_greenwich() {
        let mut runner = SkyRunner::new(SkyConfig::default());
        runner.set_detected_location(52.5, 13.4);
        assert_eq!(runner.view().state().observer.location(), GeoLocation::new(52.5, 13.4));
        runner.set_detected_location(f64::NAN, 13.4);
        assert_eq!(runner.view().state().observer.location(), GeoLocation::GREENWICH);
    }

    #[test]
    fn selected_keys_and_projection_names() {
        let mut runner = SkyRunner::new(SkyConfig::default());
        runner.set_selected_keys_json(r#"["Ori","UMa"]"#);
        runner.set_selected_keys_json("nope");
        assert_eq!(runner.view().state().selected.len(), 2);

        runner.set_projection("sideways");
        assert_eq!(runner.view().state().projection.mode(), ProjectionMode::Fill);
        runner.set_projection("accurate");
        assert_eq!(runner.view().state().projection.mode(), ProjectionMode::Accurate);
    }
}
