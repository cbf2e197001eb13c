pub mod runner;

pub use runner::SkyRunner;

use std::cell::RefCell;

use sky_engine::InputEvent;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SkyRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. `None` before `sky_init` or after
/// `sky_teardown`.
fn with_runner<R>(f: impl FnOnce(&mut SkyRunner) -> R) -> Option<R> {
    let out = RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f));
    if out.is_none() {
        // console_log may not be installed yet
        web_sys::console::warn_1(&JsValue::from_str("sky: not initialized, call sky_init() first"));
    }
    out
}

/// Create the view. `config_json` may be empty or a partial `SkyConfig`.
#[wasm_bindgen]
pub fn sky_init(config_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = SkyRunner::from_config_json(config_json);
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("sky: initialized");
}

#[wasm_bindgen]
pub fn sky_load_builtin_catalog() -> bool {
    with_runner(|r| r.load_builtin()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn sky_load_catalog(stars_json: &str) -> bool {
    with_runner(|r| r.load_catalog_json(stars_json)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn sky_tick(now_ms: f64, wall_ms: f64) {
    with_runner(|r| r.tick(now_ms, wall_ms));
}

/// `sky_tick` against the browser's wall clock.
#[wasm_bindgen]
pub fn sky_tick_now(now_ms: f64) {
    let wall_ms = js_sys::Date::now();
    with_runner(|r| r.tick(now_ms, wall_ms));
}

/// Stop the view and release it.
#[wasm_bindgen]
pub fn sky_teardown() {
    RUNNER.with(|cell| {
        if let Some(mut runner) = cell.borrow_mut().take() {
            runner.view_mut().teardown();
        }
    });
}

// ---- Location and time ----

#[wasm_bindgen]
pub fn sky_set_detected_location(latitude: f64, longitude: f64) {
    with_runner(|r| r.set_detected_location(latitude, longitude));
}

#[wasm_bindgen]
pub fn sky_set_custom_location(latitude: f64, longitude: f64) {
    with_runner(|r| r.set_custom_location(latitude, longitude));
}

#[wasm_bindgen]
pub fn sky_clear_custom_location() {
    with_runner(|r| r.clear_custom_location());
}

#[wasm_bindgen]
pub fn sky_set_time_offset(hours: f64) {
    with_runner(|r| r.view_mut().set_time_offset_target(hours));
}

/// Jump straight to an offset, skipping the easing.
#[wasm_bindgen]
pub fn sky_jump_time_offset(hours: f64) {
    with_runner(|r| r.view_mut().set_time_offset(hours));
}

#[wasm_bindgen]
pub fn sky_reset_view() {
    with_runner(|r| r.view_mut().reset_view());
}

// ---- Input ----

#[wasm_bindgen]
pub fn sky_pointer_down(id: i32, x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { id, x, y }));
}

#[wasm_bindgen]
pub fn sky_pointer_move(id: i32, x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { id, x, y }));
}

#[wasm_bindgen]
pub fn sky_pointer_up(id: i32, x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { id, x, y }));
}

#[wasm_bindgen]
pub fn sky_pointer_cancel(id: i32) {
    with_runner(|r| r.push_input(InputEvent::PointerCancel { id }));
}

#[wasm_bindgen]
pub fn sky_resize(width: f32, height: f32) {
    with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
}

// ---- Display toggles ----

#[wasm_bindgen]
pub fn sky_set_projection(mode: &str) {
    with_runner(|r| r.set_projection(mode));
}

#[wasm_bindgen]
pub fn sky_toggle_projection() {
    with_runner(|r| r.view_mut().toggle_projection());
}

/// Pass an empty string to release the override.
#[wasm_bindgen]
pub fn sky_set_forced_projection(mode: &str) {
    with_runner(|r| r.set_forced_projection(mode));
}

#[wasm_bindgen]
pub fn sky_set_show_all_constellations(on: bool) {
    with_runner(|r| r.view_mut().set_show_all_constellations(on));
}

#[wasm_bindgen]
pub fn sky_set_show_all_stars(on: bool) {
    with_runner(|r| r.view_mut().set_show_all_stars(on));
}

#[wasm_bindgen]
pub fn sky_set_show_solar_system(on: bool) {
    with_runner(|r| r.view_mut().set_show_solar_system(on));
}

#[wasm_bindgen]
pub fn sky_set_show_milky_way(on: bool) {
    with_runner(|r| r.view_mut().set_show_milky_way(on));
}

#[wasm_bindgen]
pub fn sky_set_star_brightness(mul: f64) {
    with_runner(|r| r.view_mut().set_star_brightness(mul));
}

#[wasm_bindgen]
pub fn sky_set_selected_keys(keys_json: &str) {
    with_runner(|r| r.set_selected_keys_json(keys_json));
}

// ---- Data accessors ----

/// Events since the last call, as a JSON array.
#[wasm_bindgen]
pub fn sky_drain_events() -> String {
    with_runner(|r| r.drain_events_json()).unwrap_or_else(|| "[]".to_string())
}

#[wasm_bindgen]
pub fn sky_hover() -> String {
    with_runner(|r| r.hover_json()).unwrap_or_else(|| "null".to_string())
}

#[wasm_bindgen]
pub fn get_sky_vertices_ptr() -> *const f32 {
    with_runner(|r| r.sky_vertices_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_sky_vertex_count() -> u32 {
    with_runner(|r| r.sky_vertex_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_haze_vertices_ptr() -> *const f32 {
    with_runner(|r| r.haze_vertices_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_haze_vertex_count() -> u32 {
    with_runner(|r| r.haze_vertex_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_background_r() -> f32 {
    with_runner(|r| r.background()[0]).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_background_g() -> f32 {
    with_runner(|r| r.background()[1]).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_background_b() -> f32 {
    with_runner(|r| r.background()[2]).unwrap_or(0.0)
}
