//! Functions exported to page scripts.
//!
//! None of them throw: failures are logged and the call becomes a no-op.
//! The search page also gets them as `window` properties, because its
//! markup calls them from inline `onclick`/`onload` handlers.

use std::cell::RefCell;

use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::browser::{GlobalFunction, document, form, map_popup, number, opener, parallel_locations};
use crate::config::{PopupConfig, SearchFormConfig};
use crate::error::GlueError;
use crate::model::Location;

fn report(op: &str, result: Result<(), GlueError>) {
    if let Err(err) = result {
        log::warn!("{op}: {err}");
    }
}

fn display(locations: Vec<Location>) {
    report(
        "showLocations",
        opener::with_coordinator(|c| c.show_locations(locations)).and_then(|r| r),
    );
}

#[wasm_bindgen(js_name = setGoogleMapBasePath)]
pub fn set_google_map_base_path(path: &str) {
    report(
        "setGoogleMapBasePath",
        opener::with_coordinator(|c| c.configure_base_path(path)),
    );
}

#[wasm_bindgen(js_name = configureMapPopup)]
pub fn configure_map_popup(json: &str) {
    let result = PopupConfig::from_json(json).and_then(|cfg| opener::with_coordinator(|c| c.configure(cfg)));
    report("configureMapPopup", result);
}

#[wasm_bindgen(js_name = showLocations)]
pub fn show_locations(longitudes: &Array, latitudes: &Array, names: &Array) {
    display(parallel_locations(longitudes, latitudes, names));
}

#[wasm_bindgen(js_name = showLocation)]
pub fn show_location(longitude: f64, latitude: f64, name: Option<String>) {
    let location = Location::new(longitude, latitude, name.unwrap_or_default());
    report(
        "showLocation",
        opener::with_coordinator(|c| c.show_location(location)).and_then(|r| r),
    );
}

#[wasm_bindgen(js_name = closeMap)]
pub fn close_map() {
    report("closeMap", opener::with_coordinator(|c| c.close_map()));
}

#[wasm_bindgen(js_name = initAdjustSubIndexName)]
pub fn init_adjust_sub_index_name() {
    let result = document().and_then(|doc| form::install(&doc, SearchFormConfig::default()));
    report("initAdjustSubIndexName", result.map(|_| ()));
}

/// Readiness flag of the popup page, for callers inspecting the window directly.
#[wasm_bindgen(js_name = isInitialized)]
pub fn is_initialized() -> bool {
    map_popup::is_initialized()
}

/// Direct entry point on the popup page, taking the legacy parallel arrays.
#[wasm_bindgen(js_name = addMarkersToMap)]
pub fn add_markers_to_map(longitudes: &Array, latitudes: &Array, names: &Array) {
    map_popup::show_markers(&parallel_locations(longitudes, latitudes, names));
}

fn with_text(op: &'static str, value: JsValue, f: impl FnOnce(&str)) {
    match value.as_string() {
        Some(text) => f(&text),
        None => log::warn!("{op}: expected a string argument"),
    }
}

thread_local! {
    static SEARCH_GLOBALS: RefCell<Vec<GlobalFunction>> = const { RefCell::new(Vec::new()) };
}

/// Publishes the opener entry points on `window`, replacing earlier ones.
pub fn expose_search_page(window: &Window) -> Result<(), GlueError> {
    // the old set deletes its properties on drop, so it goes first
    SEARCH_GLOBALS.with(|g| g.borrow_mut().clear());
    let globals = vec![
        GlobalFunction::install(window, "setGoogleMapBasePath", |path, _, _| {
            with_text("setGoogleMapBasePath", path, set_google_map_base_path)
        })?,
        GlobalFunction::install(window, "configureMapPopup", |json, _, _| {
            with_text("configureMapPopup", json, configure_map_popup)
        })?,
        GlobalFunction::install(window, "showLocations", |lng, lat, names| {
            display(parallel_locations(&lng, &lat, &names))
        })?,
        GlobalFunction::install(window, "showLocation", |lng, lat, name| {
            show_location(number(&lng), number(&lat), name.as_string())
        })?,
        GlobalFunction::install(window, "closeMap", |_, _, _| close_map())?,
        GlobalFunction::install(window, "initAdjustSubIndexName", |_, _, _| {
            init_adjust_sub_index_name()
        })?,
    ];
    SEARCH_GLOBALS.with(|g| *g.borrow_mut() = globals);
    Ok(())
}
