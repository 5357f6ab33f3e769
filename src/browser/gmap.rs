// Bindings to the Google Maps v2 API and the Clusterer helper loaded by the popup page

use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::model::{GeoBounds, GeoPoint};
use crate::state::MapWidget;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = GBrowserIsCompatible)]
    fn browser_is_compatible() -> bool;

    #[wasm_bindgen(js_name = GUnload)]
    fn g_unload();
}

#[wasm_bindgen]
extern "C" {
    type GMap2;

    #[wasm_bindgen(constructor)]
    fn new(container: &Element) -> GMap2;

    #[wasm_bindgen(method, js_name = addControl)]
    fn add_control(this: &GMap2, control: &JsValue);

    #[wasm_bindgen(method, js_name = getBoundsZoomLevel)]
    fn get_bounds_zoom_level(this: &GMap2, bounds: &GLatLngBounds) -> u32;

    #[wasm_bindgen(method, js_name = setCenter)]
    fn set_center(this: &GMap2, center: &GLatLng, zoom: u32, map_type: &JsValue);
}

#[wasm_bindgen]
extern "C" {
    type GLatLng;

    #[wasm_bindgen(constructor)]
    fn new(lat: f64, lng: f64) -> GLatLng;
}

#[wasm_bindgen]
extern "C" {
    type GLatLngBounds;

    #[wasm_bindgen(constructor)]
    fn new(south_west: &GLatLng, north_east: &GLatLng) -> GLatLngBounds;
}

#[wasm_bindgen]
extern "C" {
    type GMarker;

    #[wasm_bindgen(constructor)]
    fn new(point: &GLatLng, options: &JsValue) -> GMarker;
}

#[wasm_bindgen]
extern "C" {
    type GLargeMapControl;

    #[wasm_bindgen(constructor)]
    fn new() -> GLargeMapControl;
}

#[wasm_bindgen]
extern "C" {
    type GMapTypeControl;

    #[wasm_bindgen(constructor)]
    fn new() -> GMapTypeControl;
}

#[wasm_bindgen]
extern "C" {
    type Clusterer;

    #[wasm_bindgen(constructor)]
    fn new(map: &GMap2) -> Clusterer;

    #[wasm_bindgen(method, js_name = ClearCluster)]
    fn clear_cluster(this: &Clusterer, target: &Clusterer);

    #[wasm_bindgen(method, js_name = AddMarker)]
    fn add_marker(this: &Clusterer, marker: &GMarker, cluster_title: &str);
}

fn global_defined(name: &str) -> bool {
    Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .map(|v| !v.is_undefined())
        .unwrap_or(false)
}

fn lat_lng(p: GeoPoint) -> GLatLng {
    GLatLng::new(p.lat, p.lng)
}

fn hybrid_map_type() -> JsValue {
    Reflect::get(&js_sys::global(), &JsValue::from_str("G_HYBRID_MAP")).unwrap_or(JsValue::UNDEFINED)
}

/// Releases widget resources when the popup unloads.
pub fn unload() {
    if global_defined("GUnload") {
        g_unload();
    }
}

pub struct GMapWidget {
    map: GMap2,
    clusterer: Clusterer,
}

impl GMapWidget {
    /// Creates the map inside `container`, or `None` when the widget scripts are
    /// missing or report the browser as incompatible.
    pub fn attach(container: &Element) -> Option<Self> {
        if !global_defined("GBrowserIsCompatible") || !global_defined("Clusterer") {
            log::warn!("map scripts not loaded");
            return None;
        }
        if !browser_is_compatible() {
            log::warn!("browser not supported by the map widget");
            return None;
        }
        let map = GMap2::new(container);
        map.add_control(&GLargeMapControl::new());
        map.add_control(&GMapTypeControl::new());
        let clusterer = Clusterer::new(&map);
        Some(Self { map, clusterer })
    }
}

impl MapWidget for GMapWidget {
    fn clear_markers(&mut self) {
        self.clusterer.clear_cluster(&self.clusterer);
    }

    fn add_marker(&mut self, point: GeoPoint, hint: Option<&str>, cluster_hint: &str) {
        let options = Object::new();
        if let Some(hint) = hint {
            let _ = Reflect::set(&options, &JsValue::from_str("title"), &JsValue::from_str(hint));
        }
        let marker = GMarker::new(&lat_lng(point), &options);
        self.clusterer.add_marker(&marker, cluster_hint);
    }

    fn bounds_zoom_level(&self, bounds: &GeoBounds) -> u32 {
        match (bounds.south_west(), bounds.north_east()) {
            (Some(sw), Some(ne)) => self
                .map
                .get_bounds_zoom_level(&GLatLngBounds::new(&lat_lng(sw), &lat_lng(ne))),
            _ => 0,
        }
    }

    fn set_center(&mut self, center: GeoPoint, zoom: u32) {
        self.map.set_center(&lat_lng(center), zoom, &hybrid_map_type());
    }
}
