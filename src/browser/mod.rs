//! web-sys backed implementations of the window, map and form seams.

pub mod form;
pub mod gmap;
pub mod map_popup;
pub mod opener;

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Window};

use crate::config::PopupConfig;
use crate::error::GlueError;
use crate::model::Location;

/// Function published as a property of `window` for inline page handlers.
/// Dropping it removes the property again.
pub struct GlobalFunction {
    window: Window,
    name: &'static str,
    _callback: Closure<dyn FnMut(JsValue, JsValue, JsValue)>,
}

impl GlobalFunction {
    /// Installs `f` as `window[name]`. Arguments the caller omits arrive as `undefined`.
    pub fn install(
        window: &Window,
        name: &'static str,
        f: impl FnMut(JsValue, JsValue, JsValue) + 'static,
    ) -> Result<Self, GlueError> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(JsValue, JsValue, JsValue)>);
        Reflect::set(window, &JsValue::from_str(name), callback.as_ref())?;
        Ok(Self {
            window: window.clone(),
            name,
            _callback: callback,
        })
    }
}

impl Drop for GlobalFunction {
    fn drop(&mut self) {
        let target: &Object = self.window.as_ref();
        if let Err(err) = Reflect::delete_property(target, &JsValue::from_str(self.name)) {
            log::debug!("could not remove window.{}: {:?}", self.name, err);
        }
    }
}

/// Sets a boolean property on `window`, e.g. the popup's `initialized` flag.
pub fn set_global_flag(window: &Window, name: &str, value: bool) -> Result<(), GlueError> {
    Reflect::set(window, &JsValue::from_str(name), &JsValue::from_bool(value))?;
    Ok(())
}

fn items(value: &JsValue) -> Vec<JsValue> {
    value
        .dyn_ref::<Array>()
        .map(|a| a.iter().collect())
        .unwrap_or_default()
}

/// Numeric coordinate from a page value; numeric strings are accepted.
pub(crate) fn number(value: &JsValue) -> f64 {
    value
        .as_f64()
        .or_else(|| value.as_string().and_then(|s| s.trim().parse().ok()))
        .unwrap_or(f64::NAN)
}

/// Locations from the three parallel arrays page scripts pass around.
/// Anything that is not an array counts as empty.
pub(crate) fn parallel_locations(longitudes: &JsValue, latitudes: &JsValue, names: &JsValue) -> Vec<Location> {
    let lng: Vec<f64> = items(longitudes).iter().map(number).collect();
    let lat: Vec<f64> = items(latitudes).iter().map(number).collect();
    let labels: Vec<String> = items(names)
        .iter()
        .map(|v| v.as_string().unwrap_or_default())
        .collect();
    Location::from_parallel(&lng, &lat, &labels)
}

pub fn window() -> Result<Window, GlueError> {
    web_sys::window().ok_or_else(|| GlueError::MissingElement("window".to_string()))
}

pub fn document() -> Result<Document, GlueError> {
    window()?
        .document()
        .ok_or_else(|| GlueError::MissingElement("document".to_string()))
}

pub(crate) fn own_origin(window: &Window) -> Result<String, GlueError> {
    Ok(window.location().origin()?)
}

/// Popup settings from the `data-map-config` attribute on `<body>`, if any.
pub fn page_config(document: &Document) -> PopupConfig {
    let raw = document
        .body()
        .and_then(|body| body.get_attribute("data-map-config"));
    match raw {
        Some(raw) => PopupConfig::from_json(&raw).unwrap_or_else(|e| {
            log::warn!("ignoring data-map-config: {e}");
            PopupConfig::default()
        }),
        None => PopupConfig::default(),
    }
}
