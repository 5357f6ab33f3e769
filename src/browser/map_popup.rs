// Popup document side: owns the marker surface and answers the opener

use std::cell::{Cell, RefCell};

use gloo::events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, MessageEvent, Window};

use super::gmap::{self, GMapWidget};
use super::{GlobalFunction, own_origin, parallel_locations, set_global_flag, window};
use crate::config::PopupConfig;
use crate::error::GlueError;
use crate::model::{Location, PopupMessage};
use crate::state::MarkerSurface;

/// Readiness flag the opener page reads as `mapWindow.initialized`.
pub const INITIALIZED_FLAG: &str = "initialized";

thread_local! {
    static SURFACE: RefCell<Option<MarkerSurface<GMapWidget>>> = const { RefCell::new(None) };
    static INITIALIZED: Cell<bool> = const { Cell::new(false) };
}

/// Listeners and window globals of a running popup; dropping it detaches them.
pub struct PopupSession {
    window: Window,
    _globals: Vec<GlobalFunction>,
    _listeners: Vec<EventListener>,
}

impl Drop for PopupSession {
    fn drop(&mut self) {
        mark_initialized(&self.window, false);
    }
}

pub fn is_initialized() -> bool {
    INITIALIZED.with(Cell::get)
}

fn mark_initialized(win: &Window, value: bool) {
    INITIALIZED.with(|i| i.set(value));
    if let Err(err) = set_global_flag(win, INITIALIZED_FLAG, value) {
        log::debug!("could not set window.{INITIALIZED_FLAG}: {err}");
    }
}

pub fn show_markers(locations: &[Location]) -> usize {
    SURFACE.with(|s| {
        s.borrow_mut()
            .as_mut()
            .map(|surface| surface.replace_markers(locations))
            .unwrap_or(0)
    })
}

/// Creates the map inside `container`, starts listening for the opener and
/// announces readiness once the widget is up.
pub fn start(container: &Element, config: &PopupConfig) -> Result<PopupSession, GlueError> {
    let win = window()?;
    let origin = own_origin(&win)?;
    mark_initialized(&win, false);

    let surface = MarkerSurface::new(
        GMapWidget::attach(container),
        config.max_zoom,
        config.hint_policy,
        config.cluster_hint.clone(),
    );
    let ready = surface.is_initialized();
    SURFACE.with(|s| *s.borrow_mut() = Some(surface));

    let add_markers = GlobalFunction::install(&win, "addMarkersToMap", |lng, lat, names| {
        let placed = show_markers(&parallel_locations(&lng, &lat, &names));
        log::debug!("displayed {placed} markers");
    })?;

    let message = {
        let origin = origin.clone();
        EventListener::new(&win, "message", move |e| {
            let Some(e) = e.dyn_ref::<MessageEvent>() else {
                return;
            };
            if e.origin() != origin {
                return;
            }
            let Some(raw) = e.data().as_string() else {
                return;
            };
            match PopupMessage::from_json(&raw) {
                Ok(PopupMessage::ShowMarkers { locations }) => {
                    let placed = show_markers(&locations);
                    log::debug!("displayed {placed} markers");
                }
                Ok(PopupMessage::Ready) => {}
                Err(err) => log::warn!("dropping message from opener: {err}"),
            }
        })
    };
    let unload = {
        let target = win.clone();
        EventListener::new(&win, "unload", move |_| {
            mark_initialized(&target, false);
            SURFACE.with(|s| s.borrow_mut().take());
            gmap::unload();
        })
    };

    if ready {
        mark_initialized(&win, true);
        if let Err(err) = notify_opener(&win, &origin) {
            log::warn!("could not notify the opener: {err}");
        }
    }
    Ok(PopupSession {
        window: win,
        _globals: vec![add_markers],
        _listeners: vec![message, unload],
    })
}

fn notify_opener(win: &Window, origin: &str) -> Result<(), GlueError> {
    let opener = win.opener()?;
    if opener.is_null() || opener.is_undefined() {
        log::debug!("map window has no opener");
        return Ok(());
    }
    let opener: Window = opener.unchecked_into();
    opener.post_message(&JsValue::from_str(&PopupMessage::Ready.to_json()?), origin)?;
    log::info!("map window ready");
    Ok(())
}
