// Search page side: opens the map window and forwards locations once it is ready

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{MessageEvent, Window};

use super::{own_origin, window};
use crate::config::PopupConfig;
use crate::error::GlueError;
use crate::model::PopupMessage;
use crate::state::{PopupCoordinator, PopupHost, PopupWindow};

pub struct BrowserPopupHost {
    window: Window,
    origin: String,
}

impl PopupHost for BrowserPopupHost {
    type Window = BrowserPopup;

    fn open(&self, url: &str, name: &str, features: &str) -> Result<BrowserPopup, GlueError> {
        let popup = self
            .window
            .open_with_url_and_target_and_features(url, name, features)?
            .ok_or(GlueError::WindowBlocked)?;
        Ok(BrowserPopup {
            window: popup,
            origin: self.origin.clone(),
        })
    }
}

pub struct BrowserPopup {
    window: Window,
    origin: String,
}

impl PopupWindow for BrowserPopup {
    fn is_closed(&self) -> bool {
        self.window.closed().unwrap_or(true)
    }

    fn post(&self, msg: &PopupMessage) -> Result<(), GlueError> {
        self.window
            .post_message(&JsValue::from_str(&msg.to_json()?), &self.origin)?;
        Ok(())
    }

    fn focus(&self) {
        if let Err(err) = self.window.focus() {
            log::debug!("map window refused focus: {err:?}");
        }
    }

    fn close(&self) {
        if let Err(err) = self.window.close() {
            log::debug!("could not close map window: {err:?}");
        }
    }
}

pub type Coordinator = PopupCoordinator<BrowserPopupHost>;

/// Per-page owner of the popup coordinator and its window listeners.
pub struct PageSession {
    coordinator: Rc<RefCell<Coordinator>>,
    _listeners: Vec<EventListener>,
}

impl PageSession {
    pub fn new(config: PopupConfig) -> Result<Self, GlueError> {
        let win = window()?;
        let origin = own_origin(&win)?;
        let host = BrowserPopupHost {
            window: win.clone(),
            origin: origin.clone(),
        };
        let coordinator = Rc::new(RefCell::new(PopupCoordinator::new(host, config)));

        let message = {
            let coordinator = coordinator.clone();
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
                // other scripts on the page may post their own messages
                if let Ok(PopupMessage::Ready) = PopupMessage::from_json(&raw) {
                    if let Err(err) = coordinator.borrow_mut().on_ready() {
                        log::warn!("could not deliver locations: {err}");
                    }
                }
            })
        };
        let unload = {
            let coordinator = coordinator.clone();
            EventListener::new(&win, "unload", move |_| coordinator.borrow_mut().cancel())
        };

        Ok(Self {
            coordinator,
            _listeners: vec![message, unload],
        })
    }
}

thread_local! {
    static SESSION: RefCell<Option<PageSession>> = const { RefCell::new(None) };
}

/// Installs the page session unless one exists already.
pub fn install(config: PopupConfig) -> Result<(), GlueError> {
    SESSION.with(|s| {
        let mut s = s.borrow_mut();
        if s.is_none() {
            *s = Some(PageSession::new(config)?);
            log::debug!("map session installed");
        }
        Ok(())
    })
}

/// Runs `f` against the page's coordinator, creating the session on first use.
pub fn with_coordinator<R>(f: impl FnOnce(&mut Coordinator) -> R) -> Result<R, GlueError> {
    install(PopupConfig::default())?;
    SESSION.with(|s| {
        let s = s.borrow();
        let session = s
            .as_ref()
            .ok_or_else(|| GlueError::MissingElement("map session".to_string()))?;
        let mut coordinator = session.coordinator.borrow_mut();
        Ok(f(&mut coordinator))
    })
}
