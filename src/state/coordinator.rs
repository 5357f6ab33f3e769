use std::cell::Cell;
use std::rc::Rc;

use crate::config::PopupConfig;
use crate::error::GlueError;
use crate::model::{Location, PopupMessage};

/// Opens the secondary window hosting the map.
pub trait PopupHost {
    type Window: PopupWindow;
    fn open(&self, url: &str, name: &str, features: &str) -> Result<Self::Window, GlueError>;
}

/// A window handle owned by the browser; it may be closed at any time.
pub trait PopupWindow {
    fn is_closed(&self) -> bool;
    fn post(&self, msg: &PopupMessage) -> Result<(), GlueError>;
    fn focus(&self);
    fn close(&self);
}

/// Set on page teardown; stops any further delivery.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopupState {
    NoWindow,
    WindowOpening,
    WindowReady,
}

pub struct PopupCoordinator<H: PopupHost> {
    config: PopupConfig,
    host: H,
    window: Option<H::Window>,
    ready: bool,
    pending: Option<Vec<Location>>,
    delivered: bool,
    cancel: CancelToken,
}

impl<H: PopupHost> PopupCoordinator<H> {
    pub fn new(host: H, config: PopupConfig) -> Self {
        Self {
            config,
            host,
            window: None,
            ready: false,
            pending: None,
            delivered: false,
            cancel: CancelToken::default(),
        }
    }

    pub fn configure(&mut self, config: PopupConfig) {
        self.config = config;
    }

    pub fn configure_base_path(&mut self, path: impl Into<String>) {
        self.config.base_path = path.into();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Window lifecycle as last observed; closure is only noticed here, lazily.
    pub fn state(&self) -> PopupState {
        match &self.window {
            Some(w) if !w.is_closed() => {
                if self.ready {
                    PopupState::WindowReady
                } else {
                    PopupState::WindowOpening
                }
            }
            _ => PopupState::NoWindow,
        }
    }

    pub fn show_locations(&mut self, locations: Vec<Location>) -> Result<(), GlueError> {
        if self.pending.is_some() && !self.delivered {
            log::debug!("undelivered locations superseded by a newer request");
        }
        self.pending = Some(locations);
        self.delivered = false;
        self.display()
    }

    pub fn show_location(&mut self, location: Location) -> Result<(), GlueError> {
        self.show_locations(vec![location])
    }

    /// Readiness notification from the popup.
    pub fn on_ready(&mut self) -> Result<(), GlueError> {
        if self.cancel.is_cancelled() {
            return Ok(());
        }
        log::info!("map window reported ready");
        self.ready = true;
        self.deliver()
    }

    pub fn close_map(&mut self) {
        if let Some(w) = &self.window {
            if !w.is_closed() {
                w.close();
            }
        }
        self.ready = false;
    }

    /// Page teardown: drop the payload and ignore anything that arrives later.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.pending = None;
    }

    fn display(&mut self) -> Result<(), GlueError> {
        if self.pending.is_none() || self.cancel.is_cancelled() {
            return Ok(());
        }
        self.ensure_window()?;
        if self.ready {
            self.deliver()
        } else {
            log::debug!("map window not ready yet, holding locations");
            Ok(())
        }
    }

    fn ensure_window(&mut self) -> Result<(), GlueError> {
        if self.window.as_ref().is_some_and(|w| !w.is_closed()) {
            return Ok(());
        }
        let url = self.config.document_url();
        let features = self.config.features.to_feature_string();
        let window = self.host.open(&url, &self.config.window_name, &features)?;
        log::info!("opened map window at {url}");
        self.window = Some(window);
        self.ready = false;
        Ok(())
    }

    fn deliver(&mut self) -> Result<(), GlueError> {
        let (Some(window), Some(locations)) = (&self.window, &self.pending) else {
            return Ok(());
        };
        if window.is_closed() {
            return Ok(());
        }
        window.post(&PopupMessage::ShowMarkers {
            locations: locations.clone(),
        })?;
        window.focus();
        self.delivered = true;
        log::info!("sent {} locations to the map window", locations.len());
        Ok(())
    }
}
