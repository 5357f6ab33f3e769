//! Browser glue for the SRS search portal: the map popup that clusters search
//! result locations, and the index selector synchronization on the search form.

pub mod bindings;
pub mod browser;
pub mod components;
pub mod config;
pub mod error;
pub mod model;
pub mod state;
pub mod util;

pub use config::{HintPolicy, PopupConfig, SearchFormConfig, WindowFeatures};
pub use error::GlueError;
pub use model::{GeoBounds, GeoPoint, Location, PopupMessage, SelectOption};
