pub mod map_window;

pub use map_window::{MapWindow, MapWindowProps};
