use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GlueError {
    #[error("the browser refused to open the map window")]
    WindowBlocked,
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid configuration")]
    Config(#[source] serde_json::Error),
    #[error("invalid popup message")]
    Message(#[source] serde_json::Error),
}

impl From<JsValue> for GlueError {
    fn from(value: JsValue) -> Self {
        GlueError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
