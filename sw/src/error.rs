use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SwError {
    #[error("js: {0}")]
    Js(String),

    #[error("precaching into {cache} failed: {reason}")]
    Precache { cache: String, reason: String },

    #[error("network request for {0} failed")]
    Network(String),

    #[error("offline fallback {0} is not cached")]
    NoFallback(String),

    #[error("not running inside a ServiceWorkerGlobalScope")]
    Scope,

    #[error("message: {0}")]
    Message(String),
}

impl SwError {
    pub fn from_js_value(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<serde_wasm_bindgen::Error> for SwError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::Message(err.to_string())
    }
}

impl From<SwError> for JsValue {
    fn from(err: SwError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
