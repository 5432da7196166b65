use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{0}")]
    Js(String),

    #[error("disabled via nosw=1")]
    Disabled,

    #[error("{0} unsupported")]
    Unsupported(&'static str),

    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid application server key: {0}")]
    ServerKey(String),

    #[error("message: {0}")]
    Message(String),
}

impl ShellError {
    pub fn from_js_value(value: JsValue) -> Self {
        Self::Js(crate::js::js_value_to_string(&value))
    }
}

impl From<serde_wasm_bindgen::Error> for ShellError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::Message(err.to_string())
    }
}

impl From<ShellError> for JsValue {
    fn from(err: ShellError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
