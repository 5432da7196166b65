use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Window;

use crate::error::ShellError;

pub fn window() -> Result<Window, ShellError> {
    web_sys::window().ok_or(ShellError::Missing("window"))
}

pub fn js_value_to_string(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// `target[name]`, or `None` when absent, `null` or `undefined`.
pub fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_null() && !value.is_undefined())
}

pub fn js_function(target: &JsValue, name: &str) -> Result<Function, ShellError> {
    Reflect::get(target, &JsValue::from_str(name))
        .map_err(ShellError::from_js_value)?
        .dyn_into::<Function>()
        .map_err(|_| ShellError::Js(format!("{} missing", name)))
}

pub async fn await_value(value: JsValue) -> Result<JsValue, ShellError> {
    JsFuture::from(Promise::from(value))
        .await
        .map_err(ShellError::from_js_value)
}
