use js_sys::{Object, Reflect};
use pwa_sw::click_action;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_service_worker);

fn click_event(action: Option<&str>) -> JsValue {
    let event = Object::new();
    if let Some(action) = action {
        Reflect::set(&event, &JsValue::from_str("action"), &JsValue::from_str(action))
            .expect("set action");
    }
    event.into()
}

#[wasm_bindgen_test]
fn button_clicks_report_their_action() {
    assert_eq!(click_action(&click_event(Some("update"))), "update");
    assert_eq!(click_action(&click_event(Some("dismiss"))), "dismiss");
}

#[wasm_bindgen_test]
fn body_click_has_empty_action() {
    assert_eq!(click_action(&click_event(Some(""))), "");
    assert_eq!(click_action(&click_event(None)), "");
}
