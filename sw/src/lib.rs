//! Service worker for the PWA shell.
//!
//! `www/sw.js` loads this module and forwards each platform event to the
//! matching `on_*` export, handing the returned promise to `waitUntil` or
//! `respondWith`. Listeners must exist at first script evaluation, so they are
//! declared in JS and only the handling lives here.

use std::future::Future;

use js_sys::{Promise, Reflect};
use log::{LevelFilter, debug, error, info};
use pwa_common::{PageMessage, logger};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{ExtendableMessageEvent, FetchEvent, NotificationEvent, PushEvent, Request};

pub mod config;
pub mod error;
pub mod http;
pub mod platform;
pub mod push;
pub mod web;
pub mod worker;

#[cfg(test)]
mod testing;

pub use config::WorkerConfig;
pub use error::SwError;
pub use platform::Platform;
pub use web::WebPlatform;
pub use worker::ServiceWorker;

fn worker() -> Result<ServiceWorker<WebPlatform>, SwError> {
    Ok(ServiceWorker::new(WorkerConfig::default(), WebPlatform::new()?))
}

fn settle<F>(event: &'static str, task: F) -> Promise
where
    F: Future<Output = Result<(), SwError>> + 'static,
{
    future_to_promise(async move {
        match task.await {
            Ok(()) => Ok(JsValue::UNDEFINED),
            Err(err) => {
                error!("{event}: {err}");
                Err(err.into())
            }
        }
    })
}

#[wasm_bindgen]
pub fn start() {
    logger::init("sw", LevelFilter::Info);
    info!("loaded, serving from {}", config::cache_name(config::CACHE_VERSION));
}

async fn install() -> Result<(), SwError> {
    worker()?.on_install().await
}

async fn activate() -> Result<(), SwError> {
    worker()?.on_activate().await
}

async fn fetch(request: Request) -> Result<JsValue, JsValue> {
    match worker()?.on_fetch(&request).await {
        Ok(response) => Ok(response.into()),
        Err(err) => {
            debug!("fetch {}: {err}", request.url());
            Err(err.into())
        }
    }
}

async fn message(data: JsValue) -> Result<(), SwError> {
    let message: PageMessage = serde_wasm_bindgen::from_value(data)?;
    worker()?.on_message(message).await
}

async fn push_received(text: Option<String>) -> Result<(), SwError> {
    worker()?.on_push(text.as_deref()).await
}

async fn notification_click(action: String, tag: Option<String>) -> Result<(), SwError> {
    let tag = tag.as_deref().filter(|tag| !tag.is_empty());
    worker()?.on_notification_click(&action, tag).await
}

/// The `action` of a `notificationclick` event, empty when the body was
/// clicked rather than a button. `NotificationEvent` has no binding for it.
pub fn click_action(event: &JsValue) -> String {
    Reflect::get(event, &JsValue::from_str("action"))
        .ok()
        .and_then(|action| action.as_string())
        .unwrap_or_default()
}

#[wasm_bindgen]
pub fn on_install() -> Promise {
    settle("install", install())
}

#[wasm_bindgen]
pub fn on_activate() -> Promise {
    settle("activate", activate())
}

#[wasm_bindgen]
pub fn on_fetch(event: FetchEvent) -> Promise {
    future_to_promise(fetch(event.request()))
}

#[wasm_bindgen]
pub fn on_message(event: ExtendableMessageEvent) -> Promise {
    settle("message", message(event.data()))
}

#[wasm_bindgen]
pub fn on_push(event: PushEvent) -> Promise {
    settle("push", push_received(event.data().map(|data| data.text())))
}

#[wasm_bindgen]
pub fn on_notification_click(event: NotificationEvent) -> Promise {
    let notification = event.notification();
    notification.close();

    let action = click_action(&event);
    settle("notificationclick", notification_click(action, notification.tag()))
}
