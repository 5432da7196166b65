//! Notification opt-in and push subscription.
//!
//! Everything here is reached through `Reflect` so that browsers lacking
//! `Notification` or `PushManager` degrade to a no-op instead of throwing.

use std::cell::RefCell;
use std::rc::Rc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use js_sys::{JSON, Object, Reflect, Uint8Array};
use log::{debug, info, warn};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::ServiceWorkerRegistration;

use crate::Shell;
use crate::banner::{Banner, BannerSpec};
use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::js::{await_value, js_function, js_value_to_string, property, window};

pub const GRANTED: &str = "granted";
pub const DEFAULT: &str = "default";

fn notification_class() -> Option<JsValue> {
    let win: JsValue = window().ok()?.into();
    property(&win, "Notification")
}

/// `Notification.permission`, or `None` where notifications don't exist.
pub fn permission() -> Option<String> {
    property(&notification_class()?, "permission").and_then(|value| value.as_string())
}

/// The opt-in banner is only worth showing while the browser has never
/// asked; a grant or a denial both settle the question.
pub fn should_offer(permission: Option<&str>) -> bool {
    permission == Some(DEFAULT)
}

/// Decodes a base64url VAPID public key into the 65-byte uncompressed point
/// `pushManager.subscribe` expects.
pub fn application_server_key(key: &str) -> Result<Vec<u8>, ShellError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(key.trim().trim_end_matches('='))
        .map_err(|err| ShellError::ServerKey(err.to_string()))?;
    if bytes.len() != 65 || bytes[0] != 0x04 {
        return Err(ShellError::ServerKey(format!(
            "expected 65-byte uncompressed P-256 point, got {} bytes",
            bytes.len()
        )));
    }
    Ok(bytes)
}

async fn request_permission() -> Result<String, ShellError> {
    let class = notification_class().ok_or(ShellError::Unsupported("Notification"))?;
    let promise = js_function(&class, "requestPermission")?
        .call0(&class)
        .map_err(ShellError::from_js_value)?;
    let outcome = await_value(promise).await?;
    Ok(js_value_to_string(&outcome))
}

async fn subscribe(registration: &ServiceWorkerRegistration, server_key: &[u8]) -> Result<JsValue, ShellError> {
    let push_manager =
        property(registration, "pushManager").ok_or(ShellError::Unsupported("PushManager"))?;

    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("userVisibleOnly"), &JsValue::TRUE)
        .map_err(ShellError::from_js_value)?;
    Reflect::set(
        &options,
        &JsValue::from_str("applicationServerKey"),
        &Uint8Array::from(server_key),
    )
    .map_err(ShellError::from_js_value)?;

    let promise = js_function(&push_manager, "subscribe")?
        .call1(&push_manager, &options)
        .map_err(ShellError::from_js_value)?;
    await_value(promise).await
}

fn store_subscription(subscription: &JsValue, key: &str) -> Result<(), ShellError> {
    let serialized: String = JSON::stringify(subscription)
        .map_err(ShellError::from_js_value)?
        .into();
    let storage = window()?
        .local_storage()
        .map_err(ShellError::from_js_value)?
        .ok_or(ShellError::Unsupported("localStorage"))?;
    storage
        .set_item(key, &serialized)
        .map_err(ShellError::from_js_value)
}

/// Asks for permission and, once granted, subscribes and keeps the
/// subscription locally. Returns the permission the user settled on.
pub async fn enable(registration: &ServiceWorkerRegistration, config: &ShellConfig) -> Result<String, ShellError> {
    let outcome = request_permission().await?;
    if outcome != GRANTED {
        return Ok(outcome);
    }

    let server_key = application_server_key(&config.server_key)?;
    let subscription = subscribe(registration, &server_key).await?;
    store_subscription(&subscription, &config.subscription_key)?;
    info!("push subscription stored under {}", config.subscription_key);

    Ok(outcome)
}

/// Shows the opt-in banner when notification permission is still undecided.
pub fn offer(shell: &Rc<RefCell<Shell>>, registration: ServiceWorkerRegistration) -> Result<(), ShellError> {
    let current = permission();
    if !should_offer(current.as_deref()) {
        debug!("notification opt-in not offered (permission {:?})", current);
        return Ok(());
    }

    let (document, config) = {
        let shell = shell.borrow();
        (shell.document.clone(), shell.config.clone())
    };
    let shell = Rc::clone(shell);
    Banner::show(&document, &BannerSpec::NOTIFICATIONS, move || {
        spawn_local(async move {
            match enable(&registration, &config).await {
                Ok(outcome) => info!("notification permission: {outcome}"),
                Err(err) => {
                    warn!("enabling notifications: {err}");
                    shell
                        .borrow()
                        .set_status("error", &format!("Could not enable notifications: {err}"));
                }
            }
        });
    })?;

    Ok(())
}
