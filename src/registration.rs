use js_sys::Reflect;
use log::{debug, info, warn};
use pwa_common::{PageMessage, WorkerMessage};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Event, MessageEvent, RegistrationOptions, ServiceWorker, ServiceWorkerContainer,
    ServiceWorkerRegistration, ServiceWorkerState,
};

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::js::window;

pub fn should_register_service_worker(search: &str) -> Result<(), ShellError> {
    if search.contains("nosw=1") {
        return Err(ShellError::Disabled);
    }

    Ok(())
}

pub fn service_worker_container() -> Result<ServiceWorkerContainer, ShellError> {
    let nav_js: JsValue = window()?.navigator().into();

    let has_sw = Reflect::has(&nav_js, &JsValue::from_str("serviceWorker"))
        .map_err(ShellError::from_js_value)?;
    if !has_sw {
        return Err(ShellError::Unsupported("service worker"));
    }

    let sw_container = Reflect::get(&nav_js, &JsValue::from_str("serviceWorker"))
        .map_err(ShellError::from_js_value)?;
    if sw_container.is_undefined() || sw_container.is_null() {
        return Err(ShellError::Unsupported("service worker"));
    }

    sw_container
        .dyn_into::<ServiceWorkerContainer>()
        .map_err(|_| ShellError::Unsupported("service worker"))
}

pub async fn register(config: &ShellConfig) -> Result<ServiceWorkerRegistration, ShellError> {
    let search = window()?.location().search().unwrap_or_default();
    should_register_service_worker(&search)?;

    let sw_container = service_worker_container()?;
    let options = RegistrationOptions::new();
    options.set_scope(&config.scope);

    let registration = JsFuture::from(sw_container.register_with_options(&config.sw_url, &options))
        .await
        .map_err(ShellError::from_js_value)?;
    let registration = registration
        .dyn_into::<ServiceWorkerRegistration>()
        .map_err(ShellError::from_js_value)?;
    info!("registered {} (scope {})", config.sw_url, registration.scope());

    Ok(registration)
}

/// A freshly installed worker is an update only if some older worker already
/// controls this page; on first visit there is nothing to replace.
pub fn announces_update(state: ServiceWorkerState, has_controller: bool) -> bool {
    state == ServiceWorkerState::Installed && has_controller
}

fn has_controller() -> bool {
    service_worker_container()
        .map(|container| container.controller().is_some())
        .unwrap_or(false)
}

/// Calls `on_update` with the new worker whenever one reaches `installed`
/// behind an active one, including a worker already waiting at page load.
pub fn watch_updates<F>(registration: &ServiceWorkerRegistration, on_update: F) -> Result<(), ShellError>
where
    F: Fn(ServiceWorker) + 'static,
{
    let on_update = std::rc::Rc::new(on_update);

    if let Some(waiting) = registration.waiting() {
        if has_controller() {
            on_update(waiting);
        }
    }

    let registration_found = registration.clone();
    let on_updatefound = Closure::wrap(Box::new(move |_event: Event| {
        let Some(installing) = registration_found.installing() else {
            return;
        };
        debug!("update found: {}", installing.script_url());

        let worker = installing.clone();
        let on_update = std::rc::Rc::clone(&on_update);
        let on_statechange = Closure::wrap(Box::new(move |_event: Event| {
            if announces_update(worker.state(), has_controller()) {
                on_update(worker.clone());
            }
        }) as Box<dyn FnMut(_)>);

        if let Err(err) = installing
            .add_event_listener_with_callback("statechange", on_statechange.as_ref().unchecked_ref())
        {
            warn!("statechange listener: {}", ShellError::from_js_value(err));
        }
        on_statechange.forget();
    }) as Box<dyn FnMut(_)>);

    registration
        .add_event_listener_with_callback("updatefound", on_updatefound.as_ref().unchecked_ref())
        .map_err(ShellError::from_js_value)?;
    on_updatefound.forget();

    Ok(())
}

/// Re-fetches the worker script every `interval_ms` so deployed updates are
/// noticed without a navigation.
pub fn schedule_update_checks(registration: &ServiceWorkerRegistration, interval_ms: i32) -> Result<(), ShellError> {
    let registration = registration.clone();
    let tick = Closure::wrap(Box::new(move || {
        let promise = match registration.update() {
            Ok(promise) => promise,
            Err(err) => {
                warn!("update check: {}", ShellError::from_js_value(err));
                return;
            }
        };
        spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                debug!("update check failed: {}", ShellError::from_js_value(err));
            }
        });
    }) as Box<dyn FnMut()>);

    window()?
        .set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), interval_ms)
        .map_err(ShellError::from_js_value)?;
    tick.forget();

    Ok(())
}

pub fn post(worker: &ServiceWorker, message: &PageMessage) -> Result<(), ShellError> {
    let value = serde_wasm_bindgen::to_value(message)?;
    worker.post_message(&value).map_err(ShellError::from_js_value)
}

pub fn reload_requested(data: JsValue) -> bool {
    match serde_wasm_bindgen::from_value::<WorkerMessage>(data) {
        Ok(WorkerMessage::Reload) => true,
        Err(err) => {
            debug!("ignoring worker message: {err}");
            false
        }
    }
}

fn reload() -> Result<(), ShellError> {
    window()?.location().reload().map_err(ShellError::from_js_value)
}

/// Reloads the page when the worker broadcasts [`WorkerMessage::Reload`].
pub fn listen_for_reload(container: &ServiceWorkerContainer) -> Result<(), ShellError> {
    let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
        if !reload_requested(event.data()) {
            return;
        }
        info!("new worker in control, reloading");
        if let Err(err) = reload() {
            warn!("reloading: {err}");
        }
    }) as Box<dyn FnMut(_)>);

    container
        .add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())
        .map_err(ShellError::from_js_value)?;
    on_message.forget();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nosw_query_disables_registration() {
        assert!(should_register_service_worker("").is_ok());
        assert!(should_register_service_worker("?lang=en").is_ok());
        assert!(matches!(
            should_register_service_worker("?debug=1&nosw=1"),
            Err(ShellError::Disabled)
        ));
    }

    #[test]
    fn only_installed_worker_behind_controller_is_an_update() {
        assert!(announces_update(ServiceWorkerState::Installed, true));
        assert!(!announces_update(ServiceWorkerState::Installed, false));
        assert!(!announces_update(ServiceWorkerState::Installing, true));
        assert!(!announces_update(ServiceWorkerState::Activated, true));
        assert!(!announces_update(ServiceWorkerState::Redundant, true));
    }
}
