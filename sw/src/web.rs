use async_trait::async_trait;
use js_sys::{Array, Object, Reflect};
use log::warn;
use pwa_common::{NotificationAction, NotificationPayload, PageMessage, WorkerMessage};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Cache, CacheStorage, Client, ClientQueryOptions, ClientType, NotificationOptions, Request,
    Response, ServiceWorkerGlobalScope, WindowClient,
};

use crate::error::SwError;
use crate::platform::Platform;

/// [`Platform`] backed by the live `ServiceWorkerGlobalScope`.
pub struct WebPlatform {
    scope: ServiceWorkerGlobalScope,
}

impl WebPlatform {
    pub fn new() -> Result<Self, SwError> {
        js_sys::global()
            .dyn_into::<ServiceWorkerGlobalScope>()
            .map(|scope| Self { scope })
            .map_err(|_| SwError::Scope)
    }

    fn caches(&self) -> Result<CacheStorage, SwError> {
        self.scope.caches().map_err(SwError::from_js_value)
    }

    async fn open(&self, name: &str) -> Result<Cache, SwError> {
        let cache = JsFuture::from(self.caches()?.open(name))
            .await
            .map_err(SwError::from_js_value)?;
        cache.dyn_into::<Cache>().map_err(SwError::from_js_value)
    }

    async fn window_clients(&self) -> Result<Vec<Client>, SwError> {
        let options = ClientQueryOptions::new();
        options.set_type(ClientType::Window);
        options.set_include_uncontrolled(true);

        let clients = JsFuture::from(self.scope.clients().match_all_with_options(&options))
            .await
            .map_err(SwError::from_js_value)?;
        Ok(Array::from(&clients)
            .iter()
            .filter_map(|client| client.dyn_into::<Client>().ok())
            .collect())
    }
}

async fn await_promise(promise: js_sys::Promise) -> Result<JsValue, SwError> {
    JsFuture::from(promise).await.map_err(SwError::from_js_value)
}

fn matched_response(value: JsValue) -> Result<Option<Response>, SwError> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    value
        .dyn_into::<Response>()
        .map(Some)
        .map_err(SwError::from_js_value)
}

async fn put_into(
    storage: &CacheStorage,
    name: &str,
    request: &Request,
    response: &Response,
) -> Result<(), SwError> {
    let cache = await_promise(storage.open(name))
        .await?
        .dyn_into::<Cache>()
        .map_err(SwError::from_js_value)?;
    await_promise(cache.put_with_request(request, response)).await?;
    Ok(())
}

fn notification_actions(actions: &[NotificationAction]) -> Result<Array, SwError> {
    let list = Array::new();
    for action in actions {
        let entry = Object::new();
        Reflect::set(&entry, &JsValue::from_str("action"), &JsValue::from_str(action.id()))
            .map_err(SwError::from_js_value)?;
        Reflect::set(&entry, &JsValue::from_str("title"), &JsValue::from_str(action.title()))
            .map_err(SwError::from_js_value)?;
        list.push(&entry);
    }
    Ok(list)
}

#[async_trait(?Send)]
impl Platform for WebPlatform {
    type Request = Request;
    type Response = Response;

    async fn cache_names(&self) -> Result<Vec<String>, SwError> {
        let keys = await_promise(self.caches()?.keys()).await?;
        Ok(Array::from(&keys).iter().filter_map(|key| key.as_string()).collect())
    }

    async fn delete_cache(&self, name: &str) -> Result<bool, SwError> {
        let deleted = await_promise(self.caches()?.delete(name)).await?;
        Ok(deleted.as_bool().unwrap_or(false))
    }

    async fn add_all(&self, cache: &str, urls: &[String]) -> Result<(), SwError> {
        let cache = self.open(cache).await?;
        let urls: Array = urls.iter().map(|url| JsValue::from_str(url)).collect();
        await_promise(cache.add_all_with_str_sequence(&urls)).await?;
        Ok(())
    }

    async fn match_request(&self, cache: &str, request: &Request) -> Result<Option<Response>, SwError> {
        let cache = self.open(cache).await?;
        matched_response(await_promise(cache.match_with_request(request)).await?)
    }

    async fn match_url(&self, cache: &str, url: &str) -> Result<Option<Response>, SwError> {
        let cache = self.open(cache).await?;
        matched_response(await_promise(cache.match_with_str(url)).await?)
    }

    fn put_detached(&self, cache: &str, request: &Request, response: Response) {
        let storage = match self.caches() {
            Ok(storage) => storage,
            Err(err) => {
                warn!("cache write skipped: {err}");
                return;
            }
        };
        let name = cache.to_string();
        let request = Clone::clone(request);

        spawn_local(async move {
            // Quota errors land here too; the response already went out.
            if let Err(err) = put_into(&storage, &name, &request, &response).await {
                warn!("caching {} into {name}: {err}", request.url());
            }
        });
    }

    async fn fetch(&self, request: &Request) -> Result<Response, SwError> {
        let response = JsFuture::from(self.scope.fetch_with_request(request))
            .await
            .map_err(|_| SwError::Network(request.url()))?;
        response.dyn_into::<Response>().map_err(SwError::from_js_value)
    }

    async fn skip_waiting(&self) -> Result<(), SwError> {
        let promise = self.scope.skip_waiting().map_err(SwError::from_js_value)?;
        await_promise(promise).await?;
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), SwError> {
        await_promise(self.scope.clients().claim()).await?;
        Ok(())
    }

    async fn broadcast(&self, message: &WorkerMessage) -> Result<usize, SwError> {
        let message = serde_wasm_bindgen::to_value(message)?;
        let mut reached = 0;
        for client in self.window_clients().await? {
            match client.post_message(&message) {
                Ok(()) => reached += 1,
                Err(err) => warn!("posting to {}: {}", client.url(), SwError::from_js_value(err)),
            }
        }
        Ok(reached)
    }

    async fn post_to_waiting(&self, message: &PageMessage) -> Result<bool, SwError> {
        let Some(waiting) = self.scope.registration().waiting() else {
            return Ok(false);
        };
        let message = serde_wasm_bindgen::to_value(message)?;
        waiting.post_message(&message).map_err(SwError::from_js_value)?;
        Ok(true)
    }

    async fn focus_or_open(&self, url: &str) -> Result<(), SwError> {
        for client in self.window_clients().await? {
            let Ok(window) = client.dyn_into::<WindowClient>() else {
                continue;
            };
            let promise = window.focus().map_err(SwError::from_js_value)?;
            await_promise(promise).await?;
            return Ok(());
        }

        await_promise(self.scope.clients().open_window(url)).await?;
        Ok(())
    }

    async fn show_notification(
        &self,
        payload: &NotificationPayload,
        actions: &[NotificationAction],
    ) -> Result<(), SwError> {
        let options = NotificationOptions::new();
        options.set_body(&payload.body);
        if let Some(icon) = &payload.icon {
            options.set_icon(icon);
        }
        if let Some(badge) = &payload.badge {
            options.set_badge(badge);
        }
        if let Some(tag) = &payload.tag {
            options.set_tag(tag);
            // renotify without a tag is a TypeError.
            options.set_renotify(payload.renotify);
        }
        options.set_require_interaction(payload.require_interaction);
        if !actions.is_empty() {
            let list: JsValue = notification_actions(actions)?.into();
            Reflect::set(&options, &JsValue::from_str("actions"), &list)
                .map_err(SwError::from_js_value)?;
        }

        let promise = self
            .scope
            .registration()
            .show_notification_with_options(&payload.title, &options)
            .map_err(SwError::from_js_value)?;
        await_promise(promise).await?;
        Ok(())
    }
}
