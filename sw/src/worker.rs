use log::{debug, info, warn};
use pwa_common::{NotificationAction, PageMessage, WorkerMessage};

use crate::config::WorkerConfig;
use crate::error::SwError;
use crate::http::{RequestLike, ResponseLike, is_cacheable};
use crate::platform::Platform;
use crate::push::{self, ClickRoute};

/// Service worker event handlers, one method per platform event.
///
/// Holds no state beyond configuration: the browser may tear the worker down
/// between any two events, so everything durable lives in `CacheStorage`.
pub struct ServiceWorker<P> {
    config: WorkerConfig,
    platform: P,
}

impl<P: Platform> ServiceWorker<P> {
    pub fn new(config: WorkerConfig, platform: P) -> Self {
        Self { config, platform }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// `install`: precache the manifest, then skip the waiting phase.
    ///
    /// A single failed asset fails the whole install; the browser then
    /// discards this worker version and keeps the old one.
    pub async fn on_install(&self) -> Result<(), SwError> {
        let cache = &self.config.cache_name;
        self.platform
            .add_all(cache, &self.config.precache_urls)
            .await
            .map_err(|err| SwError::Precache {
                cache: cache.clone(),
                reason: err.to_string(),
            })?;
        info!(
            "precached {} assets into {}",
            self.config.precache_urls.len(),
            cache
        );

        self.platform.skip_waiting().await
    }

    /// `activate`: drop every cache but the current one and take control of
    /// open pages.
    pub async fn on_activate(&self) -> Result<(), SwError> {
        let current = &self.config.cache_name;
        for name in self.platform.cache_names().await? {
            if &name == current {
                continue;
            }
            match self.platform.delete_cache(&name).await {
                Ok(true) => info!("deleted stale cache {name}"),
                Ok(false) => debug!("stale cache {name} already gone"),
                Err(err) => warn!("deleting stale cache {name}: {err}"),
            }
        }

        self.platform.claim_clients().await
    }

    /// `fetch`: cache first, then network, then the offline page for
    /// navigations.
    pub async fn on_fetch(&self, request: &P::Request) -> Result<P::Response, SwError> {
        let cache = &self.config.cache_name;

        match self.platform.match_request(cache, request).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(err) => warn!("cache lookup for {}: {err}", request.url()),
        }

        let response = match self.platform.fetch(request).await {
            Ok(response) => response,
            Err(err) if request.is_navigation() => {
                info!("{err}; serving {}", self.config.offline_url);
                return self
                    .platform
                    .match_url(cache, &self.config.offline_url)
                    .await?
                    .ok_or_else(|| SwError::NoFallback(self.config.offline_url.clone()));
            }
            Err(err) => return Err(err),
        };

        if is_cacheable(request, &response) {
            match response.duplicate() {
                Ok(copy) => self.platform.put_detached(cache, request, copy),
                Err(err) => warn!("not caching {}: {err}", request.url()),
            }
        }

        Ok(response)
    }

    /// `message` from a page.
    pub async fn on_message(&self, message: PageMessage) -> Result<(), SwError> {
        match message {
            PageMessage::SkipWaiting => {
                self.platform.skip_waiting().await?;
                let reached = self.platform.broadcast(&WorkerMessage::Reload).await?;
                info!("took over; asked {reached} windows to reload");
                Ok(())
            }
            PageMessage::SendUpdateNotification { data } => {
                self.platform
                    .show_notification(&data, push::actions_for(&data))
                    .await
            }
        }
    }

    /// `push`: `text` is the decoded payload, if the message carried one.
    pub async fn on_push(&self, text: Option<&str>) -> Result<(), SwError> {
        let payload = push::payload_from_text(text);
        self.platform
            .show_notification(&payload, push::actions_for(&payload))
            .await
    }

    /// `notificationclick`, after the notification itself has been closed.
    pub async fn on_notification_click(&self, action: &str, tag: Option<&str>) -> Result<(), SwError> {
        match push::route_click(NotificationAction::from_id(action), tag) {
            ClickRoute::Dismiss => Ok(()),
            ClickRoute::Activate => {
                if self.platform.post_to_waiting(&PageMessage::SkipWaiting).await? {
                    return Ok(());
                }
                debug!("no waiting worker to activate");
                self.platform.focus_or_open(&self.config.start_url).await
            }
            ClickRoute::Focus => self.platform.focus_or_open(&self.config.start_url).await,
        }
    }
}
