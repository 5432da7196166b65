use async_trait::async_trait;
use pwa_common::{NotificationAction, NotificationPayload, PageMessage, WorkerMessage};

use crate::error::SwError;
use crate::http::{RequestLike, ResponseLike};

/// Browser facilities the worker logic needs. [`crate::web::WebPlatform`]
/// binds them to `ServiceWorkerGlobalScope`; tests use an in-memory host.
#[async_trait(?Send)]
pub trait Platform {
    type Request: RequestLike;
    type Response: ResponseLike;

    // CacheStorage

    async fn cache_names(&self) -> Result<Vec<String>, SwError>;

    async fn delete_cache(&self, name: &str) -> Result<bool, SwError>;

    /// Opens `cache` and fills it from `urls`. Either every URL is stored or
    /// none is.
    async fn add_all(&self, cache: &str, urls: &[String]) -> Result<(), SwError>;

    async fn match_request(
        &self,
        cache: &str,
        request: &Self::Request,
    ) -> Result<Option<Self::Response>, SwError>;

    async fn match_url(&self, cache: &str, url: &str) -> Result<Option<Self::Response>, SwError>;

    /// Stores `response` under `request` without making the caller wait.
    /// Failures are logged only.
    fn put_detached(&self, cache: &str, request: &Self::Request, response: Self::Response);

    // Network

    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, SwError>;

    // Registration and clients

    async fn skip_waiting(&self) -> Result<(), SwError>;

    async fn claim_clients(&self) -> Result<(), SwError>;

    /// Posts `message` to every window client, controlled or not. Returns how
    /// many were reached.
    async fn broadcast(&self, message: &WorkerMessage) -> Result<usize, SwError>;

    /// Posts `message` to the registration's waiting worker. Returns `false`
    /// when nothing is waiting.
    async fn post_to_waiting(&self, message: &PageMessage) -> Result<bool, SwError>;

    async fn focus_or_open(&self, url: &str) -> Result<(), SwError>;

    // Notifications

    async fn show_notification(
        &self,
        payload: &NotificationPayload,
        actions: &[NotificationAction],
    ) -> Result<(), SwError>;
}
