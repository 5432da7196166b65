use serde::{Deserialize, Serialize};

use crate::notification::NotificationPayload;

/// Messages a page posts to the service worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageMessage {
    /// Take over from the active worker right away.
    SkipWaiting,
    /// Show a system notification on the page's behalf.
    SendUpdateNotification { data: NotificationPayload },
}

/// Messages the service worker broadcasts to its window clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// A new worker took control; the page should reload to pick it up.
    Reload,
}
