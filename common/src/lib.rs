//! Types shared by the page script and the service worker.
//!
//! Both contexts compile against the same message definitions so a shape
//! change on one side cannot silently drift from the other.

pub mod logger;
pub mod message;
pub mod notification;

pub use message::{PageMessage, WorkerMessage};
pub use notification::{NotificationAction, NotificationPayload, UPDATE_TAG};
