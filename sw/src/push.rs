use pwa_common::notification::FALLBACK_BODY;
use pwa_common::{NotificationAction, NotificationPayload, UPDATE_TAG};

/// Turns the text of a push message into a notification.
///
/// A JSON object is read field by field (missing fields take defaults), a
/// JSON string or any other text becomes the body, and an empty or absent payload shows the
/// fallback body.
pub fn payload_from_text(text: Option<&str>) -> NotificationPayload {
    let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
        return NotificationPayload::default();
    };

    let mut payload = match serde_json::from_str::<NotificationPayload>(text) {
        Ok(payload) => payload,
        Err(_) => NotificationPayload {
            // A JSON string literal carries the body without its quotes.
            body: serde_json::from_str::<String>(text).unwrap_or_else(|_| text.to_string()),
            ..NotificationPayload::default()
        },
    };
    if payload.body.trim().is_empty() {
        payload.body = FALLBACK_BODY.to_string();
    }
    payload
}

/// Buttons to attach to a notification.
pub fn actions_for(payload: &NotificationPayload) -> &'static [NotificationAction] {
    if payload.is_update() {
        &NotificationAction::BUTTONS
    } else {
        &[]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRoute {
    /// Close only.
    Dismiss,
    /// Tell the waiting worker to take over.
    Activate,
    /// Bring a window to the front, opening one if needed.
    Focus,
}

pub fn route_click(action: NotificationAction, tag: Option<&str>) -> ClickRoute {
    match action {
        NotificationAction::Dismiss => ClickRoute::Dismiss,
        NotificationAction::Update => ClickRoute::Activate,
        NotificationAction::Default if tag == Some(UPDATE_TAG) => ClickRoute::Activate,
        NotificationAction::Default => ClickRoute::Focus,
    }
}
