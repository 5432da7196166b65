use serde::{Deserialize, Serialize};

/// Tag carried by every "new version available" notification. Clicking a
/// notification with this tag activates the waiting worker.
pub const UPDATE_TAG: &str = "pwa-update";

pub const DEFAULT_TITLE: &str = "PWA Shell";
pub const FALLBACK_BODY: &str = "You have a new notification.";
pub const DEFAULT_ICON: &str = "/icons/icon-192.png";
pub const DEFAULT_BADGE: &str = "/icons/icon-192.png";

/// Everything needed to render one system notification.
///
/// Field names follow the `NotificationOptions` dictionary so the struct can
/// travel inside `SEND_UPDATE_NOTIFICATION` unchanged. Missing fields fall
/// back to [`NotificationPayload::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub renotify: bool,
    pub require_interaction: bool,
}

impl Default for NotificationPayload {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            body: FALLBACK_BODY.to_string(),
            icon: Some(DEFAULT_ICON.to_string()),
            badge: Some(DEFAULT_BADGE.to_string()),
            tag: None,
            renotify: false,
            require_interaction: false,
        }
    }
}

impl NotificationPayload {
    /// The notification announcing a waiting worker.
    pub fn update_available() -> Self {
        Self {
            title: "Update available".to_string(),
            body: "A new version of the app is ready. Update now?".to_string(),
            tag: Some(UPDATE_TAG.to_string()),
            renotify: true,
            require_interaction: true,
            ..Self::default()
        }
    }

    pub fn is_update(&self) -> bool {
        self.tag.as_deref() == Some(UPDATE_TAG)
    }
}

/// Buttons shown on an update notification, and the implicit body click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    Update,
    Dismiss,
    Default,
}

impl NotificationAction {
    /// Buttons attached to update notifications, in display order.
    pub const BUTTONS: [NotificationAction; 2] = [Self::Update, Self::Dismiss];

    /// Maps the `action` field of a `notificationclick` event. Unknown ids are
    /// treated as a body click.
    pub fn from_id(id: &str) -> Self {
        match id {
            "update" => Self::Update,
            "dismiss" => Self::Dismiss,
            _ => Self::Default,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Dismiss => "dismiss",
            Self::Default => "",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Update => "Update now",
            Self::Dismiss => "Later",
            Self::Default => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_payload_fills_defaults() {
        let payload: NotificationPayload =
            serde_json::from_str(r#"{"title":"Hello","requireInteraction":true}"#).unwrap();

        assert_eq!(payload.title, "Hello");
        assert_eq!(payload.body, FALLBACK_BODY);
        assert_eq!(payload.icon.as_deref(), Some(DEFAULT_ICON));
        assert!(payload.require_interaction);
        assert!(!payload.renotify);
    }

    #[test]
    fn serializes_with_dictionary_field_names() {
        let json = serde_json::to_value(NotificationPayload::update_available()).unwrap();

        assert_eq!(json["tag"], UPDATE_TAG);
        assert_eq!(json["requireInteraction"], true);
        assert_eq!(json["renotify"], true);
        assert!(json.get("require_interaction").is_none());
    }

    #[test]
    fn action_ids() {
        assert_eq!(NotificationAction::from_id("update"), NotificationAction::Update);
        assert_eq!(NotificationAction::from_id("dismiss"), NotificationAction::Dismiss);
        assert_eq!(NotificationAction::from_id(""), NotificationAction::Default);
        assert_eq!(NotificationAction::from_id("snooze"), NotificationAction::Default);

        for action in NotificationAction::BUTTONS {
            assert_eq!(NotificationAction::from_id(action.id()), action);
        }
    }
}
