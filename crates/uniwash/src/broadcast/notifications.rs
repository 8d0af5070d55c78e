//! User-facing outcome notices for lifecycle operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::{ErrorCategory, WashError};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationLevel::Success => write!(f, "success"),
            NotificationLevel::Info => write!(f, "info"),
            NotificationLevel::Warning => write!(f, "warning"),
            NotificationLevel::Error => write!(f, "error"),
        }
    }
}

/// A notice shown to the user after an operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Timed confirmations close on their own after this long.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismiss_after_ms: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: &str) -> Self {
        Self {
            level,
            title: title.to_string(),
            text: None,
            dismiss_after_ms: None,
            timestamp: Utc::now(),
        }
    }

    /// A confirmation that closes itself.
    pub fn success(title: &str, dismiss_after_ms: u64) -> Self {
        Self::new(NotificationLevel::Success, title).dismiss_after(dismiss_after_ms)
    }

    pub fn warning(title: &str, text: &str) -> Self {
        Self::new(NotificationLevel::Warning, title).with_text(text)
    }

    pub fn info(title: &str) -> Self {
        Self::new(NotificationLevel::Info, title)
    }

    /// Converts an operation failure into a notice. `action` describes what
    /// was attempted, e.g. "record ESD Pass".
    pub fn failure(error: &WashError, action: &str) -> Self {
        let (level, title) = match error.category() {
            ErrorCategory::Validation => (NotificationLevel::Warning, "Incomplete Data"),
            ErrorCategory::Conflict => (NotificationLevel::Error, "Cannot Add"),
            ErrorCategory::NotFound => (NotificationLevel::Error, "Not Found"),
            ErrorCategory::InvalidState => (NotificationLevel::Warning, "Invalid State"),
            ErrorCategory::OutOfRange => (NotificationLevel::Warning, "Invalid Date"),
            ErrorCategory::Store => (NotificationLevel::Error, "Error"),
        };
        let text = match error {
            WashError::Store(_) => format!("Failed to {}. Please try again.", action),
            other => format!("{}. Please try again.", other),
        };
        Self::new(level, title).with_text(&text)
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn dismiss_after(mut self, ms: u64) -> Self {
        self.dismiss_after_ms = Some(ms);
        self
    }
}

/// Broadcasts notifications to every subscribed front end.
#[derive(Clone)]
pub struct NotificationBroadcaster {
    sender: Arc<broadcast::Sender<Notification>>,
}

impl NotificationBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn send(&self, notification: Notification) {
        log::debug!(
            "Notification [{}] {}",
            notification.level,
            notification.title
        );
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(notification);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::WashPhase;
    use crate::store::StoreError;

    #[test]
    fn test_send_receive() {
        let broadcaster = NotificationBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();

        broadcaster.send(Notification::success("Saved Successfully", 1500));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.level, NotificationLevel::Success);
        assert_eq!(received.title, "Saved Successfully");
        assert_eq!(received.dismiss_after_ms, Some(1500));
    }

    #[test]
    fn test_send_without_subscribers() {
        let broadcaster = NotificationBroadcaster::default();
        broadcaster.send(Notification::info("No date change"));
    }

    #[test]
    fn test_failure_titles_follow_category() {
        let n = Notification::failure(&WashError::Validation("color".into()), "save");
        assert_eq!(n.title, "Incomplete Data");
        assert_eq!(n.level, NotificationLevel::Warning);

        let n = Notification::failure(
            &WashError::Conflict {
                uniform_code: "U001".into(),
                color: "Blue".into(),
            },
            "save",
        );
        assert_eq!(n.title, "Cannot Add");

        let n = Notification::failure(&WashError::not_found("Wash job", "WASH-000009"), "shift date");
        assert_eq!(n.title, "Not Found");
        assert!(n.text.unwrap().contains("WASH-000009"));

        let n = Notification::failure(
            &WashError::InvalidState {
                wash_id: "WASH-000001".into(),
                expected: WashPhase::Completed,
                found: WashPhase::Washing,
            },
            "record ESD Pass",
        );
        assert_eq!(n.title, "Invalid State");

        let n = Notification::failure(
            &WashError::DateOutOfRange {
                wash_id: "WASH-000001".into(),
                delta_days: i64::MAX,
            },
            "shift date",
        );
        assert_eq!(n.title, "Invalid Date");
        assert!(!n.text.unwrap().contains("Incomplete"));
    }

    #[test]
    fn test_store_failure_has_retry_text() {
        let err = WashError::Store(StoreError::Backend("connection reset".into()));
        let n = Notification::failure(&err, "record ESD Fail");
        assert_eq!(n.title, "Error");
        assert_eq!(n.level, NotificationLevel::Error);
        assert_eq!(
            n.text.as_deref(),
            Some("Failed to record ESD Fail. Please try again.")
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let n = Notification::success("Deleted Successfully", 1500);
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["dismissAfterMs"], 1500);
        assert_eq!(json["level"], "success");
        assert!(json.get("text").is_none());
    }
}
