//! Broadcasting modules for real-time event streaming.
//!
//! Front ends subscribe here instead of polling the controller.

pub mod notifications;

pub use notifications::{Notification, NotificationBroadcaster, NotificationLevel};
