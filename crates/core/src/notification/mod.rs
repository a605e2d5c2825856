//! Notification side-channel for corporate-action events.

pub mod publisher;

pub use publisher::{NotificationError, QueuePublisher};
