//! Notification template entities.

pub mod model;

pub use model::{NotificationTemplate, UpsertTemplate};
