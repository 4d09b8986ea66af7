//! Notification template entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored message template, keyed by slug.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationTemplate {
    /// Unique lookup key.
    pub slug: String,
    /// Subject line, may contain `{{placeholders}}`.
    pub subject: String,
    /// Body, may contain `{{placeholders}}`.
    pub body: String,
    /// Free-form description for operators.
    pub description: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating or replacing a template.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertTemplate {
    /// Subject line.
    pub subject: String,
    /// Body.
    pub body: String,
    /// Free-form description.
    pub description: Option<String>,
}
