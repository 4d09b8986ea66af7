//! Delivery record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::channel::ChannelTally;
use super::status::DeliveryStatus;

/// Audit summary of one logical dispatch. Never updated after insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeliveryRecord {
    /// Record identifier; equals the dispatch id.
    pub id: Uuid,
    /// Business event name (`leave_decision`, `holiday`, ...).
    pub event: String,
    /// Rendered title or subject.
    pub title: String,
    /// Rendered body preview.
    pub body: String,
    /// Template slug used, if any.
    pub template_slug: Option<String>,
    /// Resolved audience size.
    pub recipient_count: i32,
    /// Recipients with at least one successful channel.
    pub notified_count: i32,
    /// Channel sends issued.
    pub attempted_count: i32,
    /// Channel sends accepted.
    pub success_count: i32,
    /// Channel sends failed.
    pub failure_count: i32,
    /// Overall outcome.
    pub status: DeliveryStatus,
    /// Per-channel breakdown.
    pub channels: Json<Vec<ChannelTally>>,
    /// Record the dispatch was about, if any.
    pub subject_ref: Option<String>,
    /// Auth uid of the triggering actor; `None` for scheduled runs.
    pub triggered_by: Option<String>,
    /// When the dispatch settled.
    pub created_at: DateTime<Utc>,
}

/// Data for appending a delivery record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDeliveryRecord {
    /// Dispatch identifier.
    pub id: Uuid,
    /// Business event name.
    pub event: String,
    /// Rendered title.
    pub title: String,
    /// Rendered body preview.
    pub body: String,
    /// Template slug used.
    pub template_slug: Option<String>,
    /// Resolved audience size.
    pub recipient_count: u32,
    /// Recipients with at least one successful channel.
    pub notified_count: u32,
    /// Channel sends issued.
    pub attempted_count: u32,
    /// Channel sends accepted.
    pub success_count: u32,
    /// Channel sends failed.
    pub failure_count: u32,
    /// Overall outcome.
    pub status: DeliveryStatus,
    /// Per-channel breakdown.
    pub channels: Vec<ChannelTally>,
    /// Record the dispatch was about.
    pub subject_ref: Option<String>,
    /// Auth uid of the triggering actor.
    pub triggered_by: Option<String>,
}
