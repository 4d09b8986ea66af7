//! Attendance event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::AttendanceStatus;

/// A check-in event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceEvent {
    /// Event identifier.
    pub id: Uuid,
    /// Identity alias of the employee who checked in.
    pub employee_ref: String,
    /// Site checked into, if any.
    pub site_id: Option<Uuid>,
    /// Observed latitude.
    pub latitude: Option<f64>,
    /// Observed longitude.
    pub longitude: Option<f64>,
    /// Computed distance to the site anchor, when validated.
    pub distance_m: Option<f64>,
    /// Review state.
    pub status: AttendanceStatus,
    /// Why the event was escalated or decided.
    pub status_reason: Option<String>,
    /// Auth uid of the reviewer.
    pub decided_by: Option<String>,
    /// When the decision was applied.
    pub decided_at: Option<DateTime<Utc>>,
    /// Check-in time.
    pub checked_in_at: DateTime<Utc>,
}

/// Data for persisting a validated check-in.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendanceEvent {
    /// Identity alias of the employee.
    pub employee_ref: String,
    /// Site checked into.
    pub site_id: Option<Uuid>,
    /// Observed latitude.
    pub latitude: Option<f64>,
    /// Observed longitude.
    pub longitude: Option<f64>,
    /// Computed distance, when validated.
    pub distance_m: Option<f64>,
    /// Initial status from the geofence outcome.
    pub status: AttendanceStatus,
    /// Escalation reason, if pending.
    pub status_reason: Option<String>,
}

/// Status counts over a period, used by the monthly report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AttendanceSummary {
    /// Approved events.
    pub approved: i64,
    /// Events still awaiting review.
    pub pending: i64,
    /// Rejected events.
    pub rejected: i64,
}

impl AttendanceSummary {
    /// Total events in the period.
    pub fn total(&self) -> i64 {
        self.approved + self.pending + self.rejected
    }
}
