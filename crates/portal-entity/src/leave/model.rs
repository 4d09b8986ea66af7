//! Leave application entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::LeaveStatus;

/// A leave application.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaveApplication {
    /// Application identifier.
    pub id: Uuid,
    /// Identity alias of the applicant.
    pub employee_ref: String,
    /// Leave category (casual, sick, ...).
    pub leave_type: String,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave, inclusive.
    pub end_date: NaiveDate,
    /// Applicant's reason.
    pub reason: Option<String>,
    /// Review state.
    pub status: LeaveStatus,
    /// Reviewer's note.
    pub decision_reason: Option<String>,
    /// Auth uid of the reviewer.
    pub decided_by: Option<String>,
    /// When the decision was applied.
    pub decided_at: Option<DateTime<Utc>>,
    /// When the application was submitted.
    pub created_at: DateTime<Utc>,
}

impl LeaveApplication {
    /// Number of calendar days covered, inclusive.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
