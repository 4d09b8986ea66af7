//! Holiday entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A company holiday.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Holiday {
    /// Holiday identifier.
    pub id: Uuid,
    /// Holiday name.
    pub name: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Optional description shown in the announcement.
    pub description: Option<String>,
    /// Auth uid of the creator.
    pub created_by: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a holiday.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHoliday {
    /// Holiday name.
    pub name: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Optional description.
    pub description: Option<String>,
}
