//! Attendance event repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_entity::attendance::{
    AttendanceEvent, AttendanceStatus, AttendanceSummary, NewAttendanceEvent,
};

/// Repository for attendance check-ins.
#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    /// Create a new attendance repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a validated check-in.
    pub async fn create(&self, event: &NewAttendanceEvent) -> AppResult<AttendanceEvent> {
        sqlx::query_as::<_, AttendanceEvent>(
            "INSERT INTO attendance_events \
                (employee_ref, site_id, latitude, longitude, distance_m, status, status_reason) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&event.employee_ref)
        .bind(event.site_id)
        .bind(event.latitude)
        .bind(event.longitude)
        .bind(event.distance_m)
        .bind(event.status)
        .bind(&event.status_reason)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create attendance event", e)
        })
    }

    /// Find an event by id.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AttendanceEvent>> {
        sqlx::query_as::<_, AttendanceEvent>("SELECT * FROM attendance_events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find attendance event", e)
            })
    }

    /// Apply a terminal decision to a pending event.
    ///
    /// Returns `None` if the event is missing or already decided, so a
    /// decision is applied exactly once even under concurrent reviewers.
    pub async fn decide(
        &self,
        id: Uuid,
        status: AttendanceStatus,
        reviewer: &str,
        reason: Option<&str>,
    ) -> AppResult<Option<AttendanceEvent>> {
        sqlx::query_as::<_, AttendanceEvent>(
            "UPDATE attendance_events \
             SET status = $2, decided_by = $3, status_reason = COALESCE($4, status_reason), decided_at = NOW() \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(reviewer)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to decide attendance event", e)
        })
    }

    /// Status counts for events checked in within `[from, to)`.
    pub async fn summarize(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<AttendanceSummary> {
        sqlx::query_as::<_, AttendanceSummary>(
            "SELECT \
                COUNT(*) FILTER (WHERE status = 'approved') AS approved, \
                COUNT(*) FILTER (WHERE status = 'pending') AS pending, \
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected \
             FROM attendance_events \
             WHERE checked_in_at >= $1 AND checked_in_at < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to summarize attendance", e)
        })
    }
}
