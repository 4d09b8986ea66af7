//! Leave application repository.

use sqlx::PgPool;
use uuid::Uuid;

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_entity::leave::{LeaveApplication, LeaveStatus};

/// Repository for leave applications.
#[derive(Debug, Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    /// Create a new leave repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an application by id.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<LeaveApplication>> {
        sqlx::query_as::<_, LeaveApplication>("SELECT * FROM leave_applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find leave application", e)
            })
    }

    /// Apply a terminal decision to a pending application.
    ///
    /// Returns `None` if missing or already decided.
    pub async fn decide(
        &self,
        id: Uuid,
        status: LeaveStatus,
        reviewer: &str,
        reason: Option<&str>,
    ) -> AppResult<Option<LeaveApplication>> {
        sqlx::query_as::<_, LeaveApplication>(
            "UPDATE leave_applications \
             SET status = $2, decided_by = $3, decision_reason = $4, decided_at = NOW() \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(reviewer)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to decide leave application", e)
        })
    }
}
