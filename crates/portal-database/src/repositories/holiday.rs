//! Holiday repository.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_entity::holiday::{CreateHoliday, Holiday};

/// Repository for company holidays.
#[derive(Debug, Clone)]
pub struct HolidayRepository {
    pool: PgPool,
}

impl HolidayRepository {
    /// Create a new holiday repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a holiday by id.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Holiday>> {
        sqlx::query_as::<_, Holiday>("SELECT * FROM holidays WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find holiday", e))
    }

    /// Holidays on or after a date, soonest first.
    pub async fn find_from(&self, from: NaiveDate) -> AppResult<Vec<Holiday>> {
        sqlx::query_as::<_, Holiday>("SELECT * FROM holidays WHERE date >= $1 ORDER BY date")
            .bind(from)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list holidays", e))
    }

    /// Create a holiday.
    pub async fn create(&self, data: &CreateHoliday, created_by: &str) -> AppResult<Holiday> {
        sqlx::query_as::<_, Holiday>(
            "INSERT INTO holidays (name, date, description, created_by) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.date)
        .bind(&data.description)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create holiday", e))
    }
}
