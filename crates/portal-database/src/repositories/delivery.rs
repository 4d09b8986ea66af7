//! Delivery audit log repository. Insert and read only.

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_core::types::pagination::{PageRequest, PageResponse};
use portal_entity::delivery::{DeliveryRecord, NewDeliveryRecord};

/// Repository for the append-only delivery log.
#[derive(Debug, Clone)]
pub struct DeliveryRecordRepository {
    pool: PgPool,
}

impl DeliveryRecordRepository {
    /// Create a new delivery record repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one record.
    pub async fn append(&self, record: &NewDeliveryRecord) -> AppResult<DeliveryRecord> {
        sqlx::query_as::<_, DeliveryRecord>(
            "INSERT INTO delivery_records \
                (id, event, title, body, template_slug, recipient_count, notified_count, \
                 attempted_count, success_count, failure_count, status, channels, \
                 subject_ref, triggered_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING *",
        )
        .bind(record.id)
        .bind(&record.event)
        .bind(&record.title)
        .bind(&record.body)
        .bind(&record.template_slug)
        .bind(to_i32(record.recipient_count))
        .bind(to_i32(record.notified_count))
        .bind(to_i32(record.attempted_count))
        .bind(to_i32(record.success_count))
        .bind(to_i32(record.failure_count))
        .bind(record.status)
        .bind(Json(&record.channels))
        .bind(&record.subject_ref)
        .bind(&record.triggered_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to append delivery record", e)
        })
    }

    /// Find a record by id.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DeliveryRecord>> {
        sqlx::query_as::<_, DeliveryRecord>("SELECT * FROM delivery_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find delivery record", e)
            })
    }

    /// Page through records, newest first, optionally filtered by event.
    pub async fn find_page(
        &self,
        event: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DeliveryRecord>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM delivery_records WHERE ($1::text IS NULL OR event = $1)",
        )
        .bind(event)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count delivery records", e)
        })?;

        let records = sqlx::query_as::<_, DeliveryRecord>(
            "SELECT * FROM delivery_records WHERE ($1::text IS NULL OR event = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(event)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list delivery records", e)
        })?;

        Ok(PageResponse::new(records, page, total as u64))
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
