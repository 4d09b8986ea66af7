//! Notification template repository.

use sqlx::PgPool;

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_entity::template::{NotificationTemplate, UpsertTemplate};

/// Repository for message templates.
#[derive(Debug, Clone)]
pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    /// Create a new template repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a template by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<NotificationTemplate>> {
        sqlx::query_as::<_, NotificationTemplate>(
            "SELECT * FROM notification_templates WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find template", e))
    }

    /// List all templates by slug.
    pub async fn find_all(&self) -> AppResult<Vec<NotificationTemplate>> {
        sqlx::query_as::<_, NotificationTemplate>(
            "SELECT * FROM notification_templates ORDER BY slug",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list templates", e))
    }

    /// Create or replace a template.
    pub async fn upsert(&self, slug: &str, data: &UpsertTemplate) -> AppResult<NotificationTemplate> {
        sqlx::query_as::<_, NotificationTemplate>(
            "INSERT INTO notification_templates (slug, subject, body, description) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (slug) DO UPDATE \
             SET subject = $2, body = $3, description = $4, updated_at = NOW() \
             RETURNING *",
        )
        .bind(slug)
        .bind(&data.subject)
        .bind(&data.body)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert template", e))
    }
}
