//! Site repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_entity::site::{CreateSite, Site, UpdateSite};

/// Repository for geofenced sites.
#[derive(Debug, Clone)]
pub struct SiteRepository {
    pool: PgPool,
}

impl SiteRepository {
    /// Create a new site repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a site by id.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Site>> {
        sqlx::query_as::<_, Site>("SELECT * FROM sites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find site", e))
    }

    /// List all sites by name.
    pub async fn find_all(&self) -> AppResult<Vec<Site>> {
        sqlx::query_as::<_, Site>("SELECT * FROM sites ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sites", e))
    }

    /// Create a site.
    pub async fn create(&self, data: &CreateSite) -> AppResult<Site> {
        sqlx::query_as::<_, Site>(
            "INSERT INTO sites (name, latitude, longitude, allowed_radius_m) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.allowed_radius_m)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create site", e))
    }

    /// Apply a partial update. Returns `None` if the site does not exist.
    pub async fn update(&self, id: Uuid, data: &UpdateSite) -> AppResult<Option<Site>> {
        sqlx::query_as::<_, Site>(
            "UPDATE sites SET \
                name = COALESCE($2, name), \
                latitude = CASE WHEN $6 THEN NULL ELSE COALESCE($3, latitude) END, \
                longitude = CASE WHEN $6 THEN NULL ELSE COALESCE($4, longitude) END, \
                allowed_radius_m = CASE WHEN $6 THEN NULL ELSE COALESCE($5, allowed_radius_m) END, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.allowed_radius_m)
        .bind(data.clear_geofence)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update site", e))
    }
}
