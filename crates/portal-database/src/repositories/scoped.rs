//! Executes resolved [`ScopedQuery`] predicates against resource tables.

use sqlx::PgPool;

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_core::types::pagination::{PageRequest, PageResponse};
use portal_entity::access::{ResourceType, ScopedQuery};

/// Read-only listing of any scoped resource as JSON rows.
#[derive(Debug, Clone)]
pub struct ScopedRecordRepository {
    pool: PgPool,
}

impl ScopedRecordRepository {
    /// Create a new scoped record repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List one page of the records the scope admits.
    ///
    /// `$1` is the identity list (NULL for org-wide), `$2` the lower time
    /// bound (NULL for none). Table and column names come from
    /// [`ResourceType`] metadata, never from input.
    pub async fn list(
        &self,
        scope: &ScopedQuery,
        page: &PageRequest,
    ) -> AppResult<PageResponse<serde_json::Value>> {
        let resource = scope.resource;

        let total: i64 = sqlx::query_scalar(&count_sql(resource))
            .bind(&scope.identities)
            .bind(scope.since)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to count {resource} records"),
                    e,
                )
            })?;

        let rows: Vec<serde_json::Value> = sqlx::query_scalar(&select_sql(scope))
            .bind(&scope.identities)
            .bind(scope.since)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to list {resource} records"),
                    e,
                )
            })?;

        Ok(PageResponse::new(rows, page, total as u64))
    }
}

fn where_clause(resource: ResourceType) -> String {
    format!(
        "($1::text[] IS NULL OR t.{subject} = ANY($1)) \
         AND ($2::timestamptz IS NULL OR t.{date} >= $2)",
        subject = resource.subject_column(),
        date = resource.date_column(),
    )
}

fn count_sql(resource: ResourceType) -> String {
    format!(
        "SELECT COUNT(*) FROM {table} t WHERE {filter}",
        table = resource.table(),
        filter = where_clause(resource),
    )
}

fn select_sql(scope: &ScopedQuery) -> String {
    format!(
        "SELECT to_jsonb(t) FROM {table} t WHERE {filter} \
         ORDER BY t.{order} LIMIT $3 OFFSET $4",
        table = scope.resource.table(),
        filter = where_clause(scope.resource),
        order = scope.order.to_sql(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::types::SortField;
    use portal_entity::access::ScopeLevel;

    #[test]
    fn test_select_orders_by_resource_date_column() {
        let scope = ScopedQuery {
            resource: ResourceType::Leave,
            level: ScopeLevel::Team,
            identities: Some(vec!["uid-1".to_string()]),
            since: None,
            order: SortField::desc("created_at"),
            truncated: false,
            narrowed: false,
        };
        let sql = select_sql(&scope);
        assert!(sql.starts_with("SELECT to_jsonb(t) FROM leave_applications t WHERE"));
        assert!(sql.contains("t.employee_ref = ANY($1)"));
        assert!(sql.contains("ORDER BY t.created_at DESC LIMIT $3 OFFSET $4"));
    }

    #[test]
    fn test_count_uses_same_filter() {
        let sql = count_sql(ResourceType::Attendance);
        assert!(sql.contains("FROM attendance_events t"));
        assert!(sql.contains("t.checked_in_at >= $2"));
    }
}
