//! Employee directory repository.

use sqlx::PgPool;
use uuid::Uuid;

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_entity::employee::Employee;

/// Repository for employee lookups and push-token set maintenance.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    /// Create a new employee repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an employee by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find employee by id", e)
            })
    }

    /// Find an employee by identity provider subject.
    pub async fn find_by_auth_uid(&self, auth_uid: &str) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE auth_uid = $1")
            .bind(auth_uid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find employee by uid", e)
            })
    }

    /// Find an employee by either identity alias (auth uid or record id).
    pub async fn find_by_alias(&self, alias: &str) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE auth_uid = $1 OR id::text = $1 LIMIT 1",
        )
        .bind(alias)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find employee by alias", e)
        })
    }

    /// Employee ids of an employee's active direct reports.
    ///
    /// Records are filed under the employee id, so one identity per report
    /// is enough for team scoping.
    pub async fn subordinate_ids(&self, supervisor_id: Uuid) -> AppResult<Vec<String>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM employees \
             WHERE supervisor_id = $1 AND status = 'active' \
             ORDER BY full_name",
        )
        .bind(supervisor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list subordinates", e)
        })?;

        Ok(ids.into_iter().map(|id| id.to_string()).collect())
    }

    /// All active employees.
    pub async fn find_active(&self) -> AppResult<Vec<Employee>> {
        sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE status = 'active' ORDER BY full_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list active employees", e)
        })
    }

    /// Active employees holding any of the given role labels
    /// (case-insensitive).
    pub async fn find_active_by_roles(&self, roles: &[String]) -> AppResult<Vec<Employee>> {
        let wanted: Vec<String> = roles.iter().map(|r| r.trim().to_lowercase()).collect();
        sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees \
             WHERE status = 'active' \
               AND EXISTS (SELECT 1 FROM unnest(roles) AS r WHERE lower(r) = ANY($1)) \
             ORDER BY full_name",
        )
        .bind(&wanted)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list employees by role", e)
        })
    }

    /// Active employees matching any of the given identity aliases.
    pub async fn find_active_by_aliases(&self, aliases: &[String]) -> AppResult<Vec<Employee>> {
        sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees \
             WHERE status = 'active' AND (auth_uid = ANY($1) OR id::text = ANY($1)) \
             ORDER BY full_name",
        )
        .bind(aliases)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list employees by alias", e)
        })
    }

    /// Add a push token to the employee's set. Duplicates collapse.
    ///
    /// Returns `false` when the employee does not exist.
    pub async fn add_push_token(&self, employee_id: Uuid, token: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE employees \
             SET push_tokens = ARRAY(SELECT DISTINCT t FROM unnest(array_append(push_tokens, $2)) AS t), \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(employee_id)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add push token", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove tokens from the employee's set. Absent tokens are ignored.
    pub async fn remove_push_tokens(&self, employee_id: Uuid, tokens: &[String]) -> AppResult<()> {
        if tokens.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "UPDATE employees \
             SET push_tokens = ARRAY(SELECT t FROM unnest(push_tokens) AS t WHERE t <> ALL($2)), \
                 updated_at = NOW() \
             WHERE id = $1 AND push_tokens && $2",
        )
        .bind(employee_id)
        .bind(tokens)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to remove push tokens", e)
        })?;
        Ok(())
    }

    /// Current push tokens of an employee.
    pub async fn push_tokens(&self, employee_id: Uuid) -> AppResult<Vec<String>> {
        let tokens: Option<Vec<String>> =
            sqlx::query_scalar("SELECT push_tokens FROM employees WHERE id = $1")
                .bind(employee_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to read push tokens", e)
                })?;
        Ok(tokens.unwrap_or_default())
    }
}
