//! Persistence seams used by the dispatcher.
//!
//! Each trait is implemented for the matching Postgres repository so the
//! dispatcher can run against the database in production and against
//! in-memory fakes in tests.

use async_trait::async_trait;
use uuid::Uuid;

use portal_core::result::AppResult;
use portal_core::types::pagination::{PageRequest, PageResponse};
use portal_database::repositories::{
    DeliveryRecordRepository, EmployeeRepository, TemplateRepository,
};
use portal_entity::delivery::{DeliveryRecord, NewDeliveryRecord};
use portal_entity::employee::Employee;
use portal_entity::template::NotificationTemplate;

/// Read access to the employee directory.
#[async_trait]
pub trait DirectoryStore: Send + Sync + 'static {
    /// Every active employee.
    async fn active_employees(&self) -> AppResult<Vec<Employee>>;

    /// Active employees holding any of the role labels.
    async fn active_by_roles(&self, roles: &[String]) -> AppResult<Vec<Employee>>;

    /// Active employees matching any identity alias.
    async fn active_by_aliases(&self, aliases: &[String]) -> AppResult<Vec<Employee>>;
}

/// Template lookup by slug.
#[async_trait]
pub trait TemplateStore: Send + Sync + 'static {
    /// Find a template; `None` if the slug is unknown.
    async fn find_template(&self, slug: &str) -> AppResult<Option<NotificationTemplate>>;
}

/// Per-employee push token sets.
#[async_trait]
pub trait PushTokenStore: Send + Sync + 'static {
    /// Set union with one token. Returns `false` if the employee is unknown.
    async fn add_token(&self, employee_id: Uuid, token: &str) -> AppResult<bool>;

    /// Set difference. Absent tokens are ignored.
    async fn remove_tokens(&self, employee_id: Uuid, tokens: &[String]) -> AppResult<()>;
}

/// Append-only delivery log storage.
#[async_trait]
pub trait DeliveryStore: Send + Sync + 'static {
    /// Append one record.
    async fn append(&self, record: &NewDeliveryRecord) -> AppResult<DeliveryRecord>;

    /// Page through records, newest first.
    async fn page(
        &self,
        event: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DeliveryRecord>>;
}

#[async_trait]
impl DirectoryStore for EmployeeRepository {
    async fn active_employees(&self) -> AppResult<Vec<Employee>> {
        self.find_active().await
    }

    async fn active_by_roles(&self, roles: &[String]) -> AppResult<Vec<Employee>> {
        self.find_active_by_roles(roles).await
    }

    async fn active_by_aliases(&self, aliases: &[String]) -> AppResult<Vec<Employee>> {
        self.find_active_by_aliases(aliases).await
    }
}

#[async_trait]
impl PushTokenStore for EmployeeRepository {
    async fn add_token(&self, employee_id: Uuid, token: &str) -> AppResult<bool> {
        self.add_push_token(employee_id, token).await
    }

    async fn remove_tokens(&self, employee_id: Uuid, tokens: &[String]) -> AppResult<()> {
        self.remove_push_tokens(employee_id, tokens).await
    }
}

#[async_trait]
impl TemplateStore for TemplateRepository {
    async fn find_template(&self, slug: &str) -> AppResult<Option<NotificationTemplate>> {
        self.find_by_slug(slug).await
    }
}

#[async_trait]
impl DeliveryStore for DeliveryRecordRepository {
    async fn append(&self, record: &NewDeliveryRecord) -> AppResult<DeliveryRecord> {
        DeliveryRecordRepository::append(self, record).await
    }

    async fn page(
        &self,
        event: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DeliveryRecord>> {
        self.find_page(event, page).await
    }
}
