//! Append-only delivery log.

use std::sync::Arc;

use portal_core::result::AppResult;
use portal_core::types::pagination::{PageRequest, PageResponse};
use portal_entity::delivery::{DeliveryRecord, NewDeliveryRecord};

use crate::store::DeliveryStore;

/// Writes one record per dispatch and pages through history.
///
/// Records are never updated or deleted.
#[derive(Clone)]
pub struct DeliveryAuditLog {
    store: Arc<dyn DeliveryStore>,
}

impl std::fmt::Debug for DeliveryAuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryAuditLog").finish_non_exhaustive()
    }
}

impl DeliveryAuditLog {
    /// Create a log over a delivery store.
    pub fn new(store: Arc<dyn DeliveryStore>) -> Self {
        Self { store }
    }

    /// Append one record.
    pub async fn record(&self, record: &NewDeliveryRecord) -> AppResult<DeliveryRecord> {
        self.store.append(record).await
    }

    /// Page through records, newest first.
    pub async fn page(
        &self,
        event: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DeliveryRecord>> {
        self.store.page(event, page).await
    }
}
