//! Push token set maintenance.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_entity::push::PushToken;

use crate::store::PushTokenStore;

/// Maintains each employee's set of push tokens.
///
/// Addition is a set union and removal a set difference, both applied as
/// single statements by the store, so interleaved dispatches are safe.
#[derive(Clone)]
pub struct PushTokenRegistry {
    store: Arc<dyn PushTokenStore>,
}

impl std::fmt::Debug for PushTokenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushTokenRegistry").finish_non_exhaustive()
    }
}

impl PushTokenRegistry {
    /// Create a registry over a token store.
    pub fn new(store: Arc<dyn PushTokenStore>) -> Self {
        Self { store }
    }

    /// Register a device token. Registering twice is a no-op.
    pub async fn register(&self, employee_id: Uuid, token: &PushToken) -> AppResult<()> {
        if !self.store.add_token(employee_id, token.as_str()).await? {
            return Err(AppError::not_found(format!("Employee {employee_id} not found")));
        }
        info!(employee_id = %employee_id, "Push token registered");
        Ok(())
    }

    /// Unregister a device token. Absent tokens are ignored.
    pub async fn unregister(&self, employee_id: Uuid, token: &PushToken) -> AppResult<()> {
        self.store
            .remove_tokens(employee_id, &[token.as_str().to_string()])
            .await
    }

    /// Drop tokens the provider reported as unregistered.
    pub async fn prune(&self, employee_id: Uuid, tokens: &[String]) -> AppResult<()> {
        if tokens.is_empty() {
            return Ok(());
        }
        warn!(
            employee_id = %employee_id,
            count = tokens.len(),
            "Pruning push tokens reported invalid by the provider"
        );
        self.store.remove_tokens(employee_id, tokens).await
    }
}
