//! Device token registration for the calling employee.

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_entity::push::PushToken;
use portal_notify::PushTokenRegistry;
use uuid::Uuid;

use crate::context::RequestContext;

/// Registers and unregisters the caller's push tokens.
#[derive(Debug, Clone)]
pub struct PushTokenService {
    registry: PushTokenRegistry,
}

impl PushTokenService {
    /// Creates a new push token service.
    pub fn new(registry: PushTokenRegistry) -> Self {
        Self { registry }
    }

    /// Add a token to the caller's set.
    pub async fn register(&self, ctx: &RequestContext, raw: &str) -> AppResult<()> {
        let token = PushToken::parse(raw)?;
        self.registry.register(employee_id(ctx)?, &token).await
    }

    /// Remove a token from the caller's set.
    pub async fn unregister(&self, ctx: &RequestContext, raw: &str) -> AppResult<()> {
        let token = PushToken::parse(raw)?;
        self.registry.unregister(employee_id(ctx)?, &token).await
    }
}

fn employee_id(ctx: &RequestContext) -> AppResult<Uuid> {
    ctx.actor
        .employee_id
        .ok_or_else(|| AppError::not_found("No employee record is linked to this identity"))
}
