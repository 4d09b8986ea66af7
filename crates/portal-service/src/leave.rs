//! Terminal review of leave applications.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_database::repositories::LeaveRepository;
use portal_entity::Decision;
use portal_entity::access::ResourceType;
use portal_entity::leave::{LeaveApplication, LeaveStatus};

use crate::context::RequestContext;

/// Leave application review.
#[derive(Debug, Clone)]
pub struct LeaveService {
    leave_repo: Arc<LeaveRepository>,
}

impl LeaveService {
    /// Creates a new leave service.
    pub fn new(leave_repo: Arc<LeaveRepository>) -> Self {
        Self { leave_repo }
    }

    /// Load an application the caller may decide.
    pub async fn load_for_review(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> AppResult<LeaveApplication> {
        let application = self
            .leave_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Leave application {id} not found")))?;
        ctx.guard()
            .require_approval(ResourceType::Leave, &application.employee_ref)?;
        Ok(application)
    }

    /// Approve or reject a pending application. Applied at most once.
    pub async fn decide(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        decision: Decision,
        reason: Option<&str>,
    ) -> AppResult<LeaveApplication> {
        let application = self.load_for_review(ctx, id).await?;
        if application.status.is_terminal() {
            return Err(AppError::conflict(format!(
                "Leave application {id} is already {}",
                application.status.as_str()
            )));
        }

        let decided = self
            .leave_repo
            .decide(id, LeaveStatus::from(decision), ctx.uid(), reason)
            .await?
            .ok_or_else(|| {
                AppError::conflict(format!("Leave application {id} was already decided"))
            })?;

        info!(
            actor = %ctx.uid(),
            leave_id = %id,
            decision = %decision,
            days = decided.days(),
            "Leave application decided"
        );
        Ok(decided)
    }
}
