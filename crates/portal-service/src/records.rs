//! Scoped listing of role-guarded resources.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use portal_auth::ScopedQueryBuilder;
use portal_core::result::AppResult;
use portal_core::types::pagination::{PageRequest, PageResponse};
use portal_database::repositories::ScopedRecordRepository;
use portal_entity::access::{ResourceType, ScopedQuery};

use crate::context::RequestContext;

/// A page of records plus the scope that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ScopedPage {
    /// Scope applied to the listing.
    pub scope: ScopedQuery,
    /// The records.
    #[serde(flatten)]
    pub page: PageResponse<serde_json::Value>,
}

/// Lists attendance, leave, visits, claims and projects within the
/// caller's visibility.
#[derive(Debug, Clone)]
pub struct RecordService {
    scopes: Arc<ScopedQueryBuilder>,
    records: Arc<ScopedRecordRepository>,
}

impl RecordService {
    /// Creates a new record service.
    pub fn new(scopes: Arc<ScopedQueryBuilder>, records: Arc<ScopedRecordRepository>) -> Self {
        Self { scopes, records }
    }

    /// The scope the caller would get for `resource`.
    pub fn scope(&self, ctx: &RequestContext, resource: ResourceType) -> ScopedQuery {
        self.scopes
            .build_at(&ctx.capabilities, &ctx.actor, resource, ctx.request_time)
    }

    /// One page of visible records, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        resource: ResourceType,
        page: &PageRequest,
    ) -> AppResult<ScopedPage> {
        let scope = self.scope(ctx, resource);
        debug!(
            actor = %ctx.uid(),
            resource = %resource,
            level = scope.level.as_str(),
            identities = scope.identity_count(),
            "Listing scoped records"
        );
        let page = self.records.list(&scope, page).await?;
        Ok(ScopedPage { scope, page })
    }
}
