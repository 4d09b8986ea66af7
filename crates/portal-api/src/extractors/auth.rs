//! `AuthUser` extractor: verifies the bearer token and builds the request context.

use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use tracing::warn;

use portal_core::error::AppError;
use portal_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated request context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::unauthorized("Missing or malformed bearer token"))?;

        let claims = state.jwt_decoder.decode(bearer.token()).map_err(|e| {
            warn!(error = %e.message, "Bearer token rejected");
            e
        })?;

        let actor = state.actor_resolver.resolve(&claims).await?;

        // Derived fresh on every request so role changes apply immediately.
        let capabilities = state.capability_model.capabilities(&actor)?;

        Ok(AuthUser(RequestContext::new(actor, capabilities)))
    }
}
