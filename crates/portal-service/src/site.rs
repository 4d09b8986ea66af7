//! Geofence anchor management.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_database::repositories::SiteRepository;
use portal_entity::access::SystemAction;
use portal_entity::site::{CreateSite, GeoPoint, Site, UpdateSite};

use crate::context::RequestContext;

/// Site listing and editing.
#[derive(Debug, Clone)]
pub struct SiteService {
    site_repo: Arc<SiteRepository>,
}

impl SiteService {
    /// Creates a new site service.
    pub fn new(site_repo: Arc<SiteRepository>) -> Self {
        Self { site_repo }
    }

    /// All sites. Readable by every actor.
    pub async fn list(&self) -> AppResult<Vec<Site>> {
        self.site_repo.find_all().await
    }

    /// Register a site.
    pub async fn create(&self, ctx: &RequestContext, data: &CreateSite) -> AppResult<Site> {
        ctx.guard().require_action(SystemAction::ManageSites)?;
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Site name is required"));
        }
        check_anchor(data.latitude, data.longitude, data.allowed_radius_m)?;

        let site = self.site_repo.create(data).await?;
        info!(actor = %ctx.uid(), site_id = %site.id, name = %site.name, "Site created");
        Ok(site)
    }

    /// Edit a site. Absent fields keep their value; `clear_geofence`
    /// removes the anchor and radius.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        data: &UpdateSite,
    ) -> AppResult<Site> {
        ctx.guard().require_action(SystemAction::ManageSites)?;
        let existing = self
            .site_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Site {id} not found")))?;
        if data.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Site name cannot be blank"));
        }
        check_update(data, &existing)?;

        let site = self
            .site_repo
            .update(id, data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Site {id} not found")))?;
        info!(actor = %ctx.uid(), site_id = %id, "Site updated");
        Ok(site)
    }
}

/// The edit may not both set and clear the geofence, and must leave a
/// consistent anchor behind.
fn check_update(data: &UpdateSite, existing: &Site) -> AppResult<()> {
    if data.clear_geofence && data.sets_geofence() {
        return Err(AppError::validation(
            "Cannot set and clear the geofence in the same edit",
        ));
    }
    let (latitude, longitude, radius) = data.geofence_after(existing);
    check_anchor(latitude, longitude, radius)
}

/// Coordinates come as a valid pair or not at all; the radius is never negative.
fn check_anchor(
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius: Option<f64>,
) -> AppResult<()> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) if !GeoPoint::new(lat, lon).is_valid() => {
            return Err(AppError::validation("Site coordinates are out of range"));
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(AppError::validation(
                "Latitude and longitude must be set together",
            ));
        }
        _ => {}
    }
    match radius {
        Some(r) if !(r.is_finite() && r >= 0.0) => {
            Err(AppError::validation("Allowed radius must be zero or more"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_negative_radius_rejected() {
        assert!(check_anchor(Some(12.9), Some(77.5), Some(-1.0)).is_err());
        assert!(check_anchor(Some(12.9), Some(77.5), Some(0.0)).is_ok());
    }

    #[test]
    fn test_half_anchor_rejected() {
        assert!(check_anchor(Some(12.9), None, Some(100.0)).is_err());
    }

    #[test]
    fn test_unconfigured_site_allowed() {
        assert!(check_anchor(None, None, None).is_ok());
    }

    fn fenced_site() -> Site {
        Site {
            id: Uuid::new_v4(),
            name: "Depot".to_string(),
            latitude: Some(12.97),
            longitude: Some(77.59),
            allowed_radius_m: Some(300.0),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_geofence_can_be_cleared() {
        let data = UpdateSite {
            clear_geofence: true,
            ..UpdateSite::default()
        };
        assert!(check_update(&data, &fenced_site()).is_ok());
    }

    #[test]
    fn test_setting_and_clearing_together_rejected() {
        let data = UpdateSite {
            allowed_radius_m: Some(150.0),
            clear_geofence: true,
            ..UpdateSite::default()
        };
        assert!(check_update(&data, &fenced_site()).is_err());
    }

    #[test]
    fn test_partial_edit_merges_with_existing_anchor() {
        let data = UpdateSite {
            latitude: Some(95.0),
            ..UpdateSite::default()
        };
        assert!(check_update(&data, &fenced_site()).is_err());
    }
}
