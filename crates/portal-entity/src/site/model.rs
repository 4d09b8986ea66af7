//! Site entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, -90..=90.
    pub latitude: f64,
    /// Longitude in degrees, -180..=180.
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A registered work site with an optional geofence.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Site {
    /// Site identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Anchor latitude; unset until the site is configured.
    pub latitude: Option<f64>,
    /// Anchor longitude; unset until the site is configured.
    pub longitude: Option<f64>,
    /// Allowed radius around the anchor, in meters.
    pub allowed_radius_m: Option<f64>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Site {
    /// The anchor point, if both coordinates are registered.
    pub fn anchor(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }
}

/// Data for creating a site.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSite {
    /// Display name.
    pub name: String,
    /// Anchor latitude.
    pub latitude: Option<f64>,
    /// Anchor longitude.
    pub longitude: Option<f64>,
    /// Allowed radius in meters.
    pub allowed_radius_m: Option<f64>,
}

/// Data for editing a site. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSite {
    /// New display name.
    pub name: Option<String>,
    /// New anchor latitude.
    pub latitude: Option<f64>,
    /// New anchor longitude.
    pub longitude: Option<f64>,
    /// New allowed radius in meters.
    pub allowed_radius_m: Option<f64>,
    /// Drop the anchor and radius, turning geofencing off for the site.
    #[serde(default)]
    pub clear_geofence: bool,
}

impl UpdateSite {
    /// Whether the edit supplies any anchor or radius value.
    pub fn sets_geofence(&self) -> bool {
        self.latitude.is_some() || self.longitude.is_some() || self.allowed_radius_m.is_some()
    }

    /// Latitude, longitude and radius the site will have after this edit.
    pub fn geofence_after(&self, site: &Site) -> (Option<f64>, Option<f64>, Option<f64>) {
        if self.clear_geofence {
            return (None, None, None);
        }
        (
            self.latitude.or(site.latitude),
            self.longitude.or(site.longitude),
            self.allowed_radius_m.or(site.allowed_radius_m),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_requires_both_coordinates() {
        let mut site = Site {
            id: Uuid::new_v4(),
            name: "Depot".to_string(),
            latitude: Some(12.97),
            longitude: None,
            allowed_radius_m: Some(300.0),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(site.anchor().is_none());
        site.longitude = Some(77.59);
        assert_eq!(site.anchor(), Some(GeoPoint::new(12.97, 77.59)));
    }

    #[test]
    fn test_clearing_geofence_drops_anchor_and_radius() {
        let site = Site {
            id: Uuid::new_v4(),
            name: "Depot".to_string(),
            latitude: Some(12.97),
            longitude: Some(77.59),
            allowed_radius_m: Some(300.0),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let keep = UpdateSite {
            name: Some("North Depot".to_string()),
            ..UpdateSite::default()
        };
        assert_eq!(keep.geofence_after(&site), (Some(12.97), Some(77.59), Some(300.0)));

        let clear = UpdateSite {
            clear_geofence: true,
            ..UpdateSite::default()
        };
        assert_eq!(clear.geofence_after(&site), (None, None, None));
        assert!(!clear.sets_geofence());
    }

    #[test]
    fn test_out_of_range_point_invalid() {
        assert!(GeoPoint::new(12.0, 77.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }
}
