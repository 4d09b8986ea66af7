//! Great-circle distance check of a check-in against a site's allowed radius.

use serde::{Deserialize, Serialize};

use portal_entity::site::{GeoPoint, Site};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// What happens to the check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeofenceDecision {
    /// Recorded as approved.
    Accept,
    /// Recorded as pending review.
    Escalate,
}

/// Result of validating one observed coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeofenceOutcome {
    /// Whether the point lies within the radius (true when unconstrained).
    pub is_inside: bool,
    /// Distance to the site anchor, when the site has one.
    pub distance_m: Option<f64>,
    /// Radius that was applied, if any.
    pub allowed_radius_m: Option<f64>,
    /// Accept or escalate.
    pub decision: GeofenceDecision,
}

impl GeofenceOutcome {
    fn unconstrained(distance_m: Option<f64>) -> Self {
        Self {
            is_inside: true,
            distance_m,
            allowed_radius_m: None,
            decision: GeofenceDecision::Accept,
        }
    }

    /// Reviewer-facing reason for an escalated check-in.
    pub fn escalation_reason(&self) -> Option<String> {
        match (self.decision, self.distance_m, self.allowed_radius_m) {
            (GeofenceDecision::Escalate, Some(d), Some(r)) => Some(format!(
                "Checked in {d:.0} m from site, outside the allowed {r:.0} m"
            )),
            _ => None,
        }
    }
}

/// Haversine distance between two points, in meters.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Validates check-ins against per-site geofences.
///
/// Geofencing is opt-in per site: a missing site, missing anchor or missing
/// radius all accept the check-in.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeofenceValidator;

impl GeofenceValidator {
    /// Create a validator.
    pub fn new() -> Self {
        Self
    }

    /// Validate an observed point against an optional site.
    pub fn validate(&self, observed: GeoPoint, site: Option<&Site>) -> GeofenceOutcome {
        let Some(anchor) = site.and_then(Site::anchor) else {
            return GeofenceOutcome::unconstrained(None);
        };
        let distance = haversine_m(observed, anchor);

        match site.and_then(|s| s.allowed_radius_m) {
            Some(radius) => {
                let is_inside = distance <= radius;
                GeofenceOutcome {
                    is_inside,
                    distance_m: Some(distance),
                    allowed_radius_m: Some(radius),
                    decision: if is_inside {
                        GeofenceDecision::Accept
                    } else {
                        GeofenceDecision::Escalate
                    },
                }
            }
            None => GeofenceOutcome::unconstrained(Some(distance)),
        }
    }
}
