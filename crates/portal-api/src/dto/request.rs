//! Request DTOs with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use portal_entity::Decision;
use portal_entity::holiday::CreateHoliday;
use portal_entity::site::{CreateSite, UpdateSite};
use portal_entity::template::UpsertTemplate;

/// Approve or reject a pending record.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DecisionRequest {
    /// The decision.
    pub decision: Decision,
    /// Optional note shown to the employee.
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Re-send a decision notification.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendDecisionRequest {
    /// Record identifier.
    pub id: Uuid,
    /// Reason overriding the stored one.
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Announce a stored holiday.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnnounceHolidayRequest {
    /// Holiday identifier.
    pub holiday_id: Uuid,
}

/// Create a site.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSiteRequest {
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "Site name is required"))]
    pub name: String,
    /// Anchor latitude.
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    /// Anchor longitude.
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    /// Allowed radius in meters.
    #[validate(range(min = 0.0, message = "Allowed radius must be zero or more"))]
    pub allowed_radius_m: Option<f64>,
}

impl From<CreateSiteRequest> for CreateSite {
    fn from(req: CreateSiteRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            latitude: req.latitude,
            longitude: req.longitude,
            allowed_radius_m: req.allowed_radius_m,
        }
    }
}

/// Edit a site.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSiteRequest {
    /// New display name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// New anchor latitude.
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    /// New anchor longitude.
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    /// New allowed radius in meters.
    #[validate(range(min = 0.0, message = "Allowed radius must be zero or more"))]
    pub allowed_radius_m: Option<f64>,
    /// Remove the anchor and radius.
    #[serde(default)]
    pub clear_geofence: bool,
}

impl From<UpdateSiteRequest> for UpdateSite {
    fn from(req: UpdateSiteRequest) -> Self {
        Self {
            name: req.name,
            latitude: req.latitude,
            longitude: req.longitude,
            allowed_radius_m: req.allowed_radius_m,
            clear_geofence: req.clear_geofence,
        }
    }
}

/// Create a holiday.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateHolidayRequest {
    /// Holiday name.
    #[validate(length(min = 1, max = 200, message = "Holiday name is required"))]
    pub name: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Optional description.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl From<CreateHolidayRequest> for CreateHoliday {
    fn from(req: CreateHolidayRequest) -> Self {
        Self {
            name: req.name,
            date: req.date,
            description: req.description,
        }
    }
}

/// Create or replace a template.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertTemplateRequest {
    /// Subject pattern.
    #[validate(length(min = 1, max = 500, message = "Subject is required"))]
    pub subject: String,
    /// Body pattern.
    #[validate(length(min = 1, max = 10000, message = "Body is required"))]
    pub body: String,
    /// Operator note.
    pub description: Option<String>,
}

impl From<UpsertTemplateRequest> for UpsertTemplate {
    fn from(req: UpsertTemplateRequest) -> Self {
        Self {
            subject: req.subject,
            body: req.body,
            description: req.description,
        }
    }
}

/// Register or unregister a device token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PushTokenRequest {
    /// Opaque device token.
    #[validate(length(min = 1, max = 4096, message = "Token is required"))]
    pub token: String,
}

/// Holiday listing filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidayQuery {
    /// Earliest date to include; defaults to today.
    #[serde(default)]
    pub from: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_radius_fails_validation() {
        let req = CreateSiteRequest {
            name: "Depot".to_string(),
            latitude: Some(12.9),
            longitude: Some(77.6),
            allowed_radius_m: Some(-5.0),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_decision_parses_lowercase() {
        let req: DecisionRequest =
            serde_json::from_str(r#"{"decision":"rejected","reason":"overlaps audit"}"#).unwrap();
        assert_eq!(req.decision, Decision::Rejected);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_blank_token_fails_validation() {
        let req = PushTokenRequest {
            token: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
