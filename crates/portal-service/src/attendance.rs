//! Geofenced check-in and terminal review of attendance events.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_database::repositories::{AttendanceRepository, SiteRepository};
use portal_entity::Decision;
use portal_entity::access::ResourceType;
use portal_entity::attendance::{AttendanceEvent, AttendanceStatus, NewAttendanceEvent};
use portal_entity::site::GeoPoint;

use crate::context::RequestContext;
use crate::geofence::{GeofenceDecision, GeofenceOutcome, GeofenceValidator};

/// A check-in submitted by the device.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckIn {
    /// Site being checked into, if the employee picked one.
    #[serde(default)]
    pub site_id: Option<Uuid>,
    /// Observed latitude.
    pub latitude: f64,
    /// Observed longitude.
    pub longitude: f64,
}

impl CheckIn {
    /// The observed point, validated.
    pub fn point(&self) -> AppResult<GeoPoint> {
        let point = GeoPoint::new(self.latitude, self.longitude);
        if point.is_valid() {
            Ok(point)
        } else {
            Err(AppError::validation("Coordinates are out of range"))
        }
    }
}

/// Attendance check-in and review.
#[derive(Debug, Clone)]
pub struct AttendanceService {
    attendance_repo: Arc<AttendanceRepository>,
    site_repo: Arc<SiteRepository>,
    geofence: GeofenceValidator,
}

impl AttendanceService {
    /// Creates a new attendance service.
    pub fn new(attendance_repo: Arc<AttendanceRepository>, site_repo: Arc<SiteRepository>) -> Self {
        Self {
            attendance_repo,
            site_repo,
            geofence: GeofenceValidator::new(),
        }
    }

    /// Record a check-in for the caller.
    ///
    /// A check-in outside the site's radius is still recorded, as pending.
    pub async fn check_in(
        &self,
        ctx: &RequestContext,
        check_in: &CheckIn,
    ) -> AppResult<AttendanceEvent> {
        let point = check_in.point()?;
        let site = match check_in.site_id {
            Some(id) => Some(
                self.site_repo
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Site {id} not found")))?,
            ),
            None => None,
        };

        let outcome = self.geofence.validate(point, site.as_ref());
        let new_event = new_event(ctx.subject_ref(), check_in.site_id, point, &outcome);
        let event = self.attendance_repo.create(&new_event).await?;

        info!(
            actor = %ctx.uid(),
            event_id = %event.id,
            status = %event.status,
            distance_m = ?outcome.distance_m,
            "Check-in recorded"
        );
        Ok(event)
    }

    /// Load an event the caller may decide.
    pub async fn load_for_review(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> AppResult<AttendanceEvent> {
        let event = self
            .attendance_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Attendance event {id} not found")))?;
        ctx.guard()
            .require_approval(ResourceType::Attendance, &event.employee_ref)?;
        Ok(event)
    }

    /// Approve or reject a pending event. Applied at most once.
    pub async fn decide(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        decision: Decision,
        reason: Option<&str>,
    ) -> AppResult<AttendanceEvent> {
        let event = self.load_for_review(ctx, id).await?;
        if event.status.is_terminal() {
            return Err(AppError::conflict(format!(
                "Attendance event {id} is already {}",
                event.status
            )));
        }

        let decided = self
            .attendance_repo
            .decide(id, AttendanceStatus::from(decision), ctx.uid(), reason)
            .await?
            .ok_or_else(|| AppError::conflict(format!("Attendance event {id} was already decided")))?;

        info!(
            actor = %ctx.uid(),
            event_id = %id,
            decision = %decision,
            "Attendance event decided"
        );
        Ok(decided)
    }
}

/// The row to persist for a validated check-in.
fn new_event(
    employee_ref: String,
    site_id: Option<Uuid>,
    point: GeoPoint,
    outcome: &GeofenceOutcome,
) -> NewAttendanceEvent {
    let status = match outcome.decision {
        GeofenceDecision::Accept => AttendanceStatus::Approved,
        GeofenceDecision::Escalate => AttendanceStatus::Pending,
    };
    NewAttendanceEvent {
        employee_ref,
        site_id,
        latitude: Some(point.latitude),
        longitude: Some(point.longitude),
        distance_m: outcome.distance_m,
        status,
        status_reason: outcome.escalation_reason(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalated_outcome_becomes_pending_with_distance() {
        let outcome = GeofenceOutcome {
            is_inside: false,
            distance_m: Some(450.0),
            allowed_radius_m: Some(300.0),
            decision: GeofenceDecision::Escalate,
        };
        let site = Uuid::new_v4();
        let event = new_event(
            "emp-1".to_string(),
            Some(site),
            GeoPoint::new(12.97, 77.75),
            &outcome,
        );
        assert_eq!(event.status, AttendanceStatus::Pending);
        assert_eq!(event.distance_m, Some(450.0));
        assert_eq!(event.site_id, Some(site));
        assert!(event.status_reason.is_some());
    }

    #[test]
    fn test_accepted_outcome_is_approved() {
        let outcome = GeofenceOutcome {
            is_inside: true,
            distance_m: Some(12.0),
            allowed_radius_m: Some(300.0),
            decision: GeofenceDecision::Accept,
        };
        let event = new_event("emp-1".to_string(), None, GeoPoint::new(0.0, 0.0), &outcome);
        assert_eq!(event.status, AttendanceStatus::Approved);
        assert_eq!(event.distance_m, Some(12.0));
        assert!(event.status_reason.is_none());
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let check_in = CheckIn {
            site_id: None,
            latitude: 120.0,
            longitude: 0.0,
        };
        assert!(check_in.point().is_err());
    }
}
