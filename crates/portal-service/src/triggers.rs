//! One operation per business event, each ending in a single dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use portal_core::config::notify::EventTemplates;
use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::types::pagination::{PageRequest, PageResponse};
use portal_entity::access::SystemAction;
use portal_entity::attendance::AttendanceEvent;
use portal_entity::delivery::DeliveryRecord;
use portal_entity::holiday::Holiday;
use portal_entity::leave::LeaveApplication;
use portal_notify::{
    Audience, DispatchRequest, DispatchSummary, MessageContent, NotificationDispatcher,
};

use crate::attendance::AttendanceService;
use crate::context::RequestContext;
use crate::holiday::HolidayService;
use crate::leave::LeaveService;

const DATE_FORMAT: &str = "%d %b %Y";

/// An ad-hoc announcement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastRequest {
    /// Inline title; ignored when `template` is set.
    #[serde(default)]
    pub title: Option<String>,
    /// Inline body; ignored when `template` is set.
    #[serde(default)]
    pub body: Option<String>,
    /// Stored template slug.
    #[serde(default)]
    pub template: Option<String>,
    /// Template variables.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    /// Explicit identity aliases.
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Role labels to expand.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Every active employee.
    #[serde(default)]
    pub everyone: bool,
    /// Also deliver to push tokens.
    #[serde(default)]
    pub push: bool,
    /// Push badge count.
    #[serde(default)]
    pub badge: Option<u32>,
    /// Push click-through destination.
    #[serde(default)]
    pub link: Option<String>,
}

impl BroadcastRequest {
    fn into_dispatch(self) -> DispatchRequest {
        let content = MessageContent {
            template: self.template,
            subject: self.title,
            body: self.body,
            variables: self.variables,
        };
        let audience = Audience {
            recipients: self.recipients,
            roles: self.roles,
            everyone: self.everyone,
        };
        let request = DispatchRequest::new("broadcast", content, audience);
        if self.push {
            request.with_push(self.badge, self.link)
        } else {
            request
        }
    }
}

/// Business-event notifications.
#[derive(Debug, Clone)]
pub struct NotificationTriggers {
    dispatcher: Arc<NotificationDispatcher>,
    templates: EventTemplates,
    leave: Arc<LeaveService>,
    attendance: Arc<AttendanceService>,
    holidays: Arc<HolidayService>,
}

impl NotificationTriggers {
    /// Creates the trigger surface.
    pub fn new(
        dispatcher: Arc<NotificationDispatcher>,
        templates: EventTemplates,
        leave: Arc<LeaveService>,
        attendance: Arc<AttendanceService>,
        holidays: Arc<HolidayService>,
    ) -> Self {
        Self {
            dispatcher,
            templates,
            leave,
            attendance,
            holidays,
        }
    }

    /// Notify the applicant of a decided leave application.
    pub async fn leave_decision(
        &self,
        ctx: &RequestContext,
        application: &LeaveApplication,
        reason: Option<&str>,
    ) -> AppResult<DispatchSummary> {
        let variables = leave_variables(application, ctx.actor.display_name(), reason)?;
        let request = DispatchRequest::new(
            "leave_decision",
            MessageContent::template(&self.templates.leave_decision, variables),
            Audience::recipients([application.employee_ref.clone()]),
        )
        .about(application.id.to_string())
        .triggered_by(ctx.uid());
        self.dispatcher.dispatch_detached(request).await
    }

    /// Re-send the decision notification for a leave application.
    pub async fn resend_leave_decision(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        reason: Option<&str>,
    ) -> AppResult<DispatchSummary> {
        let application = self.leave.load_for_review(ctx, id).await?;
        self.leave_decision(ctx, &application, reason).await
    }

    /// Notify the employee of a decided attendance event.
    pub async fn attendance_decision(
        &self,
        ctx: &RequestContext,
        event: &AttendanceEvent,
        reason: Option<&str>,
    ) -> AppResult<DispatchSummary> {
        let variables = attendance_variables(event, ctx.actor.display_name(), reason)?;
        let request = DispatchRequest::new(
            "attendance_decision",
            MessageContent::template(&self.templates.attendance_decision, variables),
            Audience::recipients([event.employee_ref.clone()]),
        )
        .about(event.id.to_string())
        .triggered_by(ctx.uid());
        self.dispatcher.dispatch_detached(request).await
    }

    /// Re-send the decision notification for an attendance event.
    pub async fn resend_attendance_decision(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        reason: Option<&str>,
    ) -> AppResult<DispatchSummary> {
        let event = self.attendance.load_for_review(ctx, id).await?;
        self.attendance_decision(ctx, &event, reason).await
    }

    /// Announce a holiday to every active employee.
    pub async fn holiday(&self, ctx: &RequestContext, id: Uuid) -> AppResult<DispatchSummary> {
        ctx.guard().require_action(SystemAction::AnnounceHoliday)?;
        let holiday = self.holidays.get(id).await?;
        let request = DispatchRequest::new(
            "holiday",
            MessageContent::template(
                &self.templates.holiday_announcement,
                holiday_variables(&holiday),
            ),
            Audience::everyone(),
        )
        .about(holiday.id.to_string())
        .triggered_by(ctx.uid());
        self.dispatcher.dispatch_detached(request).await
    }

    /// Send an ad-hoc broadcast.
    pub async fn broadcast(
        &self,
        ctx: &RequestContext,
        broadcast: BroadcastRequest,
    ) -> AppResult<DispatchSummary> {
        ctx.guard().require_action(SystemAction::SendBroadcast)?;
        let request = broadcast.into_dispatch().triggered_by(ctx.uid());
        info!(
            actor = %ctx.uid(),
            everyone = request.audience.everyone,
            roles = request.audience.roles.len(),
            recipients = request.audience.recipients.len(),
            push = request.push,
            "Broadcast requested"
        );
        self.dispatcher.dispatch_detached(request).await
    }

    /// Page through the delivery log.
    pub async fn deliveries(
        &self,
        ctx: &RequestContext,
        event: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DeliveryRecord>> {
        ctx.guard().require_action(SystemAction::ViewDeliveryLog)?;
        self.dispatcher.audit().page(event, page).await
    }
}

fn leave_variables(
    application: &LeaveApplication,
    reviewer: &str,
    reason: Option<&str>,
) -> AppResult<BTreeMap<String, String>> {
    let decision = application.status.decision().ok_or_else(|| {
        AppError::conflict(format!(
            "Leave application {} has not been decided",
            application.id
        ))
    })?;
    let reason = reason.or(application.decision_reason.as_deref()).unwrap_or("");
    Ok(BTreeMap::from([
        ("decision".to_string(), decision.as_str().to_string()),
        ("leave_type".to_string(), application.leave_type.clone()),
        (
            "start_date".to_string(),
            application.start_date.format(DATE_FORMAT).to_string(),
        ),
        (
            "end_date".to_string(),
            application.end_date.format(DATE_FORMAT).to_string(),
        ),
        ("reviewer".to_string(), reviewer.to_string()),
        ("reason".to_string(), reason.to_string()),
    ]))
}

fn attendance_variables(
    event: &AttendanceEvent,
    reviewer: &str,
    reason: Option<&str>,
) -> AppResult<BTreeMap<String, String>> {
    let decision = event.status.decision().ok_or_else(|| {
        AppError::conflict(format!("Attendance event {} has not been decided", event.id))
    })?;
    let reason = reason.or(event.status_reason.as_deref()).unwrap_or("");
    Ok(BTreeMap::from([
        ("decision".to_string(), decision.as_str().to_string()),
        (
            "date".to_string(),
            event.checked_in_at.format(DATE_FORMAT).to_string(),
        ),
        ("reviewer".to_string(), reviewer.to_string()),
        ("reason".to_string(), reason.to_string()),
    ]))
}

fn holiday_variables(holiday: &Holiday) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("holiday".to_string(), holiday.name.clone()),
        ("date".to_string(), holiday.date.format(DATE_FORMAT).to_string()),
        (
            "description".to_string(),
            holiday.description.clone().unwrap_or_default(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use portal_entity::attendance::AttendanceStatus;
    use portal_entity::leave::LeaveStatus;

    fn application(status: LeaveStatus) -> LeaveApplication {
        LeaveApplication {
            id: Uuid::new_v4(),
            employee_ref: "emp-7".to_string(),
            leave_type: "casual".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
            reason: Some("family function".to_string()),
            status,
            decision_reason: Some("enjoy".to_string()),
            decided_by: Some("uid-hr".to_string()),
            decided_at: Some(Utc::now()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_leave_variables_prefer_override_reason() {
        let vars = leave_variables(
            &application(LeaveStatus::Approved),
            "Meera",
            Some("approved early"),
        )
        .unwrap();
        assert_eq!(vars["decision"], "approved");
        assert_eq!(vars["start_date"], "10 Mar 2025");
        assert_eq!(vars["reviewer"], "Meera");
        assert_eq!(vars["reason"], "approved early");
    }

    #[test]
    fn test_leave_variables_fall_back_to_stored_reason() {
        let vars = leave_variables(&application(LeaveStatus::Rejected), "Meera", None).unwrap();
        assert_eq!(vars["decision"], "rejected");
        assert_eq!(vars["reason"], "enjoy");
    }

    #[test]
    fn test_pending_leave_cannot_be_announced() {
        assert!(leave_variables(&application(LeaveStatus::Pending), "Meera", None).is_err());
    }

    #[test]
    fn test_attendance_variables() {
        let event = AttendanceEvent {
            id: Uuid::new_v4(),
            employee_ref: "emp-7".to_string(),
            site_id: None,
            latitude: Some(12.97),
            longitude: Some(77.75),
            distance_m: Some(450.0),
            status: AttendanceStatus::Approved,
            status_reason: None,
            decided_by: Some("uid-sup".to_string()),
            decided_at: Some(Utc::now()),
            checked_in_at: Utc.with_ymd_and_hms(2025, 3, 4, 9, 15, 0).unwrap(),
        };
        let vars = attendance_variables(&event, "Ravi", None).unwrap();
        assert_eq!(vars["date"], "04 Mar 2025");
        assert_eq!(vars["reason"], "");
    }

    #[test]
    fn test_broadcast_maps_to_dispatch() {
        let request = BroadcastRequest {
            title: Some("Town hall".to_string()),
            body: Some("Friday 4pm".to_string()),
            roles: vec!["supervisor".to_string()],
            push: true,
            badge: Some(1),
            ..BroadcastRequest::default()
        }
        .into_dispatch();
        assert_eq!(request.event, "broadcast");
        assert!(request.push);
        assert_eq!(request.badge, Some(1));
        assert_eq!(request.audience.roles, vec!["supervisor".to_string()]);
        assert_eq!(request.content.subject.as_deref(), Some("Town hall"));
    }

    #[test]
    fn test_holiday_variables_blank_description() {
        let holiday = Holiday {
            id: Uuid::new_v4(),
            name: "Diwali".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 10, 20).unwrap(),
            description: None,
            created_by: None,
            created_at: Utc::now(),
        };
        let vars = holiday_variables(&holiday);
        assert_eq!(vars["holiday"], "Diwali");
        assert_eq!(vars["description"], "");
    }
}
