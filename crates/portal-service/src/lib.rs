//! # portal-service
//!
//! Business logic service layer for the portal. Each service orchestrates
//! repositories, the access policy and the notification dispatcher to
//! implement one family of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod actor;
pub mod attendance;
pub mod context;
pub mod geofence;
pub mod holiday;
pub mod leave;
pub mod push;
pub mod records;
pub mod report;
pub mod site;
pub mod template;
pub mod triggers;

pub use actor::{ActorResolver, ScopeResolutionError};
pub use attendance::{AttendanceService, CheckIn};
pub use context::RequestContext;
pub use geofence::{GeofenceDecision, GeofenceOutcome, GeofenceValidator};
pub use holiday::HolidayService;
pub use leave::LeaveService;
pub use push::PushTokenService;
pub use records::{RecordService, ScopedPage};
pub use report::{MonthlyReportService, ReportPeriod};
pub use site::SiteService;
pub use template::TemplateService;
pub use triggers::{BroadcastRequest, NotificationTriggers};
