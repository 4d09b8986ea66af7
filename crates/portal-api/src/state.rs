//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use portal_auth::{AccessPolicy, JwtDecoder, RoleCapabilityModel, ScopedQueryBuilder};
use portal_core::config::AppConfig;
use portal_core::result::AppResult;
use portal_database::repositories::{
    AttendanceRepository, DeliveryRecordRepository, EmployeeRepository, HolidayRepository,
    LeaveRepository, ScopedRecordRepository, SiteRepository, TemplateRepository,
};
use portal_notify::{
    AudienceResolver, ChannelSet, DeliveryAuditLog, NotificationDispatcher, PushTokenRegistry,
    TemplateResolver,
};
use portal_service::{
    ActorResolver, AttendanceService, HolidayService, LeaveService, MonthlyReportService,
    NotificationTriggers, PushTokenService, RecordService, SiteService, TemplateService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth & access ────────────────────────────────────────
    /// JWT verifier
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Claims to actor resolution
    pub actor_resolver: Arc<ActorResolver>,
    /// Role table to capability matrix
    pub capability_model: Arc<RoleCapabilityModel>,

    // ── Notification core ────────────────────────────────────
    /// Multi-channel dispatcher
    pub dispatcher: Arc<NotificationDispatcher>,

    // ── Services ─────────────────────────────────────────────
    /// Scoped listings
    pub record_service: Arc<RecordService>,
    /// Check-in and attendance review
    pub attendance_service: Arc<AttendanceService>,
    /// Leave review
    pub leave_service: Arc<LeaveService>,
    /// Geofence anchors
    pub site_service: Arc<SiteService>,
    /// Holiday records
    pub holiday_service: Arc<HolidayService>,
    /// Template management
    pub template_service: Arc<TemplateService>,
    /// Device token registration
    pub push_service: Arc<PushTokenService>,
    /// Business-event notifications
    pub triggers: Arc<NotificationTriggers>,
    /// Monthly attendance report
    pub report_service: Arc<MonthlyReportService>,
}

impl AppState {
    /// Wire repositories, access policy, channels and services.
    ///
    /// Fails if the role table or a channel configuration is invalid.
    pub fn build(config: AppConfig, db_pool: PgPool) -> AppResult<Self> {
        // ── Repositories ─────────────────────────────────────
        let employee_repo = Arc::new(EmployeeRepository::new(db_pool.clone()));
        let site_repo = Arc::new(SiteRepository::new(db_pool.clone()));
        let attendance_repo = Arc::new(AttendanceRepository::new(db_pool.clone()));
        let leave_repo = Arc::new(LeaveRepository::new(db_pool.clone()));
        let holiday_repo = Arc::new(HolidayRepository::new(db_pool.clone()));
        let template_repo = Arc::new(TemplateRepository::new(db_pool.clone()));
        let delivery_repo = Arc::new(DeliveryRecordRepository::new(db_pool.clone()));
        let scoped_repo = Arc::new(ScopedRecordRepository::new(db_pool.clone()));

        // ── Access ───────────────────────────────────────────
        let policy = Arc::new(AccessPolicy::from_config(&config.access)?);
        let capability_model = Arc::new(RoleCapabilityModel::new(Arc::clone(&policy)));
        let scopes = Arc::new(ScopedQueryBuilder::new(Arc::clone(&policy)));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let actor_resolver = Arc::new(ActorResolver::new(employee_repo.clone()));

        // ── Notification core ────────────────────────────────
        let template_resolver = TemplateResolver::new(template_repo.clone());
        let token_registry = PushTokenRegistry::new(employee_repo.clone());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            AudienceResolver::new(employee_repo.clone()),
            template_resolver.clone(),
            ChannelSet::from_config(&config.notify)?,
            token_registry.clone(),
            DeliveryAuditLog::new(delivery_repo),
            config.notify.max_concurrency,
        ));

        // ── Services ─────────────────────────────────────────
        let record_service = Arc::new(RecordService::new(scopes, scoped_repo));
        let attendance_service = Arc::new(AttendanceService::new(
            Arc::clone(&attendance_repo),
            site_repo.clone(),
        ));
        let leave_service = Arc::new(LeaveService::new(leave_repo));
        let site_service = Arc::new(SiteService::new(site_repo));
        let holiday_service = Arc::new(HolidayService::new(holiday_repo));
        let template_service = Arc::new(TemplateService::new(template_repo, template_resolver));
        let push_service = Arc::new(PushTokenService::new(token_registry));
        let triggers = Arc::new(NotificationTriggers::new(
            Arc::clone(&dispatcher),
            config.notify.templates.clone(),
            Arc::clone(&leave_service),
            Arc::clone(&attendance_service),
            Arc::clone(&holiday_service),
        ));
        let report_service = Arc::new(MonthlyReportService::new(
            attendance_repo,
            Arc::clone(&dispatcher),
            config.notify.templates.monthly_report.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            jwt_decoder,
            actor_resolver,
            capability_model,
            dispatcher,
            record_service,
            attendance_service,
            leave_service,
            site_service,
            holiday_service,
            template_service,
            push_service,
            triggers,
            report_service,
        })
    }
}
