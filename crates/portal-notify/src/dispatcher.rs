//! Fans one message out across recipients and channels.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_entity::delivery::{Channel, ChannelTally, DeliveryStatus, NewDeliveryRecord};
use portal_entity::employee::Recipient;

use crate::audience::{Audience, AudienceResolver};
use crate::audit::DeliveryAuditLog;
use crate::channel::{ChannelProvider, ChannelSet, OutboundMessage};
use crate::error::{ChannelSendError, DispatchError};
use crate::registry::PushTokenRegistry;
use crate::template::{MessageContent, TemplateResolver};

/// One logical dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRequest {
    /// Business event name recorded in the audit log.
    pub event: String,
    /// Template slug or inline text, plus variables.
    pub content: MessageContent,
    /// Who to notify.
    pub audience: Audience,
    /// Also deliver to registered push tokens.
    #[serde(default)]
    pub push: bool,
    /// Badge count for push.
    #[serde(default)]
    pub badge: Option<u32>,
    /// Click-through destination for push.
    #[serde(default)]
    pub link: Option<String>,
    /// Record the dispatch is about.
    #[serde(default)]
    pub subject_ref: Option<String>,
    /// Auth uid of the triggering actor.
    #[serde(default)]
    pub triggered_by: Option<String>,
}

impl DispatchRequest {
    /// A request with no push and no provenance.
    pub fn new(event: impl Into<String>, content: MessageContent, audience: Audience) -> Self {
        Self {
            event: event.into(),
            content,
            audience,
            push: false,
            badge: None,
            link: None,
            subject_ref: None,
            triggered_by: None,
        }
    }

    /// Deliver to push tokens as well.
    pub fn with_push(mut self, badge: Option<u32>, link: Option<String>) -> Self {
        self.push = true;
        self.badge = badge;
        self.link = link;
        self
    }

    /// Attach the record the dispatch is about.
    pub fn about(mut self, subject_ref: impl Into<String>) -> Self {
        self.subject_ref = Some(subject_ref.into());
        self
    }

    /// Attach the triggering actor.
    pub fn triggered_by(mut self, uid: impl Into<String>) -> Self {
        self.triggered_by = Some(uid.into());
        self
    }
}

/// Outcome returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    /// Dispatch identifier, equal to the delivery record id.
    pub dispatch_id: Uuid,
    /// Overall outcome.
    pub status: DeliveryStatus,
    /// Resolved audience size.
    pub recipient_count: u32,
    /// Recipients with at least one successful channel.
    pub notified_count: u32,
    /// Channel sends issued.
    pub attempted: u32,
    /// Channel sends accepted.
    pub succeeded: u32,
    /// Channel sends failed.
    pub failed: u32,
    /// Per-channel breakdown.
    pub channels: Vec<ChannelTally>,
    /// Whether the delivery record was written.
    pub recorded: bool,
}

/// A single provider call to make.
struct SendJob {
    recipient: usize,
    channel: Channel,
    address: String,
    provider: Arc<dyn ChannelProvider>,
}

/// Fans messages across channels and writes one audit record per dispatch.
pub struct NotificationDispatcher {
    audience: AudienceResolver,
    templates: TemplateResolver,
    channels: ChannelSet,
    tokens: PushTokenRegistry,
    audit: DeliveryAuditLog,
    max_concurrency: usize,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("channels", &self.channels)
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

impl NotificationDispatcher {
    /// Assemble a dispatcher.
    pub fn new(
        audience: AudienceResolver,
        templates: TemplateResolver,
        channels: ChannelSet,
        tokens: PushTokenRegistry,
        audit: DeliveryAuditLog,
        max_concurrency: usize,
    ) -> Self {
        Self {
            audience,
            templates,
            channels,
            tokens,
            audit,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// The template resolver used for dispatches.
    pub fn templates(&self) -> &TemplateResolver {
        &self.templates
    }

    /// The push token registry.
    pub fn tokens(&self) -> &PushTokenRegistry {
        &self.tokens
    }

    /// The delivery audit log.
    pub fn audit(&self) -> &DeliveryAuditLog {
        &self.audit
    }

    /// Run a dispatch on its own task and wait for it.
    ///
    /// If the caller's future is dropped the task keeps running, so sends
    /// already issued still complete and are recorded.
    pub async fn dispatch_detached(
        self: &Arc<Self>,
        request: DispatchRequest,
    ) -> AppResult<DispatchSummary> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.dispatch(request).await })
            .await
            .map_err(|e| AppError::internal(format!("Dispatch task failed: {e}")))?
            .map_err(AppError::from)
    }

    /// Run one dispatch to completion.
    ///
    /// Only setup faults are returned as errors. Channel failures are
    /// counted in the summary and the delivery record.
    pub async fn dispatch(
        &self,
        request: DispatchRequest,
    ) -> Result<DispatchSummary, DispatchError> {
        if request.event.trim().is_empty() {
            return Err(DispatchError::MissingField("event"));
        }
        if request.audience.is_empty() {
            return Err(DispatchError::MissingField("audience"));
        }
        if request.push && !self.channels.is_enabled(Channel::Push) {
            return Err(DispatchError::ChannelUnavailable(Channel::Push));
        }

        let prepared = self.templates.prepare(&request.content).await?;
        let recipients = self.audience.resolve(&request.audience).await?;
        let dispatch_id = Uuid::new_v4();

        debug!(
            dispatch_id = %dispatch_id,
            event = %request.event,
            recipient_count = recipients.len(),
            "Dispatch started"
        );

        let jobs = self.plan(&recipients, request.push);
        let messages: Vec<Arc<OutboundMessage>> = recipients
            .iter()
            .map(|r| {
                let rendered = prepared.render_with(&[("name", r.name.as_str())]);
                Arc::new(OutboundMessage {
                    subject: rendered.subject,
                    body: rendered.body,
                    badge: request.badge,
                    link: request.link.clone(),
                })
            })
            .collect();

        let outcomes = self.fan_out(&jobs, &messages).await;

        let mut tallies: BTreeMap<Channel, ChannelTally> = self
            .relevant_channels(request.push)
            .into_iter()
            .map(|c| (c, ChannelTally::empty(c)))
            .collect();
        let mut notified: HashSet<usize> = HashSet::new();
        let mut invalid: HashMap<usize, Vec<String>> = HashMap::new();

        for (job, outcome) in jobs.iter().zip(outcomes) {
            let tally = tallies
                .entry(job.channel)
                .or_insert_with(|| ChannelTally::empty(job.channel));
            tally.record(outcome.is_ok());
            match outcome {
                Ok(()) => {
                    notified.insert(job.recipient);
                }
                Err(e) => {
                    warn!(
                        dispatch_id = %dispatch_id,
                        channel = %job.channel,
                        employee_id = %recipients[job.recipient].employee_id,
                        error = %e,
                        "Channel send failed"
                    );
                    if e.is_invalid_token() {
                        tally.invalid_tokens += 1;
                        invalid
                            .entry(job.recipient)
                            .or_default()
                            .push(job.address.clone());
                    }
                }
            }
        }

        for (idx, tokens) in invalid {
            let employee_id = recipients[idx].employee_id;
            if let Err(e) = self.tokens.prune(employee_id, &tokens).await {
                error!(employee_id = %employee_id, error = %e, "Failed to prune push tokens");
            }
        }

        let channels: Vec<ChannelTally> = tallies.into_values().collect();
        let attempted: u32 = channels.iter().map(|t| t.attempted).sum();
        let succeeded: u32 = channels.iter().map(|t| t.succeeded).sum();
        let failed: u32 = channels.iter().map(|t| t.failed).sum();
        let status = DeliveryStatus::from_counts(attempted, succeeded);
        let base = prepared.render();

        let record = NewDeliveryRecord {
            id: dispatch_id,
            event: request.event.clone(),
            title: base.subject,
            body: base.body,
            template_slug: prepared.slug.clone(),
            recipient_count: count(recipients.len()),
            notified_count: count(notified.len()),
            attempted_count: attempted,
            success_count: succeeded,
            failure_count: failed,
            status,
            channels: channels.clone(),
            subject_ref: request.subject_ref.clone(),
            triggered_by: request.triggered_by.clone(),
        };

        let recorded = match self.audit.record(&record).await {
            Ok(_) => true,
            Err(e) => {
                error!(dispatch_id = %dispatch_id, error = %e, "Failed to write delivery record");
                false
            }
        };

        info!(
            dispatch_id = %dispatch_id,
            event = %request.event,
            status = %status,
            recipient_count = record.recipient_count,
            notified_count = record.notified_count,
            attempted,
            succeeded,
            failed,
            "Dispatch finished"
        );

        Ok(DispatchSummary {
            dispatch_id,
            status,
            recipient_count: record.recipient_count,
            notified_count: record.notified_count,
            attempted,
            succeeded,
            failed,
            channels,
            recorded,
        })
    }

    /// Channels that apply to a request, in tally order.
    fn relevant_channels(&self, push: bool) -> Vec<Channel> {
        [Channel::Email, Channel::Messaging, Channel::Push]
            .into_iter()
            .filter(|c| self.channels.is_enabled(*c))
            .filter(|c| *c != Channel::Push || push)
            .collect()
    }

    /// One job per recipient and usable address on each enabled channel.
    fn plan(&self, recipients: &[Recipient], push: bool) -> Vec<SendJob> {
        let email = self.channels.get(Channel::Email);
        let messaging = self.channels.get(Channel::Messaging);
        let push = self.channels.get(Channel::Push).filter(|_| push);

        let mut jobs = Vec::new();
        let mut unreachable = 0usize;
        for (idx, recipient) in recipients.iter().enumerate() {
            let before = jobs.len();
            if let (Some(provider), Some(address)) = (email, &recipient.email) {
                jobs.push(SendJob {
                    recipient: idx,
                    channel: Channel::Email,
                    address: address.clone(),
                    provider: Arc::clone(provider),
                });
            }
            if let (Some(provider), Some(address)) = (messaging, &recipient.phone) {
                jobs.push(SendJob {
                    recipient: idx,
                    channel: Channel::Messaging,
                    address: address.clone(),
                    provider: Arc::clone(provider),
                });
            }
            if let Some(provider) = push {
                for token in &recipient.push_tokens {
                    jobs.push(SendJob {
                        recipient: idx,
                        channel: Channel::Push,
                        address: token.clone(),
                        provider: Arc::clone(provider),
                    });
                }
            }
            if jobs.len() == before {
                unreachable += 1;
            }
        }
        if unreachable > 0 {
            debug!(unreachable, "Recipients without a usable address were skipped");
        }
        jobs
    }

    /// Issue every job concurrently, bounded by `max_concurrency`, and wait
    /// for all of them. Outcomes are returned in job order.
    async fn fan_out(
        &self,
        jobs: &[SendJob],
        messages: &[Arc<OutboundMessage>],
    ) -> Vec<Result<(), ChannelSendError>> {
        let limiter = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(jobs.len());

        for job in jobs {
            let provider = Arc::clone(&job.provider);
            let message = Arc::clone(&messages[job.recipient]);
            let address = job.address.clone();
            let limiter = Arc::clone(&limiter);

            handles.push(tokio::spawn(async move {
                let _permit = limiter
                    .acquire()
                    .await
                    .map_err(|_| ChannelSendError::Transport("send limiter closed".to_string()))?;
                provider.send(&address, &message).await
            }));
        }

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| {
                joined.unwrap_or_else(|e| {
                    Err(ChannelSendError::Transport(format!("send task failed: {e}")))
                })
            })
            .collect()
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use portal_core::types::pagination::{PageRequest, PageResponse};
    use portal_entity::delivery::DeliveryRecord;
    use portal_entity::employee::{Employee, EmployeeStatus};
    use portal_entity::template::NotificationTemplate;

    use crate::store::{DeliveryStore, DirectoryStore, PushTokenStore, TemplateStore};

    #[derive(Default)]
    struct FakeDirectory {
        employees: Vec<Employee>,
    }

    #[async_trait]
    impl DirectoryStore for FakeDirectory {
        async fn active_employees(&self) -> AppResult<Vec<Employee>> {
            Ok(self.employees.clone())
        }

        async fn active_by_roles(&self, roles: &[String]) -> AppResult<Vec<Employee>> {
            Ok(self
                .employees
                .iter()
                .filter(|e| e.roles.iter().any(|r| roles.contains(&r.to_lowercase())))
                .cloned()
                .collect())
        }

        async fn active_by_aliases(&self, aliases: &[String]) -> AppResult<Vec<Employee>> {
            Ok(self
                .employees
                .iter()
                .filter(|e| aliases.contains(&e.auth_uid) || aliases.contains(&e.id.to_string()))
                .cloned()
                .collect())
        }
    }

    struct FakeTemplates;

    #[async_trait]
    impl TemplateStore for FakeTemplates {
        async fn find_template(&self, slug: &str) -> AppResult<Option<NotificationTemplate>> {
            Ok((slug == "holiday-announcement").then(|| NotificationTemplate {
                slug: slug.to_string(),
                subject: "Holiday: {{holiday}}".to_string(),
                body: "Hello {{name}}, {{date}} is {{holiday}}.".to_string(),
                description: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        }
    }

    #[derive(Default)]
    struct FakeTokens {
        sets: Mutex<HashMap<Uuid, BTreeSet<String>>>,
    }

    #[async_trait]
    impl PushTokenStore for FakeTokens {
        async fn add_token(&self, employee_id: Uuid, token: &str) -> AppResult<bool> {
            self.sets
                .lock()
                .unwrap()
                .entry(employee_id)
                .or_default()
                .insert(token.to_string());
            Ok(true)
        }

        async fn remove_tokens(&self, employee_id: Uuid, tokens: &[String]) -> AppResult<()> {
            if let Some(set) = self.sets.lock().unwrap().get_mut(&employee_id) {
                for token in tokens {
                    set.remove(token);
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeDeliveries {
        records: Mutex<Vec<NewDeliveryRecord>>,
    }

    #[async_trait]
    impl DeliveryStore for FakeDeliveries {
        async fn append(&self, record: &NewDeliveryRecord) -> AppResult<DeliveryRecord> {
            self.records.lock().unwrap().push(record.clone());
            Ok(DeliveryRecord {
                id: record.id,
                event: record.event.clone(),
                title: record.title.clone(),
                body: record.body.clone(),
                template_slug: record.template_slug.clone(),
                recipient_count: record.recipient_count as i32,
                notified_count: record.notified_count as i32,
                attempted_count: record.attempted_count as i32,
                success_count: record.success_count as i32,
                failure_count: record.failure_count as i32,
                status: record.status,
                channels: sqlx::types::Json(record.channels.clone()),
                subject_ref: record.subject_ref.clone(),
                triggered_by: record.triggered_by.clone(),
                created_at: Utc::now(),
            })
        }

        async fn page(
            &self,
            _event: Option<&str>,
            page: &PageRequest,
        ) -> AppResult<PageResponse<DeliveryRecord>> {
            Ok(PageResponse::new(Vec::new(), page, 0))
        }
    }

    #[derive(Debug)]
    struct FakeChannel {
        channel: Channel,
        fail_all: bool,
        invalid: HashSet<String>,
        sent: Mutex<Vec<String>>,
    }

    impl FakeChannel {
        fn ok(channel: Channel) -> Arc<Self> {
            Arc::new(Self {
                channel,
                fail_all: false,
                invalid: HashSet::new(),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn failing(channel: Channel) -> Arc<Self> {
            Arc::new(Self {
                channel,
                fail_all: true,
                invalid: HashSet::new(),
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChannelProvider for FakeChannel {
        fn channel(&self) -> Channel {
            self.channel
        }

        async fn send(
            &self,
            address: &str,
            _message: &OutboundMessage,
        ) -> Result<(), ChannelSendError> {
            self.sent.lock().unwrap().push(address.to_string());
            if self.invalid.contains(address) {
                return Err(ChannelSendError::InvalidToken);
            }
            if self.fail_all {
                return Err(ChannelSendError::Rejected {
                    status: 500,
                    body: "provider down".to_string(),
                });
            }
            Ok(())
        }
    }

    fn employee(n: usize, email: bool, phone: bool) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            auth_uid: format!("uid-{n}"),
            full_name: format!("Employee {n}"),
            email: email.then(|| format!("e{n}@example.com")),
            phone: phone.then(|| format!("98765{n:05}")),
            roles: vec!["employee".to_string()],
            supervisor_id: None,
            status: EmployeeStatus::Active,
            push_tokens: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct Harness {
        dispatcher: NotificationDispatcher,
        deliveries: Arc<FakeDeliveries>,
        tokens: Arc<FakeTokens>,
    }

    fn harness(employees: Vec<Employee>, channels: ChannelSet) -> Harness {
        let deliveries = Arc::new(FakeDeliveries::default());
        let tokens = Arc::new(FakeTokens::default());
        for e in &employees {
            tokens
                .sets
                .lock()
                .unwrap()
                .insert(e.id, e.push_tokens.iter().cloned().collect());
        }
        let dispatcher = NotificationDispatcher::new(
            AudienceResolver::new(Arc::new(FakeDirectory { employees })),
            TemplateResolver::new(Arc::new(FakeTemplates)),
            channels,
            PushTokenRegistry::new(tokens.clone()),
            DeliveryAuditLog::new(deliveries.clone()),
            4,
        );
        Harness {
            dispatcher,
            deliveries,
            tokens,
        }
    }

    fn holiday_content() -> MessageContent {
        MessageContent::template(
            "holiday-announcement",
            BTreeMap::from([
                ("holiday".to_string(), "Diwali".to_string()),
                ("date".to_string(), "2025-10-20".to_string()),
            ]),
        )
    }

    #[tokio::test]
    async fn test_zero_recipients_records_no_targets_once() {
        let channels = ChannelSet::default().with_provider(FakeChannel::ok(Channel::Email));
        let h = harness(vec![employee(1, true, false)], channels);

        let request = DispatchRequest::new("broadcast", holiday_content(), Audience::roles(["hr"]));
        let summary = h.dispatcher.dispatch(request).await.unwrap();

        assert_eq!(summary.status, DeliveryStatus::NoTargets);
        assert_eq!(summary.recipient_count, 0);
        assert_eq!(summary.attempted, 0);
        let records = h.deliveries.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, DeliveryStatus::NoTargets);
        assert_eq!(records[0].success_count + records[0].failure_count, 0);
    }

    #[tokio::test]
    async fn test_failed_channel_does_not_block_other_channel() {
        let channels = ChannelSet::default()
            .with_provider(FakeChannel::failing(Channel::Email))
            .with_provider(FakeChannel::ok(Channel::Messaging));
        let h = harness(vec![employee(1, true, true)], channels);

        let request = DispatchRequest::new("holiday", holiday_content(), Audience::everyone());
        let summary = h.dispatcher.dispatch(request).await.unwrap();

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.notified_count, 1);
        assert_eq!(summary.status, DeliveryStatus::Sent);

        let email = summary.channels.iter().find(|t| t.channel == Channel::Email).unwrap();
        assert_eq!((email.attempted, email.failed), (1, 1));
        let messaging = summary
            .channels
            .iter()
            .find(|t| t.channel == Channel::Messaging)
            .unwrap();
        assert_eq!((messaging.attempted, messaging.succeeded), (1, 1));
    }

    #[tokio::test]
    async fn test_holiday_fan_out_skips_unreachable_employees() {
        let email = FakeChannel::ok(Channel::Email);
        let messaging = FakeChannel::ok(Channel::Messaging);
        let channels = ChannelSet::default()
            .with_provider(email.clone())
            .with_provider(messaging.clone());
        let employees: Vec<Employee> = (0..50).map(|n| employee(n, n < 45, n < 10)).collect();
        let h = harness(employees, channels);

        let request = DispatchRequest::new("holiday", holiday_content(), Audience::everyone());
        let summary = h.dispatcher.dispatch(request).await.unwrap();

        assert_eq!(summary.recipient_count, 50);
        assert_eq!(summary.attempted, 55);
        assert_eq!(summary.succeeded, 55);
        assert_eq!(summary.notified_count, 45);
        assert_eq!(email.sent.lock().unwrap().len(), 45);
        assert_eq!(messaging.sent.lock().unwrap().len(), 10);
        assert_eq!(h.deliveries.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_every_attempt_failing_is_reported_not_raised() {
        let channels = ChannelSet::default().with_provider(FakeChannel::failing(Channel::Email));
        let h = harness(vec![employee(1, true, false), employee(2, true, false)], channels);

        let request = DispatchRequest::new("holiday", holiday_content(), Audience::everyone());
        let summary = h.dispatcher.dispatch(request).await.unwrap();

        assert_eq!(summary.status, DeliveryStatus::Failed);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.notified_count, 0);
        assert!(summary.recorded);
    }

    #[tokio::test]
    async fn test_unknown_template_raises_and_records_nothing() {
        let channels = ChannelSet::default().with_provider(FakeChannel::ok(Channel::Email));
        let h = harness(vec![employee(1, true, false)], channels);

        let content = MessageContent::template("no-such-template", BTreeMap::new());
        let request = DispatchRequest::new("broadcast", content, Audience::everyone());
        let err = h.dispatcher.dispatch(request).await.unwrap_err();

        assert!(matches!(err, DispatchError::TemplateNotFound(_)));
        assert!(h.deliveries.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_audience_is_setup_error() {
        let h = harness(Vec::new(), ChannelSet::default());
        let request = DispatchRequest::new("broadcast", holiday_content(), Audience::default());
        let err = h.dispatcher.dispatch(request).await.unwrap_err();
        assert!(matches!(err, DispatchError::MissingField("audience")));
    }

    #[tokio::test]
    async fn test_push_without_provider_is_setup_error() {
        let channels = ChannelSet::default().with_provider(FakeChannel::ok(Channel::Email));
        let h = harness(vec![employee(1, true, false)], channels);
        let request = DispatchRequest::new("broadcast", holiday_content(), Audience::everyone())
            .with_push(None, None);
        let err = h.dispatcher.dispatch(request).await.unwrap_err();
        assert!(matches!(err, DispatchError::ChannelUnavailable(Channel::Push)));
    }

    #[tokio::test]
    async fn test_invalid_push_token_is_pruned() {
        let push = Arc::new(FakeChannel {
            channel: Channel::Push,
            fail_all: false,
            invalid: HashSet::from(["stale".to_string()]),
            sent: Mutex::new(Vec::new()),
        });
        let channels = ChannelSet::default().with_provider(push.clone());
        let mut target = employee(1, false, false);
        target.push_tokens = vec!["fresh".to_string(), "stale".to_string()];
        let target_id = target.id;
        let h = harness(vec![target], channels);

        let request = DispatchRequest::new(
            "broadcast",
            MessageContent::inline("Heads up", "Server maintenance at 6pm"),
            Audience::everyone(),
        )
        .with_push(Some(1), Some("/notices".to_string()));
        let summary = h.dispatcher.dispatch(request).await.unwrap();

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.notified_count, 1);
        let tally = summary.channels.iter().find(|t| t.channel == Channel::Push).unwrap();
        assert_eq!(tally.invalid_tokens, 1);

        let sets = h.tokens.sets.lock().unwrap();
        assert_eq!(
            sets[&target_id].iter().cloned().collect::<Vec<_>>(),
            vec!["fresh".to_string()]
        );
    }

    #[tokio::test]
    async fn test_rejected_push_keeps_tokens() {
        let channels = ChannelSet::default().with_provider(FakeChannel::failing(Channel::Push));
        let mut target = employee(1, false, false);
        target.push_tokens = vec!["device-a".to_string(), "device-b".to_string()];
        let target_id = target.id;
        let h = harness(vec![target], channels);

        let request = DispatchRequest::new(
            "broadcast",
            MessageContent::inline("Heads up", "Server maintenance at 6pm"),
            Audience::everyone(),
        )
        .with_push(None, None);
        let summary = h.dispatcher.dispatch(request).await.unwrap();

        assert_eq!(summary.failed, 2);
        let tally = summary.channels.iter().find(|t| t.channel == Channel::Push).unwrap();
        assert_eq!(tally.invalid_tokens, 0);
        assert_eq!(h.tokens.sets.lock().unwrap()[&target_id].len(), 2);
    }

    #[tokio::test]
    async fn test_jobs_only_target_enabled_channels() {
        let email = FakeChannel::ok(Channel::Email);
        let push = FakeChannel::ok(Channel::Push);
        let channels = ChannelSet::default()
            .with_provider(email.clone())
            .with_provider(push.clone());
        let mut target = employee(1, true, true);
        target.push_tokens = vec!["device-a".to_string()];
        let h = harness(vec![target], channels);

        let request = DispatchRequest::new("holiday", holiday_content(), Audience::everyone());
        let summary = h.dispatcher.dispatch(request).await.unwrap();

        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(email.sent.lock().unwrap().len(), 1);
        assert!(push.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detached_dispatch_returns_summary() {
        let channels = ChannelSet::default().with_provider(FakeChannel::ok(Channel::Email));
        let h = harness(vec![employee(1, true, false)], channels);
        let dispatcher = Arc::new(h.dispatcher);

        let request = DispatchRequest::new("holiday", holiday_content(), Audience::everyone())
            .triggered_by("uid-hr");
        let summary = dispatcher.dispatch_detached(request).await.unwrap();

        assert_eq!(summary.status, DeliveryStatus::Sent);
        let records = h.deliveries.records.lock().unwrap();
        assert_eq!(records[0].triggered_by.as_deref(), Some("uid-hr"));
        assert_eq!(records[0].title, "Holiday: Diwali");
    }
}
