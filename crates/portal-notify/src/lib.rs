//! # portal-notify
//!
//! Fans one business event out to email, messaging and push.
//!
//! ## Modules
//!
//! - `template`: `{{placeholder}}` rendering and slug lookup
//! - `channel`: provider clients, one per delivery channel
//! - `audience`: expansion of recipients and role labels to employees
//! - `dispatcher`: bounded concurrent fan-out and outcome aggregation
//! - `registry`: push token set maintenance
//! - `audit`: append-only delivery log
//! - `store`: persistence seams, implemented for the Postgres repositories

pub mod audience;
pub mod audit;
pub mod channel;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod store;
pub mod template;

pub use audience::{Audience, AudienceResolver};
pub use audit::DeliveryAuditLog;
pub use channel::{ChannelProvider, ChannelSet, OutboundMessage};
pub use dispatcher::{DispatchRequest, DispatchSummary, NotificationDispatcher};
pub use error::{ChannelSendError, DispatchError};
pub use registry::PushTokenRegistry;
pub use template::{MessageContent, PreparedMessage, RenderedMessage, TemplateResolver};
