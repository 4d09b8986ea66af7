//! Route handlers organized by domain.

pub mod access;
pub mod attendance;
pub mod deliveries;
pub mod health;
pub mod holidays;
pub mod leave;
pub mod notify;
pub mod push_tokens;
pub mod records;
pub mod sites;
pub mod templates;
