//! # portal-entity
//!
//! Domain entity models for the business portal core. Every struct in this
//! crate represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod access;
pub mod attendance;
pub mod decision;
pub mod delivery;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod push;
pub mod site;
pub mod template;

pub use decision::Decision;
