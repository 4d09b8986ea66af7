//! Role-scoped access control.
//!
//! - [`AccessPolicy`] is the validated role table.
//! - [`RoleCapabilityModel`] derives a [`CapabilityMatrix`] per request.
//! - [`ScopedQueryBuilder`] turns a matrix into a listing predicate.
//! - [`AccessGuard`] checks system actions and approvals.
//!
//! [`CapabilityMatrix`]: portal_entity::access::CapabilityMatrix

pub mod capability;
pub mod error;
pub mod guard;
pub mod policy;
pub mod scope;

pub use capability::RoleCapabilityModel;
pub use error::AccessError;
pub use guard::AccessGuard;
pub use policy::{AccessPolicy, RoleGrant};
pub use scope::ScopedQueryBuilder;
