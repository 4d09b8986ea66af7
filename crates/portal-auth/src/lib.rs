//! # portal-auth
//!
//! Identity verification and role-scoped access for the portal.
//!
//! ## Modules
//!
//! - `jwt`: bearer token verification and minting
//! - `access`: role table policy, capability derivation, scoped query
//!   building and action/approval checks

pub mod access;
pub mod jwt;

pub use access::{AccessError, AccessGuard, AccessPolicy, RoleCapabilityModel, ScopedQueryBuilder};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
