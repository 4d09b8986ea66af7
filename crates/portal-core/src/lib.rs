//! # portal-core
//!
//! Core crate for the business portal access and notification core.
//! Contains configuration schemas, the unified error system, and the
//! pagination/sorting types shared by repositories and handlers.
//!
//! This crate has **no** internal dependencies on other portal crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
