//! Custom Axum extractors.

pub mod auth;
pub mod pagination;
pub mod valid;

pub use auth::AuthUser;
pub use pagination::PaginationParams;
pub use valid::ValidJson;
