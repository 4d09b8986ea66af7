//! Core type definitions used across the portal workspace.

pub mod pagination;
pub mod sorting;

pub use pagination::{PageRequest, PageResponse};
pub use sorting::{SortDirection, SortField};
