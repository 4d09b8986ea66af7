//! Employee directory entities.

pub mod model;
pub mod status;

pub use model::{Employee, Recipient};
pub use status::EmployeeStatus;
