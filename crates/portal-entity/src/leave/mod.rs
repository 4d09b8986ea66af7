//! Leave application entities.

pub mod model;
pub mod status;

pub use model::LeaveApplication;
pub use status::LeaveStatus;
