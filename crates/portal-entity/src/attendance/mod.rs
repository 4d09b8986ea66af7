//! Attendance check-in entities.

pub mod model;
pub mod status;

pub use model::{AttendanceEvent, AttendanceSummary, NewAttendanceEvent};
pub use status::AttendanceStatus;
