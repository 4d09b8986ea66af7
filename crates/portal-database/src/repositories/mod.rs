//! Repository implementations for all portal entities.

pub mod attendance;
pub mod delivery;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod scoped;
pub mod site;
pub mod template;

pub use attendance::AttendanceRepository;
pub use delivery::DeliveryRecordRepository;
pub use employee::EmployeeRepository;
pub use holiday::HolidayRepository;
pub use leave::LeaveRepository;
pub use scoped::ScopedRecordRepository;
pub use site::SiteRepository;
pub use template::TemplateRepository;
