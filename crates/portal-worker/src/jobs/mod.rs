//! Scheduled job bodies.

pub mod monthly_report;

pub use monthly_report::MonthlyReportJob;
