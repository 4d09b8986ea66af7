//! Holiday entities.

pub mod model;

pub use model::{CreateHoliday, Holiday};
