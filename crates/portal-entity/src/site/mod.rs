//! Geofenced site entities.

pub mod model;

pub use model::{CreateSite, GeoPoint, Site, UpdateSite};
