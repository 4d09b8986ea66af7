//! Delivery audit entities.

pub mod channel;
pub mod model;
pub mod status;

pub use channel::{Channel, ChannelTally};
pub use model::{DeliveryRecord, NewDeliveryRecord};
pub use status::DeliveryStatus;
