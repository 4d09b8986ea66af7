//! Push-delivery device tokens.

pub mod token;

pub use token::PushToken;
