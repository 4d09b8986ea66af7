//! Message templates: placeholder rendering and slug resolution.

pub mod render;
pub mod resolver;

pub use render::{placeholders, render};
pub use resolver::{MessageContent, PreparedMessage, RenderedMessage, TemplateResolver};
