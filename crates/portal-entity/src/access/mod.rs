//! Access-control value types: resources, system actions, actors, the
//! derived capability matrix and resolved listing scopes.

pub mod action;
pub mod actor;
pub mod capability;
pub mod resource;
pub mod scope;

pub use action::SystemAction;
pub use actor::{Actor, normalize_role};
pub use capability::{Capability, CapabilityMatrix, ScopeLevel};
pub use resource::ResourceType;
pub use scope::ScopedQuery;
