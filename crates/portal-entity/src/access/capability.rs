//! Derived per-resource permissions.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::action::SystemAction;
use super::resource::ResourceType;

/// Read and approve permissions for one resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// All records, organisation-wide.
    pub view_all: bool,
    /// Records of the actor's direct subordinates.
    pub view_team: bool,
    /// The actor's own records. Always true.
    pub view_self: bool,
    /// May approve or reject pending records.
    pub approve: bool,
}

impl Capability {
    /// Broadest visibility this capability grants.
    pub fn scope_level(&self) -> ScopeLevel {
        if self.view_all {
            ScopeLevel::OrgWide
        } else if self.view_team {
            ScopeLevel::Team
        } else {
            ScopeLevel::SelfOnly
        }
    }
}

/// How far a scoped query reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    /// No identity filter.
    OrgWide,
    /// Self aliases plus subordinates.
    Team,
    /// Self aliases only.
    SelfOnly,
}

impl ScopeLevel {
    /// Return the level as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrgWide => "org_wide",
            Self::Team => "team",
            Self::SelfOnly => "self_only",
        }
    }
}

/// Capabilities for every resource plus granted system actions.
///
/// Recomputed per request from the actor's role labels; never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityMatrix {
    /// Per-resource permissions.
    pub resources: BTreeMap<ResourceType, Capability>,
    /// Granted organisation-level actions.
    pub actions: BTreeSet<SystemAction>,
}

impl CapabilityMatrix {
    /// Capability for one resource. Missing entries mean self-only read.
    pub fn for_resource(&self, resource: ResourceType) -> Capability {
        self.resources.get(&resource).copied().unwrap_or(Capability {
            view_self: true,
            ..Capability::default()
        })
    }

    /// Whether the system action is granted.
    pub fn allows(&self, action: SystemAction) -> bool {
        self.actions.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_level_prefers_broadest() {
        let cap = Capability {
            view_all: true,
            view_team: true,
            view_self: true,
            approve: true,
        };
        assert_eq!(cap.scope_level(), ScopeLevel::OrgWide);

        let cap = Capability {
            view_team: true,
            view_self: true,
            ..Capability::default()
        };
        assert_eq!(cap.scope_level(), ScopeLevel::Team);
    }

    #[test]
    fn test_missing_resource_defaults_to_self() {
        let matrix = CapabilityMatrix::default();
        let cap = matrix.for_resource(ResourceType::Visit);
        assert!(cap.view_self);
        assert!(!cap.view_team);
        assert_eq!(cap.scope_level(), ScopeLevel::SelfOnly);
    }
}
