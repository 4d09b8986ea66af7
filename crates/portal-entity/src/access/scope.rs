//! A resolved, storage-neutral listing predicate.

use chrono::{DateTime, Utc};
use serde::Serialize;

use portal_core::types::SortField;

use super::capability::ScopeLevel;
use super::resource::ResourceType;

/// The records one actor may list for one resource.
///
/// `identities == None` means no identity filter (org-wide). An empty
/// vector never occurs: every non-org-wide scope contains at least the
/// actor's own alias.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopedQuery {
    /// Resource being listed.
    pub resource: ResourceType,
    /// Visibility level applied.
    pub level: ScopeLevel,
    /// Allowed subject aliases, at most the configured ceiling.
    pub identities: Option<Vec<String>>,
    /// Lower time bound on the resource's date column.
    pub since: Option<DateTime<Utc>>,
    /// Ordering applied to results.
    #[serde(skip)]
    pub order: SortField,
    /// Whether identities were dropped to respect the ceiling.
    pub truncated: bool,
    /// Whether the scope was narrowed because the team was unknown.
    pub narrowed: bool,
}

impl ScopedQuery {
    /// Whether a record owned by `subject` and dated `at` is visible.
    pub fn admits(&self, subject: &str, at: DateTime<Utc>) -> bool {
        let in_window = self.since.is_none_or(|since| at >= since);
        let in_scope = self
            .identities
            .as_ref()
            .is_none_or(|ids| ids.iter().any(|id| id == subject));
        in_window && in_scope
    }

    /// Number of identities in the disjunction; zero when unfiltered.
    pub fn identity_count(&self) -> usize {
        self.identities.as_ref().map_or(0, Vec::len)
    }
}
