//! Ordering of scoped listings.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order (newest first).
    #[default]
    Desc,
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A sort specification consisting of a column name and direction.
///
/// Column names come from static resource metadata, never from request
/// input, so they can be interpolated into SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortField {
    /// Column to sort by.
    pub field: &'static str,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortField {
    /// Create a descending sort on the given column.
    pub fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    /// Render as an `ORDER BY` fragment.
    pub fn to_sql(&self) -> String {
        format!("{} {}", self.field, self.direction.as_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desc_renders_sql() {
        assert_eq!(SortField::desc("created_at").to_sql(), "created_at DESC");
    }
}
