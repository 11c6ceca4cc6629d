//! Read-only enumeration of catalog contents.

use bon::Builder;
use serde_json::Value;

/// Filters for [`ScopedCatalog::query`](super::ScopedCatalog::query).
///
/// Every filter is optional; an empty query matches every row.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct Query {
    /// Item name, optionally with an `@scope` that acts as a scope filter.
    #[builder(into)]
    pub name: Option<String>,

    /// Exact scope, `""` for global rows.
    #[builder(into)]
    pub scope: Option<String>,

    /// Exact item comment.
    #[builder(into)]
    pub comment: Option<String>,

    /// Exact payload value.
    pub payload: Option<Value>,

    /// Only rows whose scope is (or is not) the active one for its item.
    pub active: Option<bool>,
}

impl Query {
    /// Match every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match the rows of one item, `name` may carry an `@scope`.
    pub fn named(name: impl Into<String>) -> Self {
        Self::builder().name(name).build()
    }
}

/// One payload of one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row<'a> {
    pub name: &'a str,
    pub scope: &'a str,
    pub comment: Option<&'a str>,
    pub payload: &'a Value,
    /// Whether `scope` is what an unscoped lookup would use for this item.
    pub active: bool,
}

/// A [`Row`] rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringRow {
    pub name: String,
    pub scope: String,
    pub comment: String,
    pub payload: String,
}

impl StringRow {
    /// Cells in table column order.
    pub fn into_cells(self) -> Vec<String> {
        vec![self.name, self.scope, self.comment, self.payload]
    }
}
