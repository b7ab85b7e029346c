//! Search request and response models.

use serde::{Deserialize, Serialize};

use crate::models::Book;

/// Fixed number of results requested per page
pub const PAGE_SIZE: usize = 20;

/// Parameters for one page of a catalog search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search text, already trimmed
    pub query: String,

    /// Zero-based offset of the first result
    pub start_index: usize,

    /// Maximum number of results to return
    pub max_results: usize,
}

impl SearchQuery {
    /// Create a query for the first page
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            start_index: 0,
            max_results: PAGE_SIZE,
        }
    }

    /// Set the start offset
    pub fn start_index(mut self, offset: usize) -> Self {
        self.start_index = offset;
        self
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }
}

/// One page of search results
///
/// Mirrors the catalog response body: `items` is omitted entirely when there
/// are no results, and `totalItems` is a server-side estimate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// Books on this page, in catalog order
    #[serde(default)]
    pub items: Vec<Book>,

    /// Estimated number of matches across all pages
    #[serde(default)]
    pub total_items: usize,
}

impl SearchPage {
    /// Create a new page
    pub fn new(items: Vec<Book>, total_items: usize) -> Self {
        Self { items, total_items }
    }

    /// A page with no items
    pub fn empty(total_items: usize) -> Self {
        Self::new(Vec::new(), total_items)
    }
}
