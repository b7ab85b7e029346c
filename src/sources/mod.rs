//! Book catalog backends behind a trait-based boundary.
//!
//! This module defines the [`Catalog`] trait that every catalog backend
//! implements. The session and the terminal views only ever talk to a
//! `dyn Catalog`, so the remote HTTP API can be swapped for the in-memory
//! [`MockCatalog`] in tests.
//!
//! - [`GoogleBooksCatalog`]: the public Google Books `volumes` API
//! - [`MockCatalog`]: scripted responses with request recording
//!
//! # Endpoint contract
//!
//! ```text
//! GET <search-base>?q=<url-encoded query>&startIndex=<offset>&maxResults=20
//! GET <detail-base>/<url-encoded id>
//! ```
//!
//! Any non-2xx status is a failure, whatever the code.

mod google_books;
pub mod mock;

pub use google_books::{GoogleBooksCatalog, DEFAULT_API_BASE};
pub use mock::MockCatalog;

use crate::models::{Book, SearchPage, SearchQuery};
use async_trait::async_trait;

/// The Catalog trait defines the interface for book catalog backends.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this catalog (e.g., "google_books")
    fn id(&self) -> &str;

    /// Human-readable name of this catalog
    fn name(&self) -> &str;

    /// Fetch one page of search results
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, CatalogError>;

    /// Fetch the full record of one book
    async fn get_by_id(&self, id: &str) -> Result<Book, CatalogError>;

    /// Validate that a book ID is usable before any request is made
    fn validate_id(&self, id: &str) -> Result<(), CatalogError> {
        if id.trim().is_empty() {
            return Err(CatalogError::InvalidRequest(
                "book id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors that can occur when talking to a catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Connectivity failure before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// The catalog answered with a non-success status
    #[error("Catalog returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Book not found
    #[error("Book not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    /// HTTP status carried by this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Status { status, .. } => Some(*status),
            CatalogError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Parse(err.to_string())
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(format!("JSON: {}", err))
    }
}
