//! # Book Search
//!
//! Search a public book catalog, page through the results and open book
//! detail records.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Book, SearchQuery, SearchPage)
//! - [`sources`]: Catalog backends behind the [`Catalog`] trait
//! - [`session`]: The pagination and result-accumulation state machine
//! - [`ui`]: Terminal list and detail views
//! - [`utils`]: HTTP client, HTML-to-text and display helpers
//! - [`config`]: Configuration management

pub mod config;
pub mod models;
pub mod session;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::Book;
pub use session::SearchSession;
pub use sources::{Catalog, CatalogError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
