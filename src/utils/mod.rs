//! Utility modules supporting catalog access and terminal output.
//!
//! - [`HttpClient`]: shared reqwest client with user agent and timeouts
//! - [`html_to_text`]: render an HTML description as plain text
//! - [`truncate_with_ellipsis`] / [`truncate_at_word`]: unicode-aware truncation
//!   for table cells
//!
//! # Rendering a description
//!
//! ```rust
//! use book_search::utils::html_to_text;
//!
//! assert_eq!(html_to_text("<p>A <em>classic</em>.</p>"), "A classic.");
//! ```

mod display;
mod html;
mod http;

pub use display::{
    book_table_columns, display_width, is_terminal, terminal_width, truncate_at_word,
    truncate_with_ellipsis, DEFAULT_WIDTH,
};
pub use html::html_to_text;
pub use http::{HttpClient, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
