//! Core data models for books and search pages.

mod book;
mod search;

pub use book::{Book, BookBuilder, ImageLinks, VolumeInfo};
pub use search::{SearchPage, SearchQuery, PAGE_SIZE};
