//! Mock catalog for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::models::{Book, BookBuilder, SearchPage, SearchQuery};
use crate::sources::{Catalog, CatalogError};

/// A mock catalog that replays scripted search responses in order and
/// records every request it receives.
///
/// When the script runs dry, searches answer with an empty page.
#[derive(Debug, Default)]
pub struct MockCatalog {
    search_responses: Mutex<VecDeque<Result<SearchPage, CatalogError>>>,
    books: Mutex<HashMap<String, Book>>,
    search_requests: Mutex<Vec<SearchQuery>>,
    detail_requests: Mutex<Vec<String>>,
}

impl MockCatalog {
    /// Create a new mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a search response.
    pub fn push_search_response(&self, response: Result<SearchPage, CatalogError>) {
        self.search_responses.lock().unwrap().push_back(response);
    }

    /// Queue a successful search page.
    pub fn push_page(&self, page: SearchPage) {
        self.push_search_response(Ok(page));
    }

    /// Register a book for detail lookups.
    pub fn insert_book(&self, book: Book) {
        self.books.lock().unwrap().insert(book.id.clone(), book);
    }

    /// Search requests received so far, in order.
    pub fn search_requests(&self) -> Vec<SearchQuery> {
        self.search_requests.lock().unwrap().clone()
    }

    /// Detail ids requested so far, in order.
    pub fn detail_requests(&self) -> Vec<String> {
        self.detail_requests.lock().unwrap().clone()
    }

    /// Total number of requests of any kind.
    pub fn request_count(&self) -> usize {
        self.search_requests.lock().unwrap().len() + self.detail_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Catalog"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, CatalogError> {
        self.search_requests.lock().unwrap().push(query.clone());
        self.search_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchPage::empty(0)))
    }

    async fn get_by_id(&self, id: &str) -> Result<Book, CatalogError> {
        self.validate_id(id)?;
        self.detail_requests.lock().unwrap().push(id.to_string());
        self.books
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}

/// Helper function to create a mock book for testing.
pub fn make_book(id: &str, title: &str) -> Book {
    BookBuilder::new(id, title)
        .info_link(format!("http://example.com/books/{}", id))
        .build()
}

/// Helper function to create a page of `count` books with ids `{prefix}-{n}`.
pub fn make_page(prefix: &str, count: usize, total_items: usize) -> SearchPage {
    let items = (0..count)
        .map(|n| make_book(&format!("{}-{}", prefix, n), &format!("{} {}", prefix, n)))
        .collect();
    SearchPage::new(items, total_items)
}
