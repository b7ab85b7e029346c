//! Book detail view state.

use crate::models::Book;
use crate::sources::Catalog;

use super::GENERIC_ERROR_MESSAGE;

/// State of the detail view for one book
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Loading,
    Loaded(Box<Book>),
    /// The fetch failed; holds the user-facing message
    Failed(String),
    /// No book id was given, so there is nothing to show
    Missing,
}

impl DetailView {
    pub fn book(&self) -> Option<&Book> {
        match self {
            DetailView::Loaded(book) => Some(book),
            _ => None,
        }
    }
}

/// Fetch a book's full record and turn the result into a view state.
///
/// Always a fresh request: summaries already held by a search session are
/// not consulted.
pub async fn load(catalog: &dyn Catalog, id: &str) -> DetailView {
    let id = id.trim();
    if id.is_empty() {
        return DetailView::Missing;
    }

    match catalog.get_by_id(id).await {
        Ok(book) => DetailView::Loaded(Box::new(book)),
        Err(error) => {
            tracing::error!(
                id,
                status = ?error.status(),
                error = %error,
                "Failed to fetch book details"
            );
            DetailView::Failed(GENERIC_ERROR_MESSAGE.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::{make_book, MockCatalog};

    #[tokio::test]
    async fn test_load_found() {
        let catalog = MockCatalog::new();
        catalog.insert_book(make_book("b1", "Dune"));

        let view = load(&catalog, "b1").await;
        assert_eq!(view.book().map(|b| b.title()), Some("Dune"));
    }

    #[tokio::test]
    async fn test_load_failure_is_generic() {
        let catalog = MockCatalog::new();
        let view = load(&catalog, "unknown").await;
        assert_eq!(view, DetailView::Failed(GENERIC_ERROR_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_blank_id_makes_no_request() {
        let catalog = MockCatalog::new();
        assert_eq!(load(&catalog, "  ").await, DetailView::Missing);
        assert_eq!(catalog.request_count(), 0);
    }

    #[tokio::test]
    async fn test_detail_always_fetches() {
        let catalog = MockCatalog::new();
        catalog.insert_book(make_book("b1", "Dune"));

        load(&catalog, "b1").await;
        load(&catalog, "b1").await;
        assert_eq!(catalog.detail_requests().len(), 2);
    }
}
