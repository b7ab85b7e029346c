//! Search session: query, accumulated results and pagination over a catalog.
//!
//! [`SearchSession`] owns a [`SessionState`] and a catalog handle. Each user
//! action is split into an *issue* step (`begin_submit` / `begin_load_more`),
//! the catalog fetch, and a *complete* step that feeds the result back into
//! the state machine. The async helpers [`SearchSession::submit_query`] and
//! [`SearchSession::load_more`] run all three in sequence; the split form lets
//! callers keep several fetches in flight and resolve them in any order.
//!
//! Failures never surface their cause to the user: the status becomes
//! [`SessionStatus::Error`] with [`GENERIC_ERROR_MESSAGE`] and the real error
//! goes to the log.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use book_search::session::SearchSession;
//! use book_search::sources::GoogleBooksCatalog;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = SearchSession::new(Arc::new(GoogleBooksCatalog::new()?));
//! session.submit_query("Harry Potter").await;
//! while session.can_load_more() && session.results().len() < 60 {
//!     session.load_more().await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod detail;
mod state;

pub use detail::DetailView;
pub use state::{
    Effect, FetchKind, FetchTicket, SearchOutcome, SessionEvent, SessionState, SessionStatus,
    StalePolicy, GENERIC_ERROR_MESSAGE,
};

use std::sync::Arc;

use crate::models::{Book, SearchPage};
use crate::sources::{Catalog, CatalogError};

/// Result of feeding a fetch result back into the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// Superseded by a newer request and dropped
    Discarded,
}

/// A search interaction against one catalog
#[derive(Debug)]
pub struct SearchSession {
    catalog: Arc<dyn Catalog>,
    state: SessionState,
    policy: StalePolicy,
}

impl SearchSession {
    /// Create an empty session
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            state: SessionState::new(),
            policy: StalePolicy::default(),
        }
    }

    /// Set how superseded responses are handled
    pub fn with_policy(mut self, policy: StalePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn policy(&self) -> StalePolicy {
        self.policy
    }

    fn dispatch(&mut self, event: SessionEvent) -> Effect {
        let (state, effect) = std::mem::take(&mut self.state).apply(event, self.policy);
        self.state = state;
        effect
    }

    /// Start a new search. Returns `None` for blank input, leaving the state as it was.
    pub fn begin_submit(&mut self, text: &str) -> Option<FetchTicket> {
        match self.dispatch(SessionEvent::Submit(text.to_string())) {
            Effect::Fetch(ticket) => Some(ticket),
            _ => None,
        }
    }

    /// Start fetching the next page. Returns `None` when there is nothing more to load.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        match self.dispatch(SessionEvent::LoadMore) {
            Effect::Fetch(ticket) => Some(ticket),
            _ => None,
        }
    }

    /// Feed the outcome of a fetch back into the session
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<SearchPage, CatalogError>,
    ) -> Completion {
        let seq = ticket.seq;
        let event = match result {
            Ok(page) => SessionEvent::PageLoaded { ticket, page },
            Err(error) => {
                tracing::error!(
                    seq,
                    status = ?error.status(),
                    error = %error,
                    "Catalog fetch failed"
                );
                SessionEvent::FetchFailed { ticket, error }
            }
        };

        match self.dispatch(event) {
            Effect::Discarded => {
                tracing::warn!(
                    seq,
                    latest = self.state.last_issued(),
                    "Discarding superseded response"
                );
                Completion::Discarded
            }
            _ => Completion::Applied,
        }
    }

    /// Perform the fetch described by a ticket
    pub async fn fetch(&self, ticket: &FetchTicket) -> Result<SearchPage, CatalogError> {
        tracing::debug!(
            seq = ticket.seq,
            query = %ticket.query,
            offset = ticket.offset,
            catalog = self.catalog.id(),
            "Issuing search fetch"
        );
        self.catalog.search(&ticket.search_query()).await
    }

    /// Submit a query and wait for its first page. Returns false for blank input.
    pub async fn submit_query(&mut self, text: &str) -> bool {
        let Some(ticket) = self.begin_submit(text) else {
            return false;
        };
        let result = self.fetch(&ticket).await;
        self.complete(ticket, result);
        true
    }

    /// Load and append the next page. Returns false when there is nothing more to load.
    pub async fn load_more(&mut self) -> bool {
        let Some(ticket) = self.begin_load_more() else {
            return false;
        };
        let result = self.fetch(&ticket).await;
        self.complete(ticket, result);
        true
    }

    pub fn can_load_more(&self) -> bool {
        self.state.can_load_more()
    }

    pub fn results(&self) -> &[Book] {
        self.state.results()
    }

    pub fn status(&self) -> &SessionStatus {
        self.state.status()
    }

    pub fn outcome(&self) -> SearchOutcome {
        self.state.outcome()
    }

    /// Look up an already-fetched book by id
    pub fn find(&self, id: &str) -> Option<&Book> {
        self.state.find(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PAGE_SIZE;
    use crate::sources::mock::{make_page, MockCatalog};

    fn session_with(mock: &Arc<MockCatalog>) -> SearchSession {
        SearchSession::new(mock.clone())
    }

    #[tokio::test]
    async fn test_blank_submit_issues_no_fetch() {
        let mock = Arc::new(MockCatalog::new());
        let mut session = session_with(&mock);

        assert!(!session.submit_query("   ").await);
        assert_eq!(mock.request_count(), 0);
        assert_eq!(session.status(), &SessionStatus::Idle);
        assert_eq!(session.state().last_issued(), 0);
    }

    #[tokio::test]
    async fn test_submit_requests_first_page() {
        let mock = Arc::new(MockCatalog::new());
        mock.push_page(make_page("hp", 20, 257));
        let mut session = session_with(&mock);

        assert!(session.submit_query(" Harry Potter ").await);

        let requests = mock.search_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query, "Harry Potter");
        assert_eq!(requests[0].start_index, 0);
        assert_eq!(requests[0].max_results, PAGE_SIZE);
        assert_eq!(session.results().len(), 20);
        assert!(session.can_load_more());
    }

    #[tokio::test]
    async fn test_load_more_requests_next_offset() {
        let mock = Arc::new(MockCatalog::new());
        mock.push_page(make_page("hp", 20, 257));
        mock.push_page(make_page("more", 20, 257));
        let mut session = session_with(&mock);

        session.submit_query("Harry Potter").await;
        assert!(session.load_more().await);

        let requests = mock.search_requests();
        assert_eq!(requests[1].start_index, 20);
        assert_eq!(requests[1].query, "Harry Potter");
        assert_eq!(session.results().len(), 40);
        assert_eq!(session.state().offset(), 20);
    }

    #[tokio::test]
    async fn test_load_more_exhausted_issues_no_fetch() {
        let mock = Arc::new(MockCatalog::new());
        mock.push_page(make_page("few", 5, 5));
        let mut session = session_with(&mock);

        session.submit_query("few").await;
        assert!(!session.load_more().await);
        assert_eq!(mock.search_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_sets_generic_error() {
        let mock = Arc::new(MockCatalog::new());
        mock.push_search_response(Err(CatalogError::Status {
            status: 500,
            url: "mock://volumes".into(),
        }));
        let mut session = session_with(&mock);

        session.submit_query("anything").await;
        assert_eq!(
            session.status(),
            &SessionStatus::Error(GENERIC_ERROR_MESSAGE.to_string())
        );
        assert!(session.results().is_empty());
        assert_eq!(session.state().last_error().and_then(|e| e.status()), Some(500));
    }

    #[tokio::test]
    async fn test_overlapping_fetches_latest_wins() {
        let mock = Arc::new(MockCatalog::new());
        mock.push_page(make_page("first", 20, 100));
        let mut session = session_with(&mock);
        session.submit_query("first").await;

        let more = session.begin_load_more().unwrap();
        let fresh = session.begin_submit("second").unwrap();

        let fresh_result = Ok(make_page("second", 4, 4));
        assert_eq!(session.complete(fresh, fresh_result), Completion::Applied);

        let stale_result = Ok(make_page("first-more", 20, 100));
        assert_eq!(session.complete(more, stale_result), Completion::Discarded);

        assert_eq!(session.results().len(), 4);
        assert_eq!(session.state().query(), Some("second"));
    }

    #[tokio::test]
    async fn test_apply_policy_keeps_last_resolved() {
        let mock = Arc::new(MockCatalog::new());
        let mut session = session_with(&mock).with_policy(StalePolicy::Apply);

        let old = session.begin_submit("old").unwrap();
        let new = session.begin_submit("new").unwrap();
        session.complete(new, Ok(make_page("new", 1, 1)));
        assert_eq!(
            session.complete(old, Ok(make_page("old", 2, 2))),
            Completion::Applied
        );
        assert_eq!(session.results()[0].id, "old-0");
    }
}
