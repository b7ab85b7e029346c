//! Pure search-session state and its transitions.
//!
//! Every change to a session goes through [`SessionState::apply`], which maps
//! `(state, event)` to `(state, effect)` without touching the network. The
//! async driver in the parent module performs the fetches the effects ask for.

use serde::{Deserialize, Serialize};

use crate::models::{Book, SearchPage, SearchQuery, PAGE_SIZE};
use crate::sources::CatalogError;

/// The only failure text users ever see
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Loading/error status of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Error(String),
    Ready,
}

/// What to do with a response whose request was superseded by a newer one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalePolicy {
    /// Drop it; only the latest issued request may change the state
    #[default]
    Discard,
    /// Apply it whenever it arrives, last response wins
    Apply,
}

/// Which page a fetch is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First page of a new query; replaces the results
    FirstPage,
    /// A further page; appends to the results
    NextPage,
}

/// A fetch the session has issued and is waiting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Issue sequence number, strictly increasing per session
    pub seq: u64,
    pub kind: FetchKind,
    pub query: String,
    /// Offset of the requested page, always a multiple of [`PAGE_SIZE`]
    pub offset: usize,
}

impl FetchTicket {
    /// Catalog query for this ticket
    pub fn search_query(&self) -> SearchQuery {
        SearchQuery::new(self.query.clone())
            .start_index(self.offset)
            .max_results(PAGE_SIZE)
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The user submitted search text
    Submit(String),
    /// The user asked for the next page
    LoadMore,
    /// A fetch succeeded
    PageLoaded { ticket: FetchTicket, page: SearchPage },
    /// A fetch failed
    FetchFailed { ticket: FetchTicket, error: CatalogError },
}

/// What the caller has to do after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing happened
    None,
    /// Perform this fetch and feed the result back
    Fetch(FetchTicket),
    /// A response was applied to the state
    Applied,
    /// A stale response was dropped; state unchanged
    Discarded,
}

/// Summary of what the session currently has to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// No query was ever submitted
    Untouched,
    Loading,
    Failed(String),
    /// A query completed with zero results
    NoResults,
    Results { shown: usize, total: usize },
}

/// Query, results, pagination and status of one search interaction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    query: Option<String>,
    results: Vec<Book>,
    offset: usize,
    total_available: usize,
    status: SessionStatus,
    last_issued: u64,
    last_error: Option<CatalogError>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event, returning the next state and the effect to perform.
    pub fn apply(mut self, event: SessionEvent, policy: StalePolicy) -> (Self, Effect) {
        match event {
            SessionEvent::Submit(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return (self, Effect::None);
                }

                self.query = Some(text.to_string());
                self.results.clear();
                self.offset = 0;
                self.total_available = 0;
                self.status = SessionStatus::Loading;
                self.last_error = None;
                let ticket = self.issue(FetchKind::FirstPage, text.to_string(), 0);
                (self, Effect::Fetch(ticket))
            }

            SessionEvent::LoadMore => {
                let query = match (&self.query, self.can_load_more()) {
                    (Some(query), true) => query.clone(),
                    _ => return (self, Effect::None),
                };

                self.status = SessionStatus::Loading;
                let offset = self.offset + PAGE_SIZE;
                let ticket = self.issue(FetchKind::NextPage, query, offset);
                (self, Effect::Fetch(ticket))
            }

            SessionEvent::PageLoaded { ticket, page } => {
                if self.is_stale(&ticket, policy) {
                    return (self, Effect::Discarded);
                }

                match ticket.kind {
                    FetchKind::FirstPage => self.results = page.items,
                    FetchKind::NextPage => self.results.extend(page.items),
                }
                self.offset = ticket.offset;
                self.total_available = page.total_items;
                self.status = SessionStatus::Ready;
                self.last_error = None;
                (self, Effect::Applied)
            }

            SessionEvent::FetchFailed { ticket, error } => {
                if self.is_stale(&ticket, policy) {
                    return (self, Effect::Discarded);
                }

                self.status = SessionStatus::Error(GENERIC_ERROR_MESSAGE.to_string());
                self.last_error = Some(error);
                (self, Effect::Applied)
            }
        }
    }

    fn issue(&mut self, kind: FetchKind, query: String, offset: usize) -> FetchTicket {
        self.last_issued += 1;
        FetchTicket {
            seq: self.last_issued,
            kind,
            query,
            offset,
        }
    }

    fn is_stale(&self, ticket: &FetchTicket, policy: StalePolicy) -> bool {
        policy == StalePolicy::Discard && ticket.seq != self.last_issued
    }

    /// Current query, if one was ever submitted
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Accumulated results in arrival order
    pub fn results(&self) -> &[Book] {
        &self.results
    }

    /// Offset of the last page applied
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Server-reported estimate of all matches
    pub fn total_available(&self) -> usize {
        self.total_available
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    /// Sequence number of the most recently issued fetch (0 before any)
    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    /// Underlying cause of the current error status, for diagnostics
    pub fn last_error(&self) -> Option<&CatalogError> {
        self.last_error.as_ref()
    }

    /// True iff there are results and the server reports more beyond them.
    pub fn can_load_more(&self) -> bool {
        !self.results.is_empty() && self.results.len() < self.total_available
    }

    /// Look up an already-fetched book by id
    pub fn find(&self, id: &str) -> Option<&Book> {
        self.results.iter().find(|book| book.id == id)
    }

    pub fn outcome(&self) -> SearchOutcome {
        match &self.status {
            SessionStatus::Idle => SearchOutcome::Untouched,
            SessionStatus::Loading => SearchOutcome::Loading,
            SessionStatus::Error(message) => SearchOutcome::Failed(message.clone()),
            SessionStatus::Ready if self.results.is_empty() => SearchOutcome::NoResults,
            SessionStatus::Ready => SearchOutcome::Results {
                shown: self.results.len(),
                total: self.total_available,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::make_page;

    fn step(state: SessionState, event: SessionEvent) -> (SessionState, Effect) {
        state.apply(event, StalePolicy::Discard)
    }

    fn ticket_of(effect: Effect) -> FetchTicket {
        match effect {
            Effect::Fetch(ticket) => ticket,
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    fn loaded(query: &str, page: SearchPage) -> SessionState {
        let (state, effect) = step(SessionState::new(), SessionEvent::Submit(query.into()));
        let ticket = ticket_of(effect);
        let (state, effect) = step(state, SessionEvent::PageLoaded { ticket, page });
        assert_eq!(effect, Effect::Applied);
        state
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let before = loaded("dune", make_page("d", 20, 40));
        for text in ["", "   ", "\t\n"] {
            let (after, effect) = step(before.clone(), SessionEvent::Submit(text.into()));
            assert_eq!(effect, Effect::None);
            assert_eq!(after, before);
        }
    }

    #[test]
    fn test_submit_resets_before_fetch() {
        let before = loaded("dune", make_page("d", 20, 40));
        let (state, effect) = step(before, SessionEvent::Submit("  foundation ".into()));

        let ticket = ticket_of(effect);
        assert_eq!(ticket.kind, FetchKind::FirstPage);
        assert_eq!(ticket.offset, 0);
        assert_eq!(ticket.query, "foundation");
        assert_eq!(state.query(), Some("foundation"));
        assert!(state.results().is_empty());
        assert_eq!(state.offset(), 0);
        assert!(state.is_loading());
        assert!(!state.can_load_more());
    }

    #[test]
    fn test_first_page_sets_total() {
        let state = loaded("Harry Potter", make_page("hp", 20, 257));
        assert_eq!(state.results().len(), 20);
        assert_eq!(state.total_available(), 257);
        assert_eq!(state.status(), &SessionStatus::Ready);
        assert!(state.can_load_more());
        assert_eq!(
            state.outcome(),
            SearchOutcome::Results {
                shown: 20,
                total: 257
            }
        );
    }

    #[test]
    fn test_load_more_appends_and_advances() {
        let state = loaded("Harry Potter", make_page("hp", 20, 257));
        let (state, effect) = step(state, SessionEvent::LoadMore);
        let ticket = ticket_of(effect);
        assert_eq!(ticket.kind, FetchKind::NextPage);
        assert_eq!(ticket.offset, 20);
        assert_eq!(state.offset(), 0);

        let (state, _) = step(
            state,
            SessionEvent::PageLoaded {
                ticket,
                page: make_page("more", 20, 257),
            },
        );
        assert_eq!(state.results().len(), 40);
        assert_eq!(state.results()[0].id, "hp-0");
        assert_eq!(state.results()[19].id, "hp-19");
        assert_eq!(state.results()[20].id, "more-0");
        assert_eq!(state.offset(), 20);
    }

    #[test]
    fn test_load_more_noop_when_exhausted() {
        let state = loaded("short", make_page("s", 7, 7));
        let (after, effect) = step(state.clone(), SessionEvent::LoadMore);
        assert_eq!(effect, Effect::None);
        assert_eq!(after, state);
    }

    #[test]
    fn test_load_more_noop_before_any_query() {
        let (state, effect) = step(SessionState::new(), SessionEvent::LoadMore);
        assert_eq!(effect, Effect::None);
        assert_eq!(state.outcome(), SearchOutcome::Untouched);
    }

    #[test]
    fn test_failed_load_more_keeps_results() {
        let state = loaded("Harry Potter", make_page("hp", 20, 257));
        let before = state.results().to_vec();

        let (state, effect) = step(state, SessionEvent::LoadMore);
        let ticket = ticket_of(effect);
        let (state, _) = step(
            state,
            SessionEvent::FetchFailed {
                ticket,
                error: CatalogError::Network("reset".into()),
            },
        );

        assert_eq!(state.results(), before.as_slice());
        assert_eq!(state.offset(), 0);
        assert_eq!(
            state.status(),
            &SessionStatus::Error(GENERIC_ERROR_MESSAGE.to_string())
        );
        assert_eq!(
            state.last_error(),
            Some(&CatalogError::Network("reset".into()))
        );
        // Retrying asks for the same page again.
        let (_, effect) = step(state, SessionEvent::LoadMore);
        assert_eq!(ticket_of(effect).offset, 20);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let state = loaded("zzzzznoresults", SearchPage::empty(0));
        assert_eq!(state.status(), &SessionStatus::Ready);
        assert_eq!(state.outcome(), SearchOutcome::NoResults);
        assert_ne!(state.outcome(), SessionState::new().outcome());
        assert!(!state.can_load_more());
    }

    #[test]
    fn test_stale_response_discarded() {
        let state = loaded("old", make_page("old", 20, 100));
        let (state, effect) = step(state, SessionEvent::LoadMore);
        let stale = ticket_of(effect);
        let (state, effect) = step(state, SessionEvent::Submit("new".into()));
        let fresh = ticket_of(effect);
        assert!(fresh.seq > stale.seq);

        let (state, effect) = step(
            state,
            SessionEvent::PageLoaded {
                ticket: fresh,
                page: make_page("new", 3, 3),
            },
        );
        assert_eq!(effect, Effect::Applied);

        let (state, effect) = step(
            state,
            SessionEvent::PageLoaded {
                ticket: stale,
                page: make_page("old-more", 20, 100),
            },
        );
        assert_eq!(effect, Effect::Discarded);
        assert_eq!(state.results().len(), 3);
        assert!(state.results().iter().all(|b| b.id.starts_with("new-")));
        assert_eq!(state.total_available(), 3);
    }

    #[test]
    fn test_stale_failure_discarded() {
        let (state, effect) = step(SessionState::new(), SessionEvent::Submit("a".into()));
        let first = ticket_of(effect);
        let (state, _) = step(state, SessionEvent::Submit("b".into()));

        let (state, effect) = step(
            state,
            SessionEvent::FetchFailed {
                ticket: first,
                error: CatalogError::Network("timeout".into()),
            },
        );
        assert_eq!(effect, Effect::Discarded);
        assert!(state.is_loading());
        assert!(state.last_error().is_none());
    }

    #[test]
    fn test_apply_policy_lets_stale_response_win() {
        let policy = StalePolicy::Apply;
        let (state, effect) = SessionState::new().apply(SessionEvent::Submit("old".into()), policy);
        let stale = ticket_of(effect);
        let (state, effect) = state.apply(SessionEvent::Submit("new".into()), policy);
        let fresh = ticket_of(effect);

        let (state, _) = state.apply(
            SessionEvent::PageLoaded {
                ticket: fresh,
                page: make_page("new", 2, 2),
            },
            policy,
        );
        let (state, effect) = state.apply(
            SessionEvent::PageLoaded {
                ticket: stale,
                page: make_page("old", 5, 5),
            },
            policy,
        );

        assert_eq!(effect, Effect::Applied);
        assert_eq!(state.results()[0].id, "old-0");
        assert_eq!(state.query(), Some("new"));
    }

    #[test]
    fn test_offset_stays_page_aligned() {
        let mut state = loaded("q", make_page("p0", 20, 95));
        for n in 1..5 {
            let (next, effect) = step(state, SessionEvent::LoadMore);
            let ticket = ticket_of(effect);
            assert_eq!(ticket.offset % PAGE_SIZE, 0);
            let count = if n == 4 { 15 } else { 20 };
            let (next, _) = step(
                next,
                SessionEvent::PageLoaded {
                    ticket,
                    page: make_page(&format!("p{}", n), count, 95),
                },
            );
            state = next;
        }
        assert_eq!(state.offset(), 80);
        assert_eq!(state.results().len(), 95);
        assert!(!state.can_load_more());
    }

    #[test]
    fn test_find_by_id() {
        let state = loaded("q", make_page("p", 3, 3));
        assert_eq!(state.find("p-1").map(|b| b.title()), Some("p 1"));
        assert!(state.find("missing").is_none());
    }
}
