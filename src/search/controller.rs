//! The search state machine.
//!
//! One `SearchController` owns the session's `SearchState`. Submitting a
//! term runs the request on a worker thread and posts the outcome back over
//! a channel; the UI thread drains it via [`SearchController::poll`] each
//! tick. Every submission is stamped with a monotonically increasing token
//! and a completion is applied only while its token is still the latest, so
//! overlapping searches resolve last-write-wins.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, info, warn};

use crate::openlibrary::client::{OpenLibraryClient, SearchError};
use crate::openlibrary::model::{Book, SearchResults};
use crate::openlibrary::request::{SearchField, SearchRequest};

use super::notify::Notification;

/// Where the controller sends its requests. The production impl is the
/// blocking HTTP client; tests plug in a canned backend.
pub trait SearchBackend: Send + Sync + 'static {
    fn search(&self, request: &SearchRequest) -> Result<SearchResults, SearchError>;
}

impl SearchBackend for OpenLibraryClient {
    fn search(&self, request: &SearchRequest) -> Result<SearchResults, SearchError> {
        OpenLibraryClient::search(self, request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Session-local state; created in `Idle`, never persisted.
#[derive(Debug, Default)]
struct SearchState {
    phase: SearchPhase,
    results: Vec<Book>,
    total_found: u64,
    last_query: String,
    last_field: SearchField,
}

struct Completion {
    token: u64,
    outcome: Result<SearchResults, SearchError>,
}

pub struct SearchController {
    backend: Arc<dyn SearchBackend>,
    state: SearchState,
    token: u64,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl SearchController {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            state: SearchState::default(),
            token: 0,
            tx,
            rx,
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.state.phase
    }

    /// Results of the last applied search, in API order.
    pub fn results(&self) -> &[Book] {
        &self.state.results
    }

    /// The API's total hit count for the last applied search.
    pub fn total_found(&self) -> u64 {
        self.state.total_found
    }

    pub fn last_query(&self) -> &str {
        &self.state.last_query
    }

    pub fn last_field(&self) -> SearchField {
        self.state.last_field
    }

    /// Start a search. Empty or whitespace-only input is a no-op: no phase
    /// change, no request. Returns whether a request was issued.
    pub fn submit(&mut self, term: &str, field: SearchField) -> bool {
        let Ok(request) = SearchRequest::new(term, field) else {
            return false;
        };

        self.token += 1;
        let token = self.token;
        self.state.phase = SearchPhase::Loading;
        self.state.last_query = request.term().to_string();
        self.state.last_field = field;
        info!(target: "search", query = %request.term(), field = field.param_name(), "search started");

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = backend.search(&request);
            let _ = tx.send(Completion { token, outcome });
        });
        true
    }

    /// Drain finished requests and return the notifications they produced.
    /// Call once per UI tick.
    pub fn poll(&mut self) -> Vec<Notification> {
        let mut notifications = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            if let Some(n) = self.apply(completion) {
                notifications.push(n);
            }
        }
        notifications
    }

    fn apply(&mut self, completion: Completion) -> Option<Notification> {
        if completion.token != self.token {
            // A newer search superseded this one while it was in flight.
            debug!(target: "search", token = completion.token, latest = self.token, "stale completion dropped");
            return None;
        }

        match completion.outcome {
            Ok(results) => {
                self.state.phase = SearchPhase::Succeeded;
                self.state.total_found = results.total;
                self.state.results = results.books;
                info!(
                    target: "search",
                    query = %self.state.last_query,
                    shown = self.state.results.len(),
                    total = self.state.total_found,
                    "search finished"
                );
                if self.state.results.is_empty() {
                    Some(Notification::no_results(&self.state.last_query))
                } else {
                    Some(Notification::found(
                        self.state.total_found,
                        &self.state.last_query,
                    ))
                }
            }
            Err(err) => {
                self.state.phase = SearchPhase::Failed;
                self.state.results.clear();
                self.state.total_found = 0;
                warn!(target: "search", query = %self.state.last_query, "search failed: {err}");
                Some(Notification::search_failed())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::notify::NotificationKind;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    struct CannedBackend {
        responses: Mutex<VecDeque<Result<SearchResults, SearchError>>>,
        calls: AtomicUsize,
    }

    impl CannedBackend {
        fn new(responses: Vec<Result<SearchResults, SearchError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl SearchBackend for CannedBackend {
        fn search(&self, _request: &SearchRequest) -> Result<SearchResults, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(SearchError::Http(500)))
        }
    }

    fn dune_results() -> SearchResults {
        let payload = serde_json::json!({
            "numFound": 1,
            "docs": [{"key": "/works/OL1W", "title": "Dune"}],
        });
        crate::openlibrary::model::map_response(serde_json::from_value(payload).unwrap())
    }

    fn wait_for_notifications(controller: &mut SearchController) -> Vec<Notification> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let notifications = controller.poll();
            if !notifications.is_empty() {
                return notifications;
            }
            assert!(Instant::now() < deadline, "no completion within deadline");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn successful_search_reaches_succeeded_with_found_notification() {
        let backend = CannedBackend::new(vec![Ok(dune_results())]);
        let mut controller = SearchController::new(backend);
        assert_eq!(controller.phase(), SearchPhase::Idle);

        assert!(controller.submit("Dune", SearchField::Title));
        assert_eq!(controller.phase(), SearchPhase::Loading);
        assert_eq!(controller.last_query(), "Dune");

        let notifications = wait_for_notifications(&mut controller);
        assert_eq!(controller.phase(), SearchPhase::Succeeded);
        assert_eq!(controller.results().len(), 1);
        assert_eq!(controller.results()[0].key, "/works/OL1W");
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::Found);
        assert_eq!(notifications[0].description, "Found 1 books for \"Dune\"");
    }

    #[test]
    fn empty_docs_reaches_succeeded_with_no_results_notification() {
        let backend = CannedBackend::new(vec![Ok(SearchResults {
            books: Vec::new(),
            total: 0,
        })]);
        let mut controller = SearchController::new(backend);
        controller.submit("zxqvw", SearchField::Author);

        let notifications = wait_for_notifications(&mut controller);
        assert_eq!(controller.phase(), SearchPhase::Succeeded);
        assert!(controller.results().is_empty());
        assert_eq!(notifications[0].kind, NotificationKind::NoResults);
        assert!(notifications[0].description.contains("\"zxqvw\""));
    }

    #[test]
    fn failure_clears_results_and_notifies() {
        let backend = CannedBackend::new(vec![Ok(dune_results()), Err(SearchError::Http(503))]);
        let mut controller = SearchController::new(backend);

        controller.submit("Dune", SearchField::Title);
        wait_for_notifications(&mut controller);
        assert!(!controller.results().is_empty());

        controller.submit("Dune", SearchField::Title);
        let notifications = wait_for_notifications(&mut controller);
        assert_eq!(controller.phase(), SearchPhase::Failed);
        assert!(controller.results().is_empty());
        assert_eq!(notifications[0].kind, NotificationKind::Error);

        // the machine has no terminal state: a failed session can search again
        controller.submit("Dune", SearchField::Title);
        assert_eq!(controller.phase(), SearchPhase::Loading);
    }

    #[test]
    fn blank_input_never_transitions_or_calls_backend() {
        let backend = CannedBackend::new(vec![Ok(dune_results())]);
        let calls = Arc::clone(&backend);
        let mut controller = SearchController::new(backend);

        assert!(!controller.submit("", SearchField::Title));
        assert!(!controller.submit("   \t", SearchField::Author));
        assert_eq!(controller.phase(), SearchPhase::Idle);
        assert_eq!(controller.last_query(), "");
        assert_eq!(calls.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn stale_completion_is_discarded() {
        let backend = CannedBackend::new(Vec::new());
        let mut controller = SearchController::new(backend);
        controller.token = 2;
        controller.state.phase = SearchPhase::Loading;
        controller.state.last_query = "Dune Messiah".to_string();

        // completion from the superseded first request
        let dropped = controller.apply(Completion {
            token: 1,
            outcome: Ok(dune_results()),
        });
        assert_eq!(dropped, None);
        assert_eq!(controller.phase(), SearchPhase::Loading);
        assert!(controller.results().is_empty());

        // the latest request's completion still lands
        let applied = controller.apply(Completion {
            token: 2,
            outcome: Ok(dune_results()),
        });
        assert!(applied.is_some());
        assert_eq!(controller.phase(), SearchPhase::Succeeded);
        assert_eq!(controller.results().len(), 1);
    }
}
