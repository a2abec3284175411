//! Search sessions: the page-by-page search loop and its state machine.
//!
//! A [`SearchSession`] is built fresh for every search and consumed by
//! [`SearchSession::run`]. The session fetches page 1, derives the page count
//! from its hints, then walks the remaining pages one at a time, classifying
//! every candidate and streaming matches to a [`ResultSink`] as they are
//! found. Cancellation is cooperative and only observed between pages.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::matching::{Classification, Query, classify};
use crate::source::{Page, PageSource, SourceRef};

/// Page size assumed when page 1 reports a total but not a page size.
pub const DEFAULT_RESULTS_PER_PAGE: u64 = 24;

/// Lifecycle of a search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Idle,
    Running,
    Stopped,
    Completed,
    Failed,
}

impl SearchStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Searching...",
            Self::Stopped => "Stopped",
            Self::Completed => "Done",
            Self::Failed => "Failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Completed | Self::Failed)
    }
}

/// Where a session is in its walk over the result pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
    pub status: SearchStatus,
    pub failure_reason: Option<String>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            status: SearchStatus::Idle,
            failure_reason: None,
        }
    }
}

impl PaginationState {
    /// Move to `next` unless that would leave a terminal state or go back to
    /// `Idle`. Returns whether the transition happened.
    fn transition(&mut self, next: SearchStatus) -> bool {
        let allowed = match (self.status, next) {
            (from, _) if from.is_terminal() => false,
            (_, SearchStatus::Idle) => false,
            (SearchStatus::Idle, SearchStatus::Running) => true,
            (SearchStatus::Running, to) => to.is_terminal(),
            _ => false,
        };
        if allowed {
            self.status = next;
        }
        allowed
    }

    fn fail(&mut self, reason: String) {
        if self.transition(SearchStatus::Failed) {
            self.failure_reason = Some(reason);
        }
    }
}

/// A classified search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub display_name: String,
    pub page_index: u32,
    pub source_ref: SourceRef,
}

/// Everything a finished session produced.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub exact_matches: Vec<Candidate>,
    pub fuzzy_matches: Vec<Candidate>,
    pub state: PaginationState,
}

impl SearchOutcome {
    /// The "No results" line a front end should show, if any.
    ///
    /// Only exact matches count as results; a failure reason is appended when
    /// the session failed.
    pub fn no_results_message(&self) -> Option<String> {
        if !self.exact_matches.is_empty() {
            return None;
        }
        match (&self.state.status, &self.state.failure_reason) {
            (SearchStatus::Failed, Some(reason)) => Some(format!("No results — {reason}")),
            _ => Some("No results".to_string()),
        }
    }
}

/// Shared cancellation flag for a running search.
///
/// Both [`stop`](CancelSignal::stop) and [`clear`](CancelSignal::clear) halt
/// the search at the next page boundary; `clear` also asks the result sink to
/// purge what it has shown.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    token: CancellationToken,
    purge: Arc<AtomicBool>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn clear(&self) {
        self.purge.store(true, Ordering::SeqCst);
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn purge_requested(&self) -> bool {
        self.purge.load(Ordering::SeqCst)
    }

    /// Underlying token, for callers that want to `select!` on it.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// User-level commands a front end dispatches into the search backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartSearch(String),
    Cancel { purge: bool },
}

/// Receives matches as soon as they are classified.
pub trait ResultSink {
    fn on_match(&mut self, classification: Classification, candidate: &Candidate);

    /// Drop everything shown so far. Called when a search is cleared.
    fn purge(&mut self) {}

    fn finished(&mut self, _state: &PaginationState) {}
}

/// Receives page progress.
pub trait ProgressReporter {
    fn on_page(&mut self, current_page: u32, total_pages: u32);

    fn finished(&mut self, _state: &PaginationState) {}
}

impl ResultSink for () {
    fn on_match(&mut self, _classification: Classification, _candidate: &Candidate) {}
}

impl ProgressReporter for () {
    fn on_page(&mut self, _current_page: u32, _total_pages: u32) {}
}

/// Number of result pages implied by the first page's hints. Never below 1.
pub fn total_pages(
    total_results: Option<u64>,
    results_per_page: Option<u64>,
    default_per_page: u64,
) -> u32 {
    let Some(total) = total_results else {
        return 1;
    };
    let per_page = results_per_page
        .filter(|&n| n > 0)
        .unwrap_or(default_per_page)
        .max(1);
    let pages = total.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One search, from the first page fetch to a terminal status.
pub struct SearchSession {
    query: Query,
    cancel: CancelSignal,
    default_per_page: u64,
    state: PaginationState,
    exact_matches: Vec<Candidate>,
    fuzzy_matches: Vec<Candidate>,
}

impl SearchSession {
    pub fn new(query: Query, cancel: CancelSignal) -> Self {
        Self {
            query,
            cancel,
            default_per_page: DEFAULT_RESULTS_PER_PAGE,
            state: PaginationState::default(),
            exact_matches: Vec::new(),
            fuzzy_matches: Vec::new(),
        }
    }

    /// Override the page size used when page 1 has no page-size hint.
    pub fn with_default_per_page(mut self, per_page: u64) -> Self {
        self.default_per_page = per_page;
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Run the search to a terminal status.
    ///
    /// Exactly one page fetch is in flight at a time. Fetch failures are
    /// never retried: they end the session as `Failed` and pages past the
    /// failing one are not requested.
    pub async fn run<S, R, P>(mut self, source: &S, sink: &mut R, progress: &mut P) -> SearchOutcome
    where
        S: PageSource + Sync,
        R: ResultSink + Send,
        P: ProgressReporter + Send,
    {
        self.state.transition(SearchStatus::Running);
        self.state.current_page = 1;
        log::info!("Searching for \"{}\"", self.query.raw_text());

        let mut pending = self.fetch(source, 1).await;
        if let Some(first) = &pending {
            self.state.total_pages = total_pages(
                first.total_results_hint,
                first.results_per_page_hint,
                self.default_per_page,
            );
            log::info!("Results pages: {}", self.state.total_pages);
        }

        while self.state.status == SearchStatus::Running
            && self.state.current_page <= self.state.total_pages
        {
            if self.cancel.is_cancelled() {
                log::info!("Search stopped before page {}", self.state.current_page);
                self.state.transition(SearchStatus::Stopped);
                if self.cancel.purge_requested() {
                    sink.purge();
                }
                break;
            }

            let page = match pending.take() {
                Some(page) => page,
                None => match self.fetch(source, self.state.current_page).await {
                    Some(page) => page,
                    None => break,
                },
            };

            progress.on_page(self.state.current_page, self.state.total_pages);
            self.process_page(page, sink);
            self.state.current_page += 1;
        }

        if self.state.current_page > self.state.total_pages {
            self.state.transition(SearchStatus::Completed);
        }

        log::info!(
            "Search for \"{}\" ended: {:?} ({} exact, {} fuzzy)",
            self.query.raw_text(),
            self.state.status,
            self.exact_matches.len(),
            self.fuzzy_matches.len()
        );

        sink.finished(&self.state);
        progress.finished(&self.state);

        SearchOutcome {
            exact_matches: self.exact_matches,
            fuzzy_matches: self.fuzzy_matches,
            state: self.state,
        }
    }

    /// Fetch a page, turning transport errors and non-success statuses into
    /// a `Failed` state.
    async fn fetch<S: PageSource + Sync>(&mut self, source: &S, page_number: u32) -> Option<Page> {
        log::debug!("Fetching result page {page_number}");
        match source.fetch_page(&self.query, page_number).await {
            Ok(page) if page.is_success() => Some(page),
            Ok(page) => {
                log::warn!("{} response on page {}", page.status, page_number);
                self.state
                    .fail(format!("{} response on page {}", page.status, page_number));
                None
            }
            Err(e) => {
                log::warn!("Fetching page {page_number} failed: {e}");
                self.state.fail(format!("{e} on page {page_number}"));
                None
            }
        }
    }

    fn process_page<R: ResultSink>(&mut self, page: Page, sink: &mut R) {
        log::debug!(
            "Page {}: {} candidates",
            self.state.current_page,
            page.candidates.len()
        );
        for raw in page.candidates {
            let Some(display_name) = raw.display_name else {
                log::debug!("Skipping candidate without a name ({})", raw.source_ref);
                continue;
            };
            let classification = classify(&display_name, &self.query);
            let candidate = Candidate {
                display_name,
                page_index: self.state.current_page,
                source_ref: raw.source_ref,
            };
            let bucket = match classification {
                Classification::Exact => &mut self.exact_matches,
                Classification::Fuzzy => &mut self.fuzzy_matches,
                Classification::None => continue,
            };
            log::info!("{:?} match: {}", classification, candidate.display_name);
            sink.on_match(classification, &candidate);
            bucket.push(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FetchError, RawCandidate};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// What the scripted source answers for one page.
    enum Scripted {
        Page(Page),
        Transport,
    }

    /// In-memory page source that records which pages were requested and can
    /// trigger a cancel after a given page is served.
    struct ScriptedSource {
        pages: HashMap<u32, Scripted>,
        requested: Mutex<Vec<u32>>,
        /// (page, signal, purge): cancel once this page has been served.
        cancel_after: Option<(u32, CancelSignal, bool)>,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                requested: Mutex::new(Vec::new()),
                cancel_after: None,
            }
        }

        fn page(mut self, number: u32, page: Page) -> Self {
            self.pages.insert(number, Scripted::Page(page));
            self
        }

        fn transport_error(mut self, number: u32) -> Self {
            self.pages.insert(number, Scripted::Transport);
            self
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl PageSource for ScriptedSource {
        async fn fetch_page(&self, _query: &Query, page_number: u32) -> Result<Page, FetchError> {
            self.requested.lock().unwrap().push(page_number);
            if let Some((after, cancel, purge)) = &self.cancel_after {
                if page_number == *after {
                    if *purge { cancel.clear() } else { cancel.stop() }
                }
            }
            match self.pages.get(&page_number) {
                Some(Scripted::Page(page)) => Ok(page.clone()),
                Some(Scripted::Transport) => Err(FetchError::Transport("connection reset".into())),
                None => Ok(Page {
                    status: 404,
                    ..Page::default()
                }),
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        matches: Vec<(Classification, String)>,
        pages: Vec<(u32, u32)>,
        purged: bool,
        finished: Option<SearchStatus>,
    }

    impl ResultSink for Recorder {
        fn on_match(&mut self, classification: Classification, candidate: &Candidate) {
            self.matches
                .push((classification, candidate.display_name.clone()));
        }

        fn purge(&mut self) {
            self.purged = true;
            self.matches.clear();
        }

        fn finished(&mut self, state: &PaginationState) {
            self.finished = Some(state.status);
        }
    }

    impl ProgressReporter for Recorder {
        fn on_page(&mut self, current_page: u32, total_pages: u32) {
            self.pages.push((current_page, total_pages));
        }
    }

    fn ok_page(names: &[&str]) -> Page {
        Page {
            status: 200,
            total_results_hint: None,
            results_per_page_hint: None,
            candidates: names
                .iter()
                .map(|n| RawCandidate::new(*n, format!("/recipes/{}", n.to_lowercase().replace(' ', "-"))))
                .collect(),
        }
    }

    fn first_page(names: &[&str], total: u64, per_page: u64) -> Page {
        Page {
            total_results_hint: Some(total),
            results_per_page_hint: Some(per_page),
            ..ok_page(names)
        }
    }

    /// Five pages of 24; pages 1 and 2 each hold one exact match.
    fn five_page_source() -> ScriptedSource {
        ScriptedSource::new()
            .page(1, first_page(&["Spicy Thai Basil Chicken", "Pad Thai"], 100, 24))
            .page(2, ok_page(&["spicy thai basil chicken", "Spicy Thai Basil Pork"]))
            .page(3, ok_page(&["Spicy Thai Basil Chicken"]))
            .page(4, ok_page(&["Green Curry"]))
            .page(5, ok_page(&["Spicy Thai Basil Beef"]))
    }

    fn session(query: &str, cancel: &CancelSignal) -> SearchSession {
        SearchSession::new(Query::new(query), cancel.clone())
    }

    #[test]
    fn total_pages_from_hints() {
        assert_eq!(total_pages(Some(100), Some(24), 24), 5);
        assert_eq!(total_pages(Some(96), Some(24), 24), 4);
        assert_eq!(total_pages(Some(1), Some(24), 24), 1);
    }

    #[test]
    fn total_pages_without_hints() {
        assert_eq!(total_pages(None, Some(24), 24), 1);
        assert_eq!(total_pages(None, None, 24), 1);
        assert_eq!(total_pages(Some(0), Some(24), 24), 1);
        assert_eq!(total_pages(Some(50), None, 10), 5);
        assert_eq!(total_pages(Some(50), Some(0), 10), 5);
    }

    #[test]
    fn terminal_states_are_final() {
        let mut state = PaginationState::default();
        assert!(!state.transition(SearchStatus::Completed));
        assert!(state.transition(SearchStatus::Running));
        assert!(state.transition(SearchStatus::Stopped));
        assert!(!state.transition(SearchStatus::Running));
        assert!(!state.transition(SearchStatus::Failed));
        assert_eq!(state.status, SearchStatus::Stopped);
    }

    #[tokio::test]
    async fn completes_all_pages() {
        let source = five_page_source();
        let cancel = CancelSignal::new();
        let mut rec = Recorder::default();
        let mut progress = Recorder::default();

        let outcome = session("Spicy Thai Basil Chicken", &cancel)
            .run(&source, &mut rec, &mut progress)
            .await;

        assert_eq!(outcome.state.status, SearchStatus::Completed);
        assert_eq!(outcome.state.total_pages, 5);
        assert_eq!(outcome.state.current_page, 6);
        assert!(outcome.state.failure_reason.is_none());
        assert_eq!(source.requested(), vec![1, 2, 3, 4, 5]);
        assert_eq!(outcome.exact_matches.len(), 3);
        assert_eq!(outcome.fuzzy_matches.len(), 2);
        assert_eq!(
            outcome.exact_matches.iter().map(|c| c.page_index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(
            progress.pages,
            vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]
        );
        assert_eq!(rec.finished, Some(SearchStatus::Completed));
        assert!(outcome.no_results_message().is_none());
    }

    #[tokio::test]
    async fn matches_stream_in_page_order() {
        let source = five_page_source();
        let cancel = CancelSignal::new();
        let mut rec = Recorder::default();

        session("Spicy Thai Basil Chicken", &cancel)
            .run(&source, &mut rec, &mut ())
            .await;

        let names: Vec<&str> = rec.matches.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Spicy Thai Basil Chicken",
                "spicy thai basil chicken",
                "Spicy Thai Basil Pork",
                "Spicy Thai Basil Chicken",
                "Spicy Thai Basil Beef",
            ]
        );
        assert_eq!(rec.matches[2].0, Classification::Fuzzy);
    }

    #[tokio::test]
    async fn missing_count_hint_means_one_page() {
        let source = ScriptedSource::new()
            .page(1, ok_page(&["Pad Thai"]))
            .page(2, ok_page(&["Pad Thai"]));
        let cancel = CancelSignal::new();

        let outcome = session("pad thai", &cancel)
            .run(&source, &mut (), &mut ())
            .await;

        assert_eq!(outcome.state.status, SearchStatus::Completed);
        assert_eq!(outcome.state.total_pages, 1);
        assert_eq!(source.requested(), vec![1]);
        assert_eq!(outcome.exact_matches.len(), 1);
    }

    #[tokio::test]
    async fn stop_after_page_two() {
        let cancel = CancelSignal::new();
        let mut source = five_page_source();
        source.cancel_after = Some((2, cancel.clone(), false));
        let mut rec = Recorder::default();
        let mut progress = Recorder::default();

        let outcome = session("Spicy Thai Basil Chicken", &cancel)
            .run(&source, &mut rec, &mut progress)
            .await;

        assert_eq!(outcome.state.status, SearchStatus::Stopped);
        assert!(outcome.state.failure_reason.is_none());
        assert_eq!(source.requested(), vec![1, 2]);
        assert_eq!(outcome.state.current_page, 3);
        assert_eq!(outcome.exact_matches.len(), 2);
        assert_eq!(outcome.fuzzy_matches.len(), 1);
        assert_eq!(progress.pages, vec![(1, 5), (2, 5)]);
        assert!(!rec.purged);
        assert_eq!(rec.finished, Some(SearchStatus::Stopped));
    }

    #[tokio::test]
    async fn clear_purges_sink() {
        let cancel = CancelSignal::new();
        let mut source = five_page_source();
        source.cancel_after = Some((2, cancel.clone(), true));
        let mut rec = Recorder::default();

        let outcome = session("Spicy Thai Basil Chicken", &cancel)
            .run(&source, &mut rec, &mut ())
            .await;

        assert_eq!(outcome.state.status, SearchStatus::Stopped);
        assert!(rec.purged);
        assert!(rec.matches.is_empty());
        assert_eq!(source.requested(), vec![1, 2]);
        // The session still hands back what it found; only the sink purges.
        assert_eq!(outcome.exact_matches.len(), 2);
    }

    #[tokio::test]
    async fn cancel_before_start_processes_nothing() {
        let source = five_page_source();
        let cancel = CancelSignal::new();
        cancel.stop();

        let outcome = session("Spicy Thai Basil Chicken", &cancel)
            .run(&source, &mut (), &mut ())
            .await;

        assert_eq!(outcome.state.status, SearchStatus::Stopped);
        assert_eq!(outcome.state.current_page, 1);
        assert!(outcome.exact_matches.is_empty());
        assert_eq!(source.requested(), vec![1]);
    }

    #[tokio::test]
    async fn non_success_status_aborts() {
        let source = five_page_source().page(
            3,
            Page {
                status: 503,
                ..Page::default()
            },
        );
        let cancel = CancelSignal::new();
        let mut rec = Recorder::default();

        let outcome = session("Spicy Thai Basil Chicken", &cancel)
            .run(&source, &mut rec, &mut ())
            .await;

        assert_eq!(outcome.state.status, SearchStatus::Failed);
        let reason = outcome.state.failure_reason.as_deref().unwrap();
        assert!(reason.contains("503"));
        assert!(reason.contains("page 3"));
        assert_eq!(source.requested(), vec![1, 2, 3]);
        assert_eq!(outcome.exact_matches.len(), 2);
        assert_eq!(outcome.state.current_page, 3);
        assert_eq!(rec.finished, Some(SearchStatus::Failed));
    }

    #[tokio::test]
    async fn transport_error_aborts() {
        let source = five_page_source().transport_error(2);
        let cancel = CancelSignal::new();

        let outcome = session("Spicy Thai Basil Chicken", &cancel)
            .run(&source, &mut (), &mut ())
            .await;

        assert_eq!(outcome.state.status, SearchStatus::Failed);
        let reason = outcome.state.failure_reason.unwrap();
        assert!(reason.contains("connection reset"));
        assert!(reason.contains("page 2"));
        assert_eq!(source.requested(), vec![1, 2]);
        assert_eq!(outcome.exact_matches.len(), 1);
    }

    #[tokio::test]
    async fn first_page_failure() {
        let source = ScriptedSource::new().page(
            1,
            Page {
                status: 500,
                ..Page::default()
            },
        );
        let cancel = CancelSignal::new();
        let mut progress = Recorder::default();

        let outcome = session("Pad Thai", &cancel)
            .run(&source, &mut (), &mut progress)
            .await;

        assert_eq!(outcome.state.status, SearchStatus::Failed);
        assert_eq!(outcome.state.total_pages, 1);
        assert!(progress.pages.is_empty());
        assert_eq!(
            outcome.no_results_message().as_deref(),
            Some("No results — 500 response on page 1")
        );
    }

    #[tokio::test]
    async fn malformed_candidate_skipped() {
        let mut page = ok_page(&["Pad Thai"]);
        page.candidates.insert(
            0,
            RawCandidate {
                display_name: None,
                source_ref: SourceRef::new("/recipes/broken"),
            },
        );
        page.candidates.push(RawCandidate::new("pad thai", "/recipes/2"));
        let source = ScriptedSource::new().page(1, page);
        let cancel = CancelSignal::new();

        let outcome = session("Pad Thai", &cancel)
            .run(&source, &mut (), &mut ())
            .await;

        assert_eq!(outcome.state.status, SearchStatus::Completed);
        assert_eq!(outcome.exact_matches.len(), 2);
    }

    #[tokio::test]
    async fn empty_pages_and_no_results() {
        let source = ScriptedSource::new()
            .page(1, first_page(&[], 30, 10))
            .page(2, ok_page(&[]))
            .page(3, ok_page(&["Green Curry"]));
        let cancel = CancelSignal::new();

        let outcome = session("Pad Thai", &cancel)
            .run(&source, &mut (), &mut ())
            .await;

        assert_eq!(outcome.state.status, SearchStatus::Completed);
        assert!(outcome.exact_matches.is_empty());
        assert!(outcome.state.failure_reason.is_none());
        assert_eq!(outcome.no_results_message().as_deref(), Some("No results"));
    }

    #[tokio::test]
    async fn page_count_fixed_from_first_page() {
        let mut second = ok_page(&[]);
        second.total_results_hint = Some(1000);
        second.results_per_page_hint = Some(10);
        let source = ScriptedSource::new()
            .page(1, first_page(&[], 20, 10))
            .page(2, second);
        let cancel = CancelSignal::new();

        let outcome = session("Pad Thai", &cancel)
            .run(&source, &mut (), &mut ())
            .await;

        assert_eq!(outcome.state.total_pages, 2);
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn default_page_size_used_without_per_page_hint() {
        let mut first = ok_page(&[]);
        first.total_results_hint = Some(25);
        let source = ScriptedSource::new()
            .page(1, first)
            .page(2, ok_page(&[]))
            .page(3, ok_page(&[]));
        let cancel = CancelSignal::new();

        let outcome = session("Pad Thai", &cancel)
            .with_default_per_page(10)
            .run(&source, &mut (), &mut ())
            .await;

        assert_eq!(outcome.state.total_pages, 3);
        assert_eq!(source.requested(), vec![1, 2, 3]);
    }
}
