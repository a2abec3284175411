use cookfind_core::{Candidate, Classification, PaginationState};

/// Events flowing from the backend search task to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// A search session began.
    SearchStarted { query: String },
    /// A result page is being processed.
    PageProgress { current_page: u32, total_pages: u32 },
    /// A candidate was classified as an exact or fuzzy match.
    Match {
        classification: Classification,
        candidate: Candidate,
    },
    /// The session observed a clear request; drop shown results.
    Purge,
    /// The session reached a terminal status.
    SearchFinished {
        state: PaginationState,
        no_results: Option<String>,
    },
}
