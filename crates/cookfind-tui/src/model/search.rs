use cookfind_core::{PaginationState, SearchStatus};

/// What the status area shows about the latest search.
#[derive(Debug, Clone)]
pub struct SearchView {
    pub query: Option<String>,
    pub status: SearchStatus,
    pub current_page: u32,
    pub total_pages: u32,
    /// "No results" line, with the failure reason when the search failed.
    pub message: Option<String>,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            query: None,
            status: SearchStatus::Idle,
            current_page: 0,
            total_pages: 1,
            message: None,
        }
    }
}

impl SearchView {
    pub fn started(query: String) -> Self {
        Self {
            query: Some(query),
            status: SearchStatus::Running,
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == SearchStatus::Running
    }

    pub fn finish(&mut self, state: &PaginationState, message: Option<String>) {
        self.status = state.status;
        self.total_pages = state.total_pages;
        self.message = message;
    }

    /// Progress ratio for the gauge; pages already processed over total.
    pub fn ratio(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (f64::from(self.current_page) / f64::from(self.total_pages)).clamp(0.0, 1.0)
    }

    /// Only multi-page searches get a progress gauge.
    pub fn shows_progress(&self) -> bool {
        self.is_running() && self.total_pages > 1
    }
}
