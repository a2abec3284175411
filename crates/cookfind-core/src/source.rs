//! The page source abstraction the pagination controller pulls from.

use std::fmt;
use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::matching::Query;

/// Errors from fetching a results page.
///
/// These are distinct from a fetch that completed with a non-success status,
/// which is reported through [`Page::status`].
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Opaque handle to a candidate, owned by the page source.
///
/// The search engine only forwards it; link helpers in [`crate::links`]
/// turn it into something a user can open or copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A candidate record as the page source found it. The display name may be
/// missing when the markup is malformed.
#[derive(Debug, Clone)]
pub struct RawCandidate {
    pub display_name: Option<String>,
    pub source_ref: SourceRef,
}

impl RawCandidate {
    pub fn new(display_name: impl Into<String>, source_ref: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            source_ref: SourceRef::new(source_ref),
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub status: u16,
    pub total_results_hint: Option<u64>,
    pub results_per_page_hint: Option<u64>,
    pub candidates: Vec<RawCandidate>,
}

impl Page {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Something that can fetch numbered pages of search results for a query.
///
/// Page numbers are 1-based.
pub trait PageSource {
    fn fetch_page(
        &self,
        query: &Query,
        page_number: u32,
    ) -> impl Future<Output = Result<Page, FetchError>> + Send;
}
