use thiserror::Error;

pub mod config;
pub mod cooking;
pub mod links;
pub mod matching;
pub mod session;
pub mod source;

// Re-export for convenience
pub use config::Config;
pub use cooking::CookingSite;
pub use matching::{Classification, Query, classify, normalize};
pub use session::{
    CancelSignal, Candidate, Command, PaginationState, ProgressReporter, ResultSink,
    SearchOutcome, SearchSession, SearchStatus,
};
pub use source::{FetchError, Page, PageSource, RawCandidate, SourceRef};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid base URL {0}")]
    InvalidUrl(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Search the configured cooking site for `query`.
///
/// Builds a fresh [`SearchSession`] and runs it against a [`CookingSite`]
/// built from `config`. Matches are streamed to `sink` and page progress to
/// `progress` as they happen. The search can be halted between pages via the
/// [`CancelSignal`].
pub async fn search<R, P>(
    query: &str,
    config: &Config,
    sink: &mut R,
    progress: &mut P,
    cancel: CancelSignal,
) -> Result<SearchOutcome, CoreError>
where
    R: ResultSink + Send,
    P: ProgressReporter + Send,
{
    let site = CookingSite::new(config)?;
    let session = SearchSession::new(Query::new(query), cancel)
        .with_default_per_page(config.results_per_page);
    Ok(session.run(&site, sink, progress).await)
}
