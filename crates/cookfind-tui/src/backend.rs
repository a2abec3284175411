use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use cookfind_core::{
    CancelSignal, Candidate, Classification, Command, PageSource, ProgressReporter, Query,
    ResultSink, SearchSession,
};

use crate::tui_event::BackendEvent;

/// Forwards session callbacks to the TUI as [`BackendEvent`]s.
#[derive(Clone)]
struct ChannelSink {
    tx: mpsc::UnboundedSender<BackendEvent>,
}

impl ResultSink for ChannelSink {
    fn on_match(&mut self, classification: Classification, candidate: &Candidate) {
        let _ = self.tx.send(BackendEvent::Match {
            classification,
            candidate: candidate.clone(),
        });
    }

    fn purge(&mut self) {
        let _ = self.tx.send(BackendEvent::Purge);
    }
}

impl ProgressReporter for ChannelSink {
    fn on_page(&mut self, current_page: u32, total_pages: u32) {
        let _ = self.tx.send(BackendEvent::PageProgress {
            current_page,
            total_pages,
        });
    }
}

/// The session currently running, if any.
struct ActiveSearch {
    cancel: CancelSignal,
    handle: JoinHandle<()>,
}

/// Dispatch front-end commands into search sessions until the command
/// channel closes.
///
/// At most one session runs at a time: a `StartSearch` that arrives while a
/// session is still running is dropped. The page source is shared by every
/// session so its HTTP client and connection pool live for the whole run.
pub async fn run_backend<S>(
    source: Arc<S>,
    default_per_page: u64,
    mut commands: mpsc::UnboundedReceiver<Command>,
    tx: mpsc::UnboundedSender<BackendEvent>,
) where
    S: PageSource + Send + Sync + 'static,
{
    let mut active: Option<ActiveSearch> = None;

    while let Some(command) = commands.recv().await {
        match command {
            Command::StartSearch(query) => {
                if active.as_ref().is_some_and(|a| !a.handle.is_finished()) {
                    tracing::warn!("search already running; ignoring \"{query}\"");
                    continue;
                }
                let cancel = CancelSignal::new();
                let handle = tokio::spawn(run_session(
                    source.clone(),
                    query,
                    default_per_page,
                    cancel.clone(),
                    tx.clone(),
                ));
                active = Some(ActiveSearch { cancel, handle });
            }
            Command::Cancel { purge } => {
                if let Some(search) = &active {
                    if purge {
                        search.cancel.clear();
                    } else {
                        search.cancel.stop();
                    }
                }
            }
        }
    }

    // Shutting down: drop the in-flight page fetch rather than wait it out
    if let Some(search) = active {
        search.cancel.stop();
        search.handle.abort();
        let _ = search.handle.await;
    }
}

async fn run_session<S>(
    source: Arc<S>,
    query: String,
    default_per_page: u64,
    cancel: CancelSignal,
    tx: mpsc::UnboundedSender<BackendEvent>,
) where
    S: PageSource + Send + Sync + 'static,
{
    let _ = tx.send(BackendEvent::SearchStarted {
        query: query.clone(),
    });

    let mut sink = ChannelSink { tx: tx.clone() };
    let mut progress = sink.clone();
    let outcome = SearchSession::new(Query::new(query), cancel)
        .with_default_per_page(default_per_page)
        .run(source.as_ref(), &mut sink, &mut progress)
        .await;

    let no_results = outcome.no_results_message();
    let _ = tx.send(BackendEvent::SearchFinished {
        state: outcome.state,
        no_results,
    });
}
