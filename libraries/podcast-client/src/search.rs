//! Debounced, last-writer-wins episode search
//!
//! Raw keystroke-level queries go in one channel, results come out the other.
//! Only a query that has been stable for the debounce window is executed, and
//! a newer query aborts any search still in flight, so results never arrive
//! out of order.

use podcast_core::{ContentRepository, Episode, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

/// Default quiet period before a query is executed
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default minimum query length (in characters)
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Default maximum number of results
pub const DEFAULT_LIMIT: usize = 20;

/// Outcome of one executed (or skipped) query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    /// Trimmed query the results belong to
    pub query: String,
    /// Matching episodes, newest first
    pub episodes: Vec<Episode>,
    /// Repository failure, if the search could not run
    pub error: Option<String>,
}

impl SearchResults {
    fn empty(query: String) -> Self {
        Self {
            query,
            episodes: Vec::new(),
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Search task configuration and repository
pub struct SearchPipeline<R: ?Sized> {
    repository: Arc<R>,
    debounce: Duration,
    min_query_len: usize,
    limit: usize,
}

struct Pending {
    query: String,
    deadline: Instant,
}

struct InFlight {
    query: String,
    handle: JoinHandle<Result<Vec<Episode>>>,
}

impl<R> SearchPipeline<R>
where
    R: ContentRepository + ?Sized + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            debounce: DEFAULT_DEBOUNCE,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_min_query_len(mut self, min_query_len: usize) -> Self {
        self.min_query_len = min_query_len;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Run the pipeline on a background task
    ///
    /// Returns the query input and the result output. Dropping the input
    /// lets any queued query finish, then closes the output.
    pub fn spawn(self, capacity: usize) -> (mpsc::Sender<String>, mpsc::Receiver<SearchResults>) {
        let (query_tx, query_rx) = mpsc::channel(capacity);
        let (result_tx, result_rx) = mpsc::channel(capacity);
        tokio::spawn(self.run(query_rx, result_tx));
        (query_tx, result_rx)
    }

    /// Process queries until the input closes and nothing is left to do
    pub async fn run(
        self,
        mut queries: mpsc::Receiver<String>,
        results: mpsc::Sender<SearchResults>,
    ) {
        let mut input_open = true;
        let mut pending: Option<Pending> = None;
        let mut in_flight: Option<InFlight> = None;

        while input_open || pending.is_some() || in_flight.is_some() {
            let outcome = tokio::select! {
                biased;

                query = queries.recv(), if input_open => match query {
                    Some(raw) => self.accept(raw, &mut pending, &mut in_flight),
                    None => {
                        debug!("Search input closed");
                        input_open = false;
                        None
                    }
                },

                () = debounce_elapsed(&pending) => {
                    if let Some(Pending { query, .. }) = pending.take() {
                        in_flight = Some(self.start(query));
                    }
                    None
                },

                (query, joined) = finished(&mut in_flight) => {
                    in_flight = None;
                    Some(match joined {
                        Ok(Ok(episodes)) => {
                            debug!(query = %query, count = episodes.len(), "Search completed");
                            SearchResults { query, episodes, error: None }
                        }
                        Ok(Err(e)) => {
                            warn!(query = %query, error = %e, "Search failed");
                            SearchResults { query, episodes: Vec::new(), error: Some(e.to_string()) }
                        }
                        Err(e) => {
                            warn!(query = %query, error = %e, "Search task failed");
                            SearchResults { query, episodes: Vec::new(), error: Some(e.to_string()) }
                        }
                    })
                },
            };

            if let Some(outcome) = outcome {
                if results.send(outcome).await.is_err() {
                    debug!("Search results receiver dropped");
                    break;
                }
            }
        }

        if let Some(stale) = in_flight {
            stale.handle.abort();
        }
    }

    /// Register a new query; returns an immediate result for short queries
    fn accept(
        &self,
        raw: String,
        pending: &mut Option<Pending>,
        in_flight: &mut Option<InFlight>,
    ) -> Option<SearchResults> {
        if let Some(stale) = in_flight.take() {
            debug!(query = %stale.query, "Search superseded");
            stale.handle.abort();
        }

        let query = raw.trim().to_string();
        if query.chars().count() < self.min_query_len {
            *pending = None;
            return Some(SearchResults::empty(query));
        }

        *pending = Some(Pending {
            query,
            deadline: Instant::now() + self.debounce,
        });
        None
    }

    fn start(&self, query: String) -> InFlight {
        debug!(query = %query, limit = self.limit, "Executing search");
        let repository = Arc::clone(&self.repository);
        let limit = self.limit;
        let needle = query.clone();
        let handle = tokio::spawn(async move { repository.search_episodes(&needle, limit).await });
        InFlight { query, handle }
    }
}

async fn debounce_elapsed(pending: &Option<Pending>) {
    match pending {
        Some(p) => sleep_until(p.deadline).await,
        None => std::future::pending().await,
    }
}

async fn finished(
    in_flight: &mut Option<InFlight>,
) -> (
    String,
    std::result::Result<Result<Vec<Episode>>, tokio::task::JoinError>,
) {
    match in_flight {
        Some(f) => {
            let joined = (&mut f.handle).await;
            (f.query.clone(), joined)
        }
        None => std::future::pending().await,
    }
}
