//! Search-as-you-type against a [`MovieDatabase`].
//!
//! Every query change supersedes the previous one: the outstanding request is
//! cancelled and its result, should it still arrive, is discarded. Results are
//! committed under the watch channel's lock only if the generation they were
//! issued for is still current, so a slow stale response can never overwrite
//! a newer one.

use popcorn_config::SearchConfig;
use popcorn_models::MovieSummary;
use popcorn_sources::MovieDatabase;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Shown when the database has nothing for the query.
pub const NOT_FOUND_MESSAGE: &str = "Movie not found";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub movies: Vec<MovieSummary>,
    pub is_loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl SearchState {
    /// Bumped on every query change.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct InFlight {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Must be driven from inside a tokio runtime; requests run as spawned tasks.
pub struct SearchFetcher {
    db: Arc<dyn MovieDatabase>,
    min_query_len: usize,
    state: Arc<watch::Sender<SearchState>>,
    in_flight: Option<InFlight>,
}

impl SearchFetcher {
    pub fn new(db: Arc<dyn MovieDatabase>, config: &SearchConfig) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            db,
            min_query_len: config.min_query_len,
            state: Arc::new(state),
            in_flight: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn query(&self) -> String {
        self.state.borrow().query.clone()
    }

    /// React to a new query value. Unchanged values are ignored.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.state.borrow().query == query {
            return;
        }

        self.cancel_in_flight();

        let trimmed = query.trim().to_string();
        let too_short = trimmed.chars().count() < self.min_query_len;

        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            s.query = query;
            s.error = None;
            if too_short {
                s.movies.clear();
                s.is_loading = false;
            } else {
                s.is_loading = true;
            }
        });

        if too_short {
            debug!(query = %trimmed, min = self.min_query_len, "Query too short, not searching");
            return;
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(run_search(
            Arc::clone(&self.db),
            Arc::clone(&self.state),
            token.clone(),
            generation,
            trimmed,
        ));
        self.in_flight = Some(InFlight { token, handle });
    }

    /// Wait for the outstanding request, if any, to settle.
    pub async fn wait_idle(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            if let Err(e) = in_flight.handle.await {
                if e.is_panic() {
                    warn!(error = %e, "Search task panicked");
                }
            }
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.token.cancel();
        }
    }
}

impl Drop for SearchFetcher {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

async fn run_search(
    db: Arc<dyn MovieDatabase>,
    state: Arc<watch::Sender<SearchState>>,
    token: CancellationToken,
    generation: u64,
    query: String,
) {
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!(query = %query, "Search superseded before it settled");
            return;
        }
        outcome = db.search(&query) => outcome,
    };

    let committed = state.send_if_modified(|s| {
        if s.generation != generation {
            return false;
        }
        s.is_loading = false;
        match outcome {
            Ok(movies) => {
                debug!(query = %query, results = movies.len(), "Search settled");
                s.movies = movies;
                s.error = None;
            }
            Err(e) if e.is_not_found() => {
                debug!(query = %query, reason = %e, "Search found nothing");
                s.movies.clear();
                s.error = Some(NOT_FOUND_MESSAGE.to_string());
            }
            Err(e) => {
                warn!(query = %query, error = %e, source = db.source_name(), "Search failed");
                s.error = Some(e.to_string());
            }
        }
        true
    });

    if !committed {
        debug!(query = %query, "Discarded stale search result");
    }
}

#[cfg(test)]
mod tests;
