//! Loads full metadata for the selected movie.
//!
//! How a re-selection treats the request still in flight is decided by
//! [`ReselectPolicy`]. With `CancelStale` the fetcher behaves like the search
//! fetcher: the older request is cancelled and can never commit. With
//! `LastResponseWins` older requests keep running and whichever response
//! arrives last becomes the open movie, even if it belongs to an earlier
//! selection. Clearing the selection always cancels everything.

use popcorn_config::{DetailConfig, ReselectPolicy};
use popcorn_models::MovieDetail;
use popcorn_sources::MovieDatabase;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub selected: Option<String>,
    pub detail: Option<MovieDetail>,
    pub is_loading: bool,
    pub error: Option<String>,
    generation: u64,
    // Bumped by clear(); responses from before a clear never land
    epoch: u64,
}

impl DetailState {
    /// The loaded detail, once it matches the current selection.
    pub fn current(&self) -> Option<&MovieDetail> {
        let selected = self.selected.as_deref()?;
        self.detail
            .as_ref()
            .filter(|d| !self.is_loading && d.imdb_id == selected)
    }
}

struct InFlight {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct DetailFetcher {
    db: Arc<dyn MovieDatabase>,
    policy: ReselectPolicy,
    state: Arc<watch::Sender<DetailState>>,
    in_flight: Vec<InFlight>,
}

impl DetailFetcher {
    pub fn new(db: Arc<dyn MovieDatabase>, config: &DetailConfig) -> Self {
        let (state, _) = watch::channel(DetailState::default());
        Self {
            db,
            policy: config.reselect_policy,
            state: Arc::new(state),
            in_flight: Vec::new(),
        }
    }

    pub fn policy(&self) -> ReselectPolicy {
        self.policy
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn selected(&self) -> Option<String> {
        self.state.borrow().selected.clone()
    }

    /// Start loading `imdb_id`. Selecting the current movie again is a no-op.
    pub fn select(&mut self, imdb_id: impl Into<String>) {
        let imdb_id = imdb_id.into();
        if self.state.borrow().selected.as_deref() == Some(imdb_id.as_str()) {
            return;
        }

        match self.policy {
            ReselectPolicy::CancelStale => self.cancel_all(),
            ReselectPolicy::LastResponseWins => self.in_flight.retain(|f| !f.handle.is_finished()),
        }

        let mut generation = 0;
        let mut epoch = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            epoch = s.epoch;
            s.selected = Some(imdb_id.clone());
            s.detail = None;
            s.is_loading = true;
            s.error = None;
        });

        let token = CancellationToken::new();
        let handle = tokio::spawn(run_detail(
            Arc::clone(&self.db),
            Arc::clone(&self.state),
            token.clone(),
            Guard {
                policy: self.policy,
                generation,
                epoch,
            },
            imdb_id,
        ));
        self.in_flight.push(InFlight { token, handle });
    }

    /// Close the selection and drop every outstanding request.
    pub fn clear(&mut self) {
        self.cancel_all();
        self.state.send_if_modified(|s| {
            let was_open = s.selected.is_some() || s.detail.is_some() || s.is_loading;
            s.epoch += 1;
            s.generation += 1;
            s.selected = None;
            s.detail = None;
            s.is_loading = false;
            s.error = None;
            was_open
        });
    }

    /// Wait for every outstanding request to settle.
    pub async fn wait_idle(&mut self) {
        for in_flight in self.in_flight.drain(..) {
            if let Err(e) = in_flight.handle.await {
                if e.is_panic() {
                    warn!(error = %e, "Detail task panicked");
                }
            }
        }
    }

    fn cancel_all(&mut self) {
        for in_flight in self.in_flight.drain(..) {
            in_flight.token.cancel();
        }
    }
}

impl Drop for DetailFetcher {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[derive(Debug, Clone, Copy)]
struct Guard {
    policy: ReselectPolicy,
    generation: u64,
    epoch: u64,
}

impl Guard {
    fn admits(&self, state: &DetailState) -> bool {
        match self.policy {
            ReselectPolicy::CancelStale => state.generation == self.generation,
            ReselectPolicy::LastResponseWins => state.epoch == self.epoch,
        }
    }
}

async fn run_detail(
    db: Arc<dyn MovieDatabase>,
    state: Arc<watch::Sender<DetailState>>,
    token: CancellationToken,
    guard: Guard,
    imdb_id: String,
) {
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!(imdb_id = %imdb_id, "Detail request cancelled");
            return;
        }
        outcome = db.details(&imdb_id) => outcome,
    };

    let committed = state.send_if_modified(|s| {
        if !guard.admits(s) {
            return false;
        }
        if s.selected.as_deref() != Some(imdb_id.as_str()) {
            debug!(imdb_id = %imdb_id, "Late detail response takes over the selection");
            s.selected = Some(imdb_id.clone());
        }
        s.is_loading = false;
        match outcome {
            Ok(detail) => {
                debug!(imdb_id = %imdb_id, title = %detail.title, "Detail loaded");
                s.detail = Some(detail);
                s.error = None;
            }
            Err(e) => {
                warn!(imdb_id = %imdb_id, error = %e, source = db.source_name(), "Detail request failed");
                s.error = Some(e.to_string());
            }
        }
        true
    });

    if !committed {
        debug!(imdb_id = %imdb_id, "Discarded stale detail response");
    }
}
