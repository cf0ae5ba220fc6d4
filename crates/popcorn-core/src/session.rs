use anyhow::Result;
use popcorn_config::Config;
use popcorn_models::{WatchedEntry, WatchedSummary};
use popcorn_sources::MovieDatabase;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::detail::{DetailFetcher, DetailState};
use crate::rating::StarRating;
use crate::search::{SearchFetcher, SearchState};
use crate::storage::KeyValueStorage;
use crate::title::{ScopedTitle, TitleSink};
use crate::watched::WatchedList;

/// Result of trying to add the open movie to the watched list.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(WatchedEntry),
    /// Already on the list, with the rating it was given then.
    AlreadyWatched(u8),
    NotRated,
    /// No movie open, or its detail has not arrived yet.
    NotLoaded,
}

/// Everything one user session holds: the query, the open movie, the rating
/// being chosen for it, the watched list and the window title.
pub struct Session {
    search: SearchFetcher,
    detail: DetailFetcher,
    watched: WatchedList,
    rating: StarRating,
    rating_decisions: u32,
    // The movie the rating above was chosen for
    open_id: Option<String>,
    title_sink: Arc<dyn TitleSink>,
    default_title: String,
    title: Option<ScopedTitle>,
}

impl Session {
    pub fn new(
        db: Arc<dyn MovieDatabase>,
        storage: Arc<dyn KeyValueStorage>,
        title_sink: Arc<dyn TitleSink>,
        config: &Config,
    ) -> Self {
        Self {
            search: SearchFetcher::new(Arc::clone(&db), &config.search),
            detail: DetailFetcher::new(db, &config.detail),
            watched: WatchedList::load(storage, config.storage.watched_key.clone()),
            rating: StarRating::new(config.ui.max_rating),
            rating_decisions: 0,
            open_id: None,
            title_sink,
            default_title: config.ui.default_title.clone(),
            title: None,
        }
    }

    // Search

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.search.set_query(query);
    }

    pub fn query(&self) -> String {
        self.search.query()
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    pub fn subscribe_search(&self) -> watch::Receiver<SearchState> {
        self.search.subscribe()
    }

    pub async fn wait_for_search(&mut self) {
        self.search.wait_idle().await;
    }

    // Selection

    /// Open `imdb_id`, or close it when it is already open.
    pub fn select_movie(&mut self, imdb_id: &str) {
        if self.selected_id().as_deref() == Some(imdb_id) {
            self.close_movie();
            return;
        }
        debug!(imdb_id = imdb_id, "Opening movie");
        self.reset_rating();
        self.detail.select(imdb_id);
        self.open_id = Some(imdb_id.to_string());
        self.sync_title();
    }

    pub fn close_movie(&mut self) {
        self.reset_rating();
        self.detail.clear();
        self.open_id = None;
        self.sync_title();
    }

    pub fn selected_id(&self) -> Option<String> {
        self.detail.selected()
    }

    pub fn detail_state(&self) -> DetailState {
        self.detail.state()
    }

    pub fn subscribe_detail(&self) -> watch::Receiver<DetailState> {
        self.detail.subscribe()
    }

    pub async fn wait_for_detail(&mut self) {
        self.detail.wait_idle().await;
        self.sync_title();
    }

    // Rating

    /// Commit a rating for the open movie. Every change to a non-zero value
    /// counts as one decision.
    pub fn set_user_rating(&mut self, stars: u8) {
        if self.rating.commit(stars) {
            self.rating_decisions += 1;
            debug!(stars = stars, decisions = self.rating_decisions, "Rating changed");
        }
    }

    pub fn user_rating(&self) -> u8 {
        self.rating.rating()
    }

    pub fn rating_decisions(&self) -> u32 {
        self.rating_decisions
    }

    pub fn rating_widget(&self) -> &StarRating {
        &self.rating
    }

    /// For hover previews. Commits should go through `set_user_rating` or
    /// `commit_rating_hover` so decisions are counted.
    pub fn rating_widget_mut(&mut self) -> &mut StarRating {
        &mut self.rating
    }

    pub fn commit_rating_hover(&mut self) {
        let before = self.rating.rating();
        if self.rating.commit_hover() && self.rating.rating() != before {
            self.rating_decisions += 1;
        }
    }

    fn reset_rating(&mut self) {
        self.rating.reset();
        self.rating_decisions = 0;
    }

    // Watched list

    /// Add the open movie with the current rating, then close it.
    pub fn add_watched(&mut self) -> Result<AddOutcome> {
        let state = self.detail.state();
        let Some(detail) = state.current() else {
            return Ok(AddOutcome::NotLoaded);
        };
        if let Some(rating) = self.watched.user_rating_for(&detail.imdb_id) {
            return Ok(AddOutcome::AlreadyWatched(rating));
        }
        let stars = self.rating.rating();
        if stars == 0 {
            return Ok(AddOutcome::NotRated);
        }

        let entry = WatchedEntry::from_detail(detail, stars, self.rating_decisions);
        self.watched.add(entry.clone())?;
        info!(
            imdb_id = %entry.imdb_id,
            title = %entry.title,
            user_rating = entry.user_rating,
            decisions = entry.count_rating_decisions,
            "Marked as watched"
        );
        self.close_movie();
        Ok(AddOutcome::Added(entry))
    }

    pub fn delete_watched(&mut self, imdb_id: &str) -> Result<bool> {
        self.watched.remove(imdb_id)
    }

    pub fn is_watched(&self, imdb_id: &str) -> bool {
        self.watched.contains(imdb_id)
    }

    pub fn watched_user_rating(&self, imdb_id: &str) -> Option<u8> {
        self.watched.user_rating_for(imdb_id)
    }

    pub fn watched(&self) -> &[WatchedEntry] {
        self.watched.entries()
    }

    pub fn summary(&self) -> WatchedSummary {
        self.watched.summary()
    }

    // Title

    /// Point the title at the open movie, or back to the default. A late
    /// response that took over the selection also starts a fresh rating.
    pub fn sync_title(&mut self) {
        self.follow_selection();
        let state = self.detail.state();
        let wanted = state.current().map(|d| d.title.clone());
        let shown = self.title.as_ref().map(|t| t.movie_title().to_string());
        if wanted == shown {
            return;
        }

        // The old guard restores the default before the new one overrides it
        drop(self.title.take());
        if let Some(movie_title) = wanted {
            self.title = Some(ScopedTitle::new(
                Arc::clone(&self.title_sink),
                self.default_title.clone(),
                movie_title,
            ));
        }
    }

    fn follow_selection(&mut self) {
        let selected = self.detail.selected();
        if selected == self.open_id {
            return;
        }
        debug!(from = ?self.open_id, to = ?selected, "Open movie replaced by a late response");
        self.reset_rating();
        self.open_id = selected;
    }
}
