//! In-memory `MovieDatabase` with per-request delays, for fetcher tests.

use async_trait::async_trait;
use popcorn_models::{MovieDetail, MovieSummary};
use popcorn_sources::{MovieDatabase, SourceError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone)]
enum Reply<T> {
    Found(T),
    NotFound,
    Fail(String),
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, SourceError> {
        match self {
            Reply::Found(value) => Ok(value),
            Reply::NotFound => Err(SourceError::NotFound("Movie not found!".to_string())),
            Reply::Fail(message) => Err(SourceError::Api(message)),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeDatabase {
    searches: HashMap<String, (Duration, Reply<Vec<MovieSummary>>)>,
    details: HashMap<String, (Duration, Reply<MovieDetail>)>,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: &str, delay_ms: u64, movies: Vec<MovieSummary>) -> Self {
        self.searches.insert(query.to_string(), (Duration::from_millis(delay_ms), Reply::Found(movies)));
        self
    }

    pub fn with_search_not_found(mut self, query: &str, delay_ms: u64) -> Self {
        self.searches.insert(query.to_string(), (Duration::from_millis(delay_ms), Reply::NotFound));
        self
    }

    pub fn with_search_failure(mut self, query: &str, delay_ms: u64, message: &str) -> Self {
        self.searches.insert(
            query.to_string(),
            (Duration::from_millis(delay_ms), Reply::Fail(message.to_string())),
        );
        self
    }

    pub fn with_detail(mut self, detail: MovieDetail, delay_ms: u64) -> Self {
        self.details.insert(detail.imdb_id.clone(), (Duration::from_millis(delay_ms), Reply::Found(detail)));
        self
    }

    pub fn with_detail_failure(mut self, imdb_id: &str, delay_ms: u64, message: &str) -> Self {
        self.details.insert(
            imdb_id.to_string(),
            (Duration::from_millis(delay_ms), Reply::Fail(message.to_string())),
        );
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    /// Every query or id that reached the database, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    fn record(&self, request: &str) {
        if let Ok(mut log) = self.log.lock() {
            log.push(request.to_string());
        }
    }
}

#[async_trait]
impl MovieDatabase for FakeDatabase {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, SourceError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.record(query);
        let (delay, reply) = self
            .searches
            .get(query)
            .cloned()
            .unwrap_or((Duration::ZERO, Reply::NotFound));
        tokio::time::sleep(delay).await;
        reply.into_result()
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetail, SourceError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.record(imdb_id);
        let (delay, reply) = self
            .details
            .get(imdb_id)
            .cloned()
            .unwrap_or((Duration::ZERO, Reply::NotFound));
        tokio::time::sleep(delay).await;
        reply.into_result()
    }
}

pub(crate) fn movie(imdb_id: &str, title: &str, year: &str) -> MovieSummary {
    MovieSummary {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: year.to_string(),
        poster: None,
    }
}

pub(crate) fn detail(imdb_id: &str, title: &str, imdb_rating: f64) -> MovieDetail {
    MovieDetail {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: "1999".to_string(),
        poster: None,
        runtime: "136 min".to_string(),
        imdb_rating: Some(imdb_rating),
        plot: "A hacker learns the truth.".to_string(),
        released: "31 Mar 1999".to_string(),
        actors: "Keanu Reeves".to_string(),
        director: "The Wachowskis".to_string(),
        genre: "Action, Sci-Fi".to_string(),
    }
}
