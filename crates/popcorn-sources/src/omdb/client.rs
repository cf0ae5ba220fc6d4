use crate::error::SourceError;
use crate::omdb::api;
use crate::traits::MovieDatabase;
use async_trait::async_trait;
use popcorn_config::OmdbConfig;
use popcorn_models::{MovieDetail, MovieSummary};
use reqwest::Client;
use std::sync::Arc;

/// Shared reqwest client for OMDb calls.
pub fn create_omdb_client() -> Client {
    Client::builder()
        .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Arc::new(create_omdb_client()),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &OmdbConfig) -> Self {
        Self::new(config.api_key.clone(), config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // No api_key
        f.debug_struct("OmdbClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MovieDatabase for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, SourceError> {
        api::search_movies(&self.client, &self.base_url, &self.api_key, query).await
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetail, SourceError> {
        api::get_movie_details(&self.client, &self.base_url, &self.api_key, imdb_id).await
    }
}
