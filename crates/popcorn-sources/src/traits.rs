use async_trait::async_trait;
use popcorn_models::{MovieDetail, MovieSummary};

use crate::error::SourceError;

/// A remote catalogue the fetchers can query.
///
/// Implementations do not deal with cancellation: callers drop the returned
/// future when a request is superseded.
#[async_trait]
pub trait MovieDatabase: Send + Sync {
    fn source_name(&self) -> &str;

    /// Free-text title search.
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, SourceError>;

    /// Full metadata for one identifier.
    async fn details(&self, imdb_id: &str) -> Result<MovieDetail, SourceError>;
}
