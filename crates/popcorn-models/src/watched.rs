use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detail::MovieDetail;

/// A movie the user has watched and rated.
///
/// Field names on disk follow the layout older watched lists were written
/// with (`imdbID`, `userRating`, `countRatingDecisions`, ...), so existing
/// lists keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    #[serde(default)]
    pub poster: Option<String>,
    /// Minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
    pub user_rating: u8,
    #[serde(default)]
    pub count_rating_decisions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl WatchedEntry {
    pub fn from_detail(detail: &MovieDetail, user_rating: u8, count_rating_decisions: u32) -> Self {
        Self {
            imdb_id: detail.imdb_id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster: detail.poster.clone(),
            runtime: detail.runtime_minutes(),
            imdb_rating: detail.imdb_rating,
            user_rating,
            count_rating_decisions,
            added_at: Some(Utc::now()),
        }
    }
}
