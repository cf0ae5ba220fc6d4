use serde::{Deserialize, Serialize};

/// One row of a search response. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieSummary {
    pub imdb_id: String,
    pub title: String,
    pub year: String, // Free text: series come back as "2008–2013"
    pub poster: Option<String>,
}
