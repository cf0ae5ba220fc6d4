use reqwest::StatusCode;

/// Failures talking to the movie database.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The API answered but had nothing for the query or id.
    #[error("{0}")]
    NotFound(String),

    /// The API rejected the request (bad key, quota, ...).
    #[error("{0}")]
    Api(String),

    #[error("Something went wrong with fetching movies")]
    Status { status: StatusCode, body: String },

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response from movie database: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }
}
