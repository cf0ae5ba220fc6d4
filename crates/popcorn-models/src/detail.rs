use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: Option<String>,
    pub runtime: String, // As sent by the API, e.g. "136 min"
    pub imdb_rating: Option<f64>,
    pub plot: String,
    pub released: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

impl MovieDetail {
    /// Leading integer of the runtime text ("136 min" -> 136).
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime
            .split_whitespace()
            .next()
            .and_then(|token| token.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_with_runtime(runtime: &str) -> MovieDetail {
        MovieDetail {
            imdb_id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            poster: None,
            runtime: runtime.to_string(),
            imdb_rating: Some(8.7),
            plot: String::new(),
            released: "31 Mar 1999".to_string(),
            actors: String::new(),
            director: String::new(),
            genre: String::new(),
        }
    }

    #[test]
    fn test_runtime_minutes_parses_leading_number() {
        assert_eq!(detail_with_runtime("136 min").runtime_minutes(), Some(136));
        assert_eq!(detail_with_runtime("  90 min").runtime_minutes(), Some(90));
    }

    #[test]
    fn test_runtime_minutes_unknown() {
        assert_eq!(detail_with_runtime("N/A").runtime_minutes(), None);
        assert_eq!(detail_with_runtime("").runtime_minutes(), None);
    }
}
