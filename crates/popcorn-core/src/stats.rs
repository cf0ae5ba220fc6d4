use popcorn_models::{WatchedEntry, WatchedSummary};

/// Arithmetic mean; `0.0` for an empty slice.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Figures for the summary panel. Entries lacking a value (no IMDb rating,
/// unknown runtime) are left out of that average rather than counted as zero.
pub fn summarize(entries: &[WatchedEntry]) -> WatchedSummary {
    let imdb: Vec<f64> = entries.iter().filter_map(|e| e.imdb_rating).collect();
    let user: Vec<f64> = entries.iter().map(|e| f64::from(e.user_rating)).collect();
    let runtime: Vec<f64> = entries
        .iter()
        .filter_map(|e| e.runtime)
        .map(f64::from)
        .collect();

    WatchedSummary {
        count: entries.len(),
        avg_imdb_rating: average(&imdb),
        avg_user_rating: average(&user),
        avg_runtime: average(&runtime),
    }
}
