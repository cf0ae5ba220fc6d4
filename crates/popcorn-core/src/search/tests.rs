use super::*;
use crate::fake::{movie, FakeDatabase};
use std::time::Duration;

fn matrix_results() -> Vec<MovieSummary> {
    vec![
        movie("tt0133093", "The Matrix", "1999"),
        movie("tt0234215", "The Matrix Reloaded", "2003"),
        movie("tt0242653", "The Matrix Revolutions", "2003"),
    ]
}

fn fetcher(db: &Arc<FakeDatabase>) -> SearchFetcher {
    SearchFetcher::new(db.clone(), &SearchConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_short_query_makes_no_request() {
    let db = Arc::new(FakeDatabase::new());
    let mut search = fetcher(&db);

    for query in ["", "M", "Ma", "  Ma  "] {
        search.set_query(query);
        search.wait_idle().await;
        let state = search.state();
        assert!(state.movies.is_empty());
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
    }

    assert_eq!(db.search_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_successful_search() {
    let db = Arc::new(FakeDatabase::new().with_search("Matrix", 50, matrix_results()));
    let mut search = fetcher(&db);

    search.set_query("Matrix");
    assert!(search.state().is_loading);

    search.wait_idle().await;
    let state = search.state();
    assert!(!state.is_loading);
    assert_eq!(state.error, None);
    assert_eq!(state.movies, matrix_results());
    assert_eq!(db.requests(), vec!["Matrix"]);
}

#[tokio::test(start_paused = true)]
async fn test_query_is_trimmed_before_searching() {
    let db = Arc::new(FakeDatabase::new().with_search("Matrix", 0, matrix_results()));
    let mut search = fetcher(&db);

    search.set_query("  Matrix ");
    search.wait_idle().await;
    assert_eq!(search.state().movies.len(), 3);
    assert_eq!(search.query(), "  Matrix ");
}

#[tokio::test(start_paused = true)]
async fn test_not_found_sets_fixed_message() {
    let db = Arc::new(
        FakeDatabase::new()
            .with_search("Matrix", 0, matrix_results())
            .with_search_not_found("zzzzzz", 0),
    );
    let mut search = fetcher(&db);

    search.set_query("Matrix");
    search.wait_idle().await;
    search.set_query("zzzzzz");
    search.wait_idle().await;

    let state = search.state();
    assert_eq!(state.error.as_deref(), Some(NOT_FOUND_MESSAGE));
    assert!(state.movies.is_empty());
    assert!(!state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_failure_surfaces_message() {
    let db = Arc::new(FakeDatabase::new().with_search_failure("Matrix", 0, "Invalid API key!"));
    let mut search = fetcher(&db);

    search.set_query("Matrix");
    search.wait_idle().await;

    let state = search.state();
    assert_eq!(state.error.as_deref(), Some("Invalid API key!"));
    assert!(!state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_new_query_clears_error() {
    let db = Arc::new(
        FakeDatabase::new()
            .with_search_failure("Matrix", 0, "boom")
            .with_search("Heat", 100, vec![movie("tt0113277", "Heat", "1995")]),
    );
    let mut search = fetcher(&db);

    search.set_query("Matrix");
    search.wait_idle().await;
    assert!(search.state().error.is_some());

    search.set_query("Heat");
    let state = search.state();
    assert_eq!(state.error, None);
    assert!(state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_slow_stale_response_is_discarded() {
    let db = Arc::new(
        FakeDatabase::new()
            .with_search("Matr", 500, vec![movie("tt9999999", "Matriarch", "2001")])
            .with_search("Matrix", 10, matrix_results()),
    );
    let mut search = fetcher(&db);

    search.set_query("Matr");
    // Let the first request reach the database before superseding it
    tokio::time::sleep(Duration::from_millis(5)).await;
    search.set_query("Matrix");

    search.wait_idle().await;
    assert_eq!(search.state().movies, matrix_results());

    tokio::time::sleep(Duration::from_secs(1)).await;
    let state = search.state();
    assert_eq!(state.movies, matrix_results());
    assert!(!state.is_loading);
    assert_eq!(db.requests(), vec!["Matr", "Matrix"]);
}

#[tokio::test(start_paused = true)]
async fn test_only_final_query_commits() {
    let db = Arc::new(
        FakeDatabase::new()
            .with_search("Mat", 30, vec![movie("tt1", "Matilda", "1996")])
            .with_search("Matr", 20, vec![movie("tt2", "Matriarch", "2001")])
            .with_search("Matri", 10, vec![movie("tt3", "Matrimony", "2010")])
            .with_search("Matrix", 40, matrix_results()),
    );
    let mut search = fetcher(&db);
    let mut rx = search.subscribe();

    for query in ["Mat", "Matr", "Matri", "Matrix"] {
        search.set_query(query);
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    search.wait_idle().await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    let seen = rx.borrow_and_update().clone();
    assert_eq!(seen.query, "Matrix");
    assert_eq!(seen.movies, matrix_results());
    assert_eq!(db.search_calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_short_query_cancels_pending_search() {
    let db = Arc::new(FakeDatabase::new().with_search("Matrix", 100, matrix_results()));
    let mut search = fetcher(&db);

    search.set_query("Matrix");
    tokio::time::sleep(Duration::from_millis(5)).await;
    search.set_query("Ma");

    tokio::time::sleep(Duration::from_secs(1)).await;
    let state = search.state();
    assert!(state.movies.is_empty());
    assert!(!state.is_loading);
    assert_eq!(state.error, None);
}

#[tokio::test(start_paused = true)]
async fn test_unchanged_query_is_ignored() {
    let db = Arc::new(FakeDatabase::new().with_search("Matrix", 10, matrix_results()));
    let mut search = fetcher(&db);

    search.set_query("Matrix");
    search.wait_idle().await;
    let generation = search.state().generation();

    search.set_query("Matrix");
    search.wait_idle().await;

    assert_eq!(db.search_calls(), 1);
    assert_eq!(search.state().generation(), generation);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_in_flight_request() {
    let db = Arc::new(FakeDatabase::new().with_search("Matrix", 100, matrix_results()));
    let mut search = fetcher(&db);
    let rx = search.subscribe();

    search.set_query("Matrix");
    tokio::time::sleep(Duration::from_millis(5)).await;
    drop(search);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(rx.borrow().movies.is_empty());
}
