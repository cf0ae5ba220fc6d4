use super::*;

const SEARCH_BODY: &str = r#"{
    "Search": [
        {"Title": "The Matrix", "Year": "1999", "imdbID": "tt0133093", "Type": "movie", "Poster": "https://m.media-amazon.com/images/M/matrix.jpg"},
        {"Title": "The Matrix Reloaded", "Year": "2003", "imdbID": "tt0234215", "Type": "movie", "Poster": "N/A"},
        {"Title": "The Matrix Revolutions", "Year": "2003", "imdbID": "tt0242653", "Type": "movie", "Poster": "https://m.media-amazon.com/images/M/revolutions.jpg"}
    ],
    "totalResults": "3",
    "Response": "True"
}"#;

const DETAIL_BODY: &str = r#"{
    "Title": "The Matrix",
    "Year": "1999",
    "Rated": "R",
    "Released": "31 Mar 1999",
    "Runtime": "136 min",
    "Genre": "Action, Sci-Fi",
    "Director": "Lana Wachowski, Lilly Wachowski",
    "Actors": "Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss",
    "Plot": "When a beautiful stranger leads computer hacker Neo to a forbidding underworld...",
    "Poster": "https://m.media-amazon.com/images/M/matrix.jpg",
    "imdbRating": "8.7",
    "imdbID": "tt0133093",
    "Response": "True"
}"#;

#[test]
fn test_parse_search_response() {
    let movies = parse_search_response(SEARCH_BODY).unwrap();
    assert_eq!(movies.len(), 3);
    assert_eq!(movies[0].imdb_id, "tt0133093");
    assert_eq!(movies[0].title, "The Matrix");
    assert_eq!(movies[0].year, "1999");
    assert!(movies[0].poster.is_some());
    assert_eq!(movies[1].poster, None);
}

#[test]
fn test_parse_search_not_found() {
    let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
    let err = parse_search_response(body).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Movie not found!");
}

#[test]
fn test_parse_search_too_many_results_is_not_found() {
    let body = r#"{"Response":"False","Error":"Too many results."}"#;
    assert!(parse_search_response(body).unwrap_err().is_not_found());
}

#[test]
fn test_parse_search_invalid_key() {
    let body = r#"{"Response":"False","Error":"Invalid API key!"}"#;
    let err = parse_search_response(body).unwrap_err();
    assert!(matches!(err, SourceError::Api(_)));
    assert_eq!(err.to_string(), "Invalid API key!");
}

#[test]
fn test_parse_garbage_is_decode_error() {
    let err = parse_search_response("<html>502</html>").unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
}

#[test]
fn test_parse_detail_response() {
    let detail = parse_detail_response(DETAIL_BODY).unwrap();
    assert_eq!(detail.imdb_id, "tt0133093");
    assert_eq!(detail.title, "The Matrix");
    assert_eq!(detail.runtime, "136 min");
    assert_eq!(detail.runtime_minutes(), Some(136));
    assert_eq!(detail.imdb_rating, Some(8.7));
    assert_eq!(detail.genre, "Action, Sci-Fi");
    assert_eq!(detail.released, "31 Mar 1999");
}

#[test]
fn test_parse_detail_missing_rating() {
    let body = r#"{"Title":"Obscure","Year":"2021","Runtime":"N/A","imdbRating":"N/A","Poster":"N/A","imdbID":"tt9999999","Response":"True"}"#;
    let detail = parse_detail_response(body).unwrap();
    assert_eq!(detail.imdb_rating, None);
    assert_eq!(detail.poster, None);
    assert_eq!(detail.runtime_minutes(), None);
}

#[test]
fn test_parse_detail_incorrect_id() {
    let body = r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#;
    assert!(parse_detail_response(body).unwrap_err().is_not_found());
}
