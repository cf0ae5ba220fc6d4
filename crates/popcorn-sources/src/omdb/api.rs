use popcorn_models::{MovieDetail, MovieSummary};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;

// OMDb marks missing values with this literal
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Deserialize)]
struct OmdbEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
struct OmdbDetailResponse {
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Genre", default)]
    genre: String,
}

fn available(value: String) -> Option<String> {
    if value.is_empty() || value == NOT_AVAILABLE {
        None
    } else {
        Some(value)
    }
}

impl From<OmdbSearchItem> for MovieSummary {
    fn from(item: OmdbSearchItem) -> Self {
        Self {
            imdb_id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster: available(item.poster),
        }
    }
}

impl From<OmdbDetailResponse> for MovieDetail {
    fn from(raw: OmdbDetailResponse) -> Self {
        Self {
            imdb_rating: available(raw.imdb_rating).and_then(|r| r.parse().ok()),
            imdb_id: raw.imdb_id,
            title: raw.title,
            year: raw.year,
            poster: available(raw.poster),
            runtime: raw.runtime,
            plot: raw.plot,
            released: raw.released,
            actors: raw.actors,
            director: raw.director,
            genre: raw.genre,
        }
    }
}

/// Map a `Response: "False"` body onto an error.
fn check_envelope(body: &str) -> Result<(), SourceError> {
    let envelope: OmdbEnvelope = serde_json::from_str(body)?;
    if envelope.response.eq_ignore_ascii_case("true") {
        return Ok(());
    }

    let message = envelope.error.unwrap_or_else(|| "Movie not found!".to_string());
    // Key and quota problems are not "no results"
    if message.contains("API key") || message.contains("limit") {
        Err(SourceError::Api(message))
    } else {
        Err(SourceError::NotFound(message))
    }
}

pub(crate) fn parse_search_response(body: &str) -> Result<Vec<MovieSummary>, SourceError> {
    check_envelope(body)?;
    let response: OmdbSearchResponse = serde_json::from_str(body)?;
    Ok(response.search.into_iter().map(MovieSummary::from).collect())
}

pub(crate) fn parse_detail_response(body: &str) -> Result<MovieDetail, SourceError> {
    check_envelope(body)?;
    let response: OmdbDetailResponse = serde_json::from_str(body)?;
    Ok(response.into())
}

async fn fetch_body(
    client: &Client,
    base_url: &str,
    api_key: &str,
    params: &[(&str, &str)],
) -> Result<String, SourceError> {
    let response = client
        .get(base_url)
        .query(&[("apikey", api_key)])
        .query(params)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status { status, body });
    }

    Ok(response.text().await?)
}

/// Search titles (`s=<query>`).
pub async fn search_movies(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<MovieSummary>, SourceError> {
    debug!(query = query, "OMDb search request");
    let body = fetch_body(client, base_url, api_key, &[("s", query)]).await?;
    let movies = parse_search_response(&body)?;
    debug!(query = query, results = movies.len(), "OMDb search response");
    Ok(movies)
}

/// Full detail for one title (`i=<imdb id>`).
pub async fn get_movie_details(
    client: &Client,
    base_url: &str,
    api_key: &str,
    imdb_id: &str,
) -> Result<MovieDetail, SourceError> {
    debug!(imdb_id = imdb_id, "OMDb detail request");
    let body = fetch_body(client, base_url, api_key, &[("i", imdb_id)]).await?;
    let mut detail = parse_detail_response(&body)?;
    if detail.imdb_id.is_empty() {
        detail.imdb_id = imdb_id.to_string();
    }
    Ok(detail)
}

#[cfg(test)]
mod tests;
