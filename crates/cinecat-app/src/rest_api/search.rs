use axum::{extract::Query, response::IntoResponse, routing::get, Json};
use cinecat_dal::{
    genre::{Genre, GenreRepository},
    movie::{MovieRepository, MovieShort},
    person::{PersonRepository, PersonShort},
};
use garde::Validate;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    validate::Garde,
};

/// Maximum hits returned per category
const SEARCH_LIMIT: i64 = 10;

#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[garde(length(max = 255))]
    q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResult {
    pub movies: Vec<MovieShort>,
    pub people: Vec<PersonShort>,
    pub genres: Vec<Genre>,
}

pub async fn search(
    movies: MovieRepository,
    people: PersonRepository,
    genres: GenreRepository,
    Garde(Query(query)): Garde<Query<SearchQuery>>,
) -> ApiResult<impl IntoResponse> {
    let text = match query.q.as_deref() {
        Some(q) if !q.is_empty() => q,
        _ => {
            return Err(ApiError::InvalidRequest(
                "Query parameter 'q' required".into(),
            ))
        }
    };
    debug!("Searching for {text}");
    let (movies, people, genres) = futures::try_join!(
        movies.search(text, SEARCH_LIMIT),
        people.list(Some(text), SEARCH_LIMIT),
        genres.search(text, SEARCH_LIMIT),
    )?;
    Ok((
        StatusCode::OK,
        Json(SearchResult {
            movies,
            people,
            genres,
        }),
    ))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/", get(search))
}
