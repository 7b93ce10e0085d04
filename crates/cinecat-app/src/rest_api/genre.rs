use crate::crud_api;
use cinecat_dal::genre::{CreateGenre, GenreRepository, UpdateGenre};
use cinecat_dal::movie::MovieShort;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use axum::routing::get;

crud_api!(Genre);

#[derive(Debug, Serialize, Deserialize)]
pub struct GenreMovies {
    pub genre: String,
    pub movies: Vec<MovieShort>,
}

mod extra_crud_api {
    use axum::{response::IntoResponse, Json};
    use cinecat_dal::{genre::GenreRepository, movie::MovieRepository};
    use http::StatusCode;
    use tracing::error;

    use super::GenreMovies;
    use crate::{error::ApiResult, validate::Path};

    pub async fn list(repository: GenreRepository) -> ApiResult<impl IntoResponse> {
        let genres = repository.list_all().await?;
        Ok((StatusCode::OK, Json(genres)))
    }

    pub async fn get(
        Path(id): Path<i64>,
        repository: GenreRepository,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.get(id).await?;
        Ok((StatusCode::OK, Json(record)))
    }

    /// Failure of the movies query is logged and answered with an empty list
    pub async fn list_movies(
        Path(genre_id): Path<i64>,
        repository: GenreRepository,
        movie_repo: MovieRepository,
    ) -> ApiResult<impl IntoResponse> {
        let genre = repository.get(genre_id).await?;
        let movies = movie_repo
            .list_by_genre(genre_id)
            .await
            .unwrap_or_else(|e| {
                error!("Cannot list movies of genre {genre_id}: {e}");
                Vec::new()
            });
        Ok((
            StatusCode::OK,
            Json(GenreMovies {
                genre: genre.genre_name,
                movies,
            }),
        ))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(extra_crud_api::list).post(crud_api::create))
        .route(
            "/{id}",
            get(extra_crud_api::get)
                .put(crud_api::update)
                .delete(crud_api::delete),
        )
        .route("/{id}/movies", get(extra_crud_api::list_movies))
}
