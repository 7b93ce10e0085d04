use crate::crud_api;
use cinecat_dal::movie::{CreateMovie, MovieRepository, UpdateMovie};
use cinecat_dal::stats::StatsRepository;
use garde::Validate;
use serde::Deserialize;

use crate::state::AppState;
use axum::routing::{delete, get, post};

crud_api!(Movie);
crate::repository_from_request!(StatsRepository);

const DEFAULT_TOP_RATED: u32 = 10;

#[derive(Debug, Deserialize, Validate)]
pub struct TopRatedQuery {
    #[garde(range(min = 1, max = 1000))]
    limit: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddGenreRequest {
    #[garde(range(min = 1))]
    genre_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddPersonRequest {
    #[garde(range(min = 1))]
    person_id: i64,
    #[garde(range(min = 1))]
    role_id: i64,
}

mod extra_crud_api {
    use axum::{
        extract::{Query, State},
        response::IntoResponse,
        Json,
    };
    use cinecat_dal::{
        movie::{Movie, MovieRepository, MovieShort},
        stats::StatsRepository,
    };
    use http::StatusCode;
    use tracing::{debug, error};

    use super::{AddGenreRequest, AddPersonRequest, TopRatedQuery, DEFAULT_TOP_RATED};
    use crate::{
        error::{ApiError, ApiResult},
        rest_api::{Message, Page, Paging},
        state::AppState,
        validate::{Garde, Path},
    };

    /// Relations are loaded leniently, a failing query leaves its list empty
    async fn load_relations(repository: &MovieRepository, movie: MovieShort) -> Movie {
        let id = movie.movie_id;
        let genres = repository.genre_names(id).await.unwrap_or_else(|e| {
            error!("Cannot load genres of movie {id}: {e}");
            Vec::new()
        });
        let people = repository.people(id).await.unwrap_or_else(|e| {
            error!("Cannot load people of movie {id}: {e}");
            Vec::new()
        });
        Movie::new(movie, genres, people)
    }

    pub async fn list(
        repository: MovieRepository,
        State(state): State<AppState>,
        Garde(Query(paging)): Garde<Query<Paging>>,
    ) -> ApiResult<impl IntoResponse> {
        debug!("Paging: {:?}", paging);
        let default_page_size = state.config().default_page_size;
        let page = paging.page();
        let per_page = paging.page_size(default_page_size);
        let listing_params = paging.listing_params(default_page_size);
        let filter = paging.into_filter();
        let batch = repository.list(&filter, listing_params).await?;
        Ok((
            StatusCode::OK,
            Json(Page::from_batch(batch, page, per_page)),
        ))
    }

    pub async fn get(
        Path(id): Path<i64>,
        repository: MovieRepository,
    ) -> ApiResult<impl IntoResponse> {
        let movie = repository.get(id).await?;
        let record = load_relations(&repository, movie).await;
        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn top_rated(
        repository: MovieRepository,
        Garde(Query(query)): Garde<Query<TopRatedQuery>>,
    ) -> ApiResult<impl IntoResponse> {
        let limit = query.limit.unwrap_or(DEFAULT_TOP_RATED);
        let movies = repository.top_rated(limit.into()).await?;
        let records = futures::future::join_all(
            movies
                .into_iter()
                .map(|movie| load_relations(&repository, movie)),
        )
        .await;
        Ok((StatusCode::OK, Json(records)))
    }

    pub async fn list_by_year(
        Path(year): Path<i64>,
        repository: MovieRepository,
    ) -> ApiResult<impl IntoResponse> {
        let movies = repository.list_by_year(year).await?;
        Ok((StatusCode::OK, Json(movies)))
    }

    pub async fn years(repository: MovieRepository) -> ApiResult<impl IntoResponse> {
        let years = repository.years().await?;
        Ok((StatusCode::OK, Json(years)))
    }

    pub async fn stats(repository: StatsRepository) -> ApiResult<impl IntoResponse> {
        let stats = repository.get().await?;
        Ok((StatusCode::OK, Json(stats)))
    }

    pub async fn add_genre(
        Path(movie_id): Path<i64>,
        repository: MovieRepository,
        Garde(Json(request)): Garde<Json<AddGenreRequest>>,
    ) -> ApiResult<impl IntoResponse> {
        repository
            .add_genre(movie_id, request.genre_id)
            .await
            .map_err(ApiError::from_mutation)?;
        Ok((
            StatusCode::CREATED,
            Json(Message::new("Genre added to movie successfully")),
        ))
    }

    pub async fn remove_genre(
        Path((movie_id, genre_id)): Path<(i64, i64)>,
        repository: MovieRepository,
    ) -> ApiResult<impl IntoResponse> {
        repository
            .remove_genre(movie_id, genre_id)
            .await
            .map_err(ApiError::from_mutation)?;
        Ok((
            StatusCode::OK,
            Json(Message::new("Genre removed from movie successfully")),
        ))
    }

    pub async fn add_person(
        Path(movie_id): Path<i64>,
        repository: MovieRepository,
        Garde(Json(request)): Garde<Json<AddPersonRequest>>,
    ) -> ApiResult<impl IntoResponse> {
        repository
            .add_person(movie_id, request.person_id, request.role_id)
            .await
            .map_err(ApiError::from_mutation)?;
        Ok((
            StatusCode::CREATED,
            Json(Message::new("Person added to movie successfully")),
        ))
    }

    pub async fn remove_person(
        Path((movie_id, person_id, role_id)): Path<(i64, i64, i64)>,
        repository: MovieRepository,
    ) -> ApiResult<impl IntoResponse> {
        repository
            .remove_person(movie_id, person_id, role_id)
            .await
            .map_err(ApiError::from_mutation)?;
        Ok((
            StatusCode::OK,
            Json(Message::new("Person removed from movie successfully")),
        ))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(extra_crud_api::list).post(crud_api::create))
        .route("/top-rated", get(extra_crud_api::top_rated))
        .route("/years", get(extra_crud_api::years))
        .route("/stats", get(extra_crud_api::stats))
        .route("/by-year/{year}", get(extra_crud_api::list_by_year))
        .route(
            "/{id}",
            get(extra_crud_api::get)
                .put(crud_api::update)
                .delete(crud_api::delete),
        )
        .route("/{id}/genres", post(extra_crud_api::add_genre))
        .route(
            "/{id}/genres/{genre_id}",
            delete(extra_crud_api::remove_genre),
        )
        .route("/{id}/people", post(extra_crud_api::add_person))
        .route(
            "/{id}/people/{person_id}/roles/{role_id}",
            delete(extra_crud_api::remove_person),
        )
}
