use crate::crud_api;
use cinecat_dal::person::{CreatePerson, Person, PersonMovieRole, PersonRepository, UpdatePerson};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use axum::routing::get;

crud_api!(Person);

const PEOPLE_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, Validate)]
pub struct PeopleQuery {
    #[garde(length(max = 255))]
    name: Option<String>,
}

/// Person with the movies they took part in
#[derive(Debug, Serialize, Deserialize)]
pub struct PersonDetail {
    #[serde(flatten)]
    pub person: Person,
    pub movies: Vec<PersonMovieRole>,
}

mod extra_crud_api {
    use axum::{extract::Query, response::IntoResponse, Json};
    use cinecat_dal::person::PersonRepository;
    use http::StatusCode;
    use tracing::error;

    use super::{PeopleQuery, PersonDetail, PEOPLE_LIMIT};
    use crate::{
        error::ApiResult,
        validate::{Garde, Path},
    };

    pub async fn list(
        repository: PersonRepository,
        Garde(Query(query)): Garde<Query<PeopleQuery>>,
    ) -> ApiResult<impl IntoResponse> {
        let name = query.name.as_deref().filter(|n| !n.is_empty());
        let people = repository.list(name, PEOPLE_LIMIT).await?;
        Ok((StatusCode::OK, Json(people)))
    }

    pub async fn get(
        Path(id): Path<i64>,
        repository: PersonRepository,
    ) -> ApiResult<impl IntoResponse> {
        let person = repository.get(id).await?;
        let movies = repository.movies(id).await.unwrap_or_else(|e| {
            error!("Cannot load movies of person {id}: {e}");
            Vec::new()
        });
        Ok((StatusCode::OK, Json(PersonDetail { person, movies })))
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
}
