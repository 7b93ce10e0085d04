use cinecat_dal::role::RoleRepository;

use crate::state::AppState;
use axum::{response::IntoResponse, routing::get, Json};
use http::StatusCode;

use crate::error::ApiResult;

crate::repository_from_request!(RoleRepository);

pub async fn list(repository: RoleRepository) -> ApiResult<impl IntoResponse> {
    let roles = repository.list_all().await?;
    Ok((StatusCode::OK, Json(roles)))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/", get(list))
}
