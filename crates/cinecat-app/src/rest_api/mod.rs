pub mod genre;
pub mod macros;
pub mod movie;
pub mod paging;
pub mod person;
pub mod role;
pub mod search;

pub use paging::{Page, Paging};

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of responses that only confirm an action
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Message {
            message: message.into(),
        }
    }
}

/// All catalog endpoints
pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .nest("/movies", movie::router())
        .nest("/genres", genre::router())
        .nest("/people", person::router())
        .nest("/roles", role::router())
        .nest("/search", search::router())
        .method_not_allowed_fallback(method_not_allowed)
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".into())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
