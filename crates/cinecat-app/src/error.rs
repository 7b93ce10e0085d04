use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::Serialize;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Store failure while changing data, the change was rolled back
    #[error("{0}")]
    FailedMutation(#[source] cinecat_dal::Error),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal error: {0}")]
    Internal(#[source] cinecat_dal::Error),
}

impl ApiError {
    /// Maps a data layer error coming from a mutation, store failures are reported to
    /// the client as a bad request.
    pub fn from_mutation(err: cinecat_dal::Error) -> Self {
        match err {
            cinecat_dal::Error::DatabaseError(_) | cinecat_dal::Error::MigrationError(_) => {
                ApiError::FailedMutation(err)
            }
            other => other.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::FailedMutation(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<cinecat_dal::Error> for ApiError {
    fn from(err: cinecat_dal::Error) -> Self {
        match err {
            cinecat_dal::Error::RecordNotFound(_) => ApiError::NotFound(err.to_string()),
            cinecat_dal::Error::DuplicateAssociation(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(other),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else if let ApiError::FailedMutation(ref e) = self {
            error!("Mutation rolled back: {e}");
        }
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
