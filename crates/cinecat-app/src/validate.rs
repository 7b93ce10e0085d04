//! Extractor that deserializes JSON bodies or query strings and validates them with `garde`.
//!
//! Both deserialization and validation failures are turned into [`ApiError::InvalidRequest`],
//! so clients always get `400` with an `{"error": ...}` body. [`Path`] does the same for
//! path parameters.

use axum::extract::{rejection::PathRejection, FromRequest, FromRequestParts, Query, Request};
use axum::Json;
use garde::Validate;
use http::request::Parts;
use serde::de::DeserializeOwned;
use std::ops::{Deref, DerefMut};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default)]
pub struct Garde<E>(pub E);

impl<E> Deref for Garde<E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<E> DerefMut for Garde<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<E> Garde<E> {
    /// Consumes the `Garde` and returns the validated data within.
    pub fn into_inner(self) -> E {
        self.0
    }
}

fn validation_error(report: garde::Report) -> ApiError {
    ApiError::InvalidRequest(format!("Invalid request: {}", report.to_string().trim()))
}

/// Path parameters, a malformed segment is rejected with a JSON body
#[derive(Debug, Clone, Copy)]
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(inner) = axum::extract::Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(ApiError::from)?;
        Ok(Path(inner))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl<T> FromRequest<AppState> for Garde<Json<T>>
where
    T: DeserializeOwned + Validate<Context = ()>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let inner = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

        inner.validate().map_err(validation_error)?;
        Ok(Garde(inner))
    }
}

impl<T> FromRequestParts<AppState> for Garde<Query<T>>
where
    T: DeserializeOwned + Validate<Context = ()>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let inner = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

        inner.validate().map_err(validation_error)?;
        Ok(Garde(inner))
    }
}
