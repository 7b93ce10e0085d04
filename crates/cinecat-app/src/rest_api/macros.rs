/// Generates `create`, `update` and `delete` handlers in a `crud_api` module for an entity
/// with `<Entity>Repository`, `Create<Entity>` and `Update<Entity>` types in scope.
#[macro_export]
macro_rules! crud_api {
    ($entity:ty) => {
        type EntityRepository = paste::paste! {[<$entity Repository>]};
        $crate::repository_from_request!(EntityRepository);
        pub mod crud_api {
            use super::*;
            use $crate::error::{ApiError, ApiResult};
            use $crate::rest_api::Message;
            use $crate::validate::{Garde, Path};
            use axum::{response::IntoResponse, Json};
            use http::StatusCode;
            use tracing::debug;

            type CreateEntity = paste::paste! {[<Create $entity>]};
            type UpdateEntity = paste::paste! {[<Update $entity>]};

            pub async fn create(
                repository: EntityRepository,
                Garde(Json(payload)): Garde<Json<CreateEntity>>,
            ) -> ApiResult<impl IntoResponse> {
                let record = repository
                    .create(payload)
                    .await
                    .map_err(ApiError::from_mutation)?;
                debug!("Created {} {:?}", stringify!($entity), record);

                Ok((StatusCode::CREATED, Json(record)))
            }

            pub async fn update(
                Path(id): Path<i64>,
                repository: EntityRepository,
                Garde(Json(payload)): Garde<Json<UpdateEntity>>,
            ) -> ApiResult<impl IntoResponse> {
                let record = repository
                    .update(id, payload)
                    .await
                    .map_err(ApiError::from_mutation)?;

                Ok((StatusCode::OK, Json(record)))
            }

            pub async fn delete(
                Path(id): Path<i64>,
                repository: EntityRepository,
            ) -> ApiResult<impl IntoResponse> {
                repository
                    .delete(id)
                    .await
                    .map_err(ApiError::from_mutation)?;
                debug!("Deleted {} {}", stringify!($entity), id);

                Ok((
                    StatusCode::OK,
                    Json(Message::new(concat!(
                        stringify!($entity),
                        " deleted successfully"
                    ))),
                ))
            }
        }
    };
}
