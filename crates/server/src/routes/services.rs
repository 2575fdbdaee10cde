use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use common::types::MessageBody;
use tracing::{debug, info};
use uuid::Uuid;

use service::assets::ImageUpload;
use service::catalog::domain::{NewService, PopulatedService, Service};
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::routes::auth::{Caller, ServerState};

/// Split a creation form into text fields and the optional image file.
/// Unknown fields, including any client-sent `provider`, are dropped. An `image`
/// part without a file name is not a file upload and is dropped too.
async fn read_service_form(mut multipart: Multipart) -> Result<(NewService, Option<ImageUpload>), JsonApiError> {
    let bad_form = |e: axum::extract::multipart::MultipartError| {
        JsonApiError::new(e.status(), "Invalid form data", Some(e.body_text()))
    };
    let mut input = NewService::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" if field.file_name().is_some() => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad_form)?;
                image = Some(ImageUpload::new(file_name, content_type, bytes.to_vec()));
            }
            "name" => input.name = Some(field.text().await.map_err(bad_form)?),
            "description" => input.description = Some(field.text().await.map_err(bad_form)?),
            "price" => input.price = Some(field.text().await.map_err(bad_form)?),
            "category" => input.category = Some(field.text().await.map_err(bad_form)?),
            other => debug!(field = %other, "ignoring form field"),
        }
    }
    Ok((input, image))
}

/// Unparsable ids cannot match a record.
fn parse_id(raw: &str) -> Result<Uuid, JsonApiError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::not_found("Service").into())
}

#[utoipa::path(
    post, path = "/api/services", tag = "services",
    request_body(content = crate::openapi::CreateServiceForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", body = crate::openapi::ServiceDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::MessageDoc),
        (status = 401, description = "Not authorized", body = crate::openapi::MessageDoc),
        (status = 403, description = "Access denied", body = crate::openapi::MessageDoc),
        (status = 413, description = "Upload too large", body = crate::openapi::MessageDoc),
        (status = 500, description = "Server error", body = crate::openapi::MessageDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Caller(caller): Caller,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Service>), JsonApiError> {
    let (input, image) = read_service_form(multipart).await?;
    let created = state.manager.create(caller.as_ref(), input, image).await?;
    info!(id = %created.id, "created service");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/services", tag = "services",
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::PopulatedServiceDoc]),
        (status = 500, description = "Server error", body = crate::openapi::MessageDoc)
    )
)]
pub async fn list_all(State(state): State<ServerState>) -> Result<Json<Vec<PopulatedService>>, JsonApiError> {
    Ok(Json(state.manager.list_all().await?))
}

#[utoipa::path(
    get, path = "/api/services/provider", tag = "services",
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::ServiceDoc]),
        (status = 403, description = "Access denied", body = crate::openapi::MessageDoc),
        (status = 500, description = "Server error", body = crate::openapi::MessageDoc)
    )
)]
pub async fn list_mine(State(state): State<ServerState>, Caller(caller): Caller) -> Result<Json<Vec<Service>>, JsonApiError> {
    Ok(Json(state.manager.list_by_provider(caller.as_ref()).await?))
}

#[utoipa::path(
    get, path = "/api/services/{id}", tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::PopulatedServiceDoc),
        (status = 404, description = "Service not found", body = crate::openapi::MessageDoc),
        (status = 500, description = "Server error", body = crate::openapi::MessageDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<PopulatedService>, JsonApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.manager.get_by_id(id).await?))
}

#[utoipa::path(
    delete, path = "/api/services/{id}", tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service deleted", body = crate::openapi::MessageDoc),
        (status = 403, description = "Unauthorized", body = crate::openapi::MessageDoc),
        (status = 404, description = "Service not found", body = crate::openapi::MessageDoc),
        (status = 500, description = "Server error", body = crate::openapi::MessageDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, JsonApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.manager.delete_by_id(caller.as_ref(), id).await?))
}
