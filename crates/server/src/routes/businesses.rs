use axum::{
    extract::Request,
    response::{IntoResponse, Response},
    Json,
};
use models::{Business, BusinessFilter, CreateBusinessRequest};
use serde::Deserialize;
use tracing::info;

use super::{attach_image, fetch, read_image, not_implemented, parse_json, parse_query, read_body, remove, Dispatch};
use crate::{
    auth::{authenticate, Principal},
    errors::ApiError,
    state::AppState,
};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Category tag; empty means no filter.
    #[serde(default)]
    pub category: Option<String>,
}

pub(crate) async fn route(state: &AppState, action: Dispatch, req: Request) -> Result<Response, ApiError> {
    match action {
        Dispatch::List => Ok(list(state, parse_query(req.uri())?).await?.into_response()),
        Dispatch::Get(id) => Ok(get(state, &id).await?.into_response()),
        Dispatch::GetImage(id, key) => get_image(state, &id, &key).await,
        Dispatch::Create => {
            let principal = authenticate(state, req.headers()).await?;
            let body = read_body(state, req.into_body()).await?;
            Ok(create(state, principal, &body).await?.into_response())
        }
        Dispatch::UploadImage(id) => {
            let principal = authenticate(state, req.headers()).await?;
            Ok(upload_image(state, principal, &id, req).await?.into_response())
        }
        Dispatch::Delete(id) => {
            let principal = authenticate(state, req.headers()).await?;
            Ok(delete(state, principal, &id).await?.into_response())
        }
        Dispatch::NotImplemented(method) => Err(not_implemented(&method)),
    }
}

#[utoipa::path(
    get, path = "/businesses/", tag = "businesses",
    params(ListQuery),
    responses(
        (status = 200, description = "Businesses", body = [crate::openapi::BusinessDoc]),
        (status = 400, description = "invalid category"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list(state: &AppState, query: ListQuery) -> Result<Json<Vec<Business>>, ApiError> {
    let filter = BusinessFilter { category: query.category };
    let found = state.businesses.list(&filter).await?;
    filter.validate()?;
    Ok(Json(found))
}

#[utoipa::path(
    get, path = "/businesses/{id}", tag = "businesses",
    params(("id" = String, Path, description = "Business id")),
    responses(
        (status = 200, description = "Business", body = crate::openapi::BusinessDoc),
        (status = 404, description = "business not found")
    )
)]
pub async fn get(state: &AppState, id: &str) -> Result<Json<Business>, ApiError> {
    fetch(&state.businesses, id).await
}

#[utoipa::path(
    post, path = "/businesses/", tag = "businesses",
    request_body = crate::openapi::CreateBusinessDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::BusinessDoc),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer" = []))
)]
pub async fn create(state: &AppState, principal: Principal, body: &[u8]) -> Result<Json<Business>, ApiError> {
    let input: CreateBusinessRequest = parse_json(body)?;
    let created = state.businesses.create(input.into_new(principal.id)?).await?;
    info!(id = %created.id, user = %created.user_id, category = %created.category, "business created");
    Ok(Json(created))
}

#[utoipa::path(
    get, path = "/businesses/{id}/images/{key}", tag = "businesses",
    params(
        ("id" = String, Path, description = "Business id"),
        ("key" = String, Path, description = "Image key, the last segment of a recorded image URL")
    ),
    responses(
        (status = 200, description = "Raw image bytes", body = String, content_type = "application/octet-stream"),
        (status = 404, description = "business or image not found")
    )
)]
pub async fn get_image(state: &AppState, id: &str, key: &str) -> Result<Response, ApiError> {
    read_image(state, &state.businesses, id, key).await
}

#[utoipa::path(
    post, path = "/businesses/{id}/images", tag = "businesses",
    params(("id" = String, Path, description = "Business id")),
    request_body(content = String, content_type = "application/octet-stream", description = "Raw image bytes"),
    responses(
        (status = 200, description = "success"),
        (status = 400, description = "no image provided"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "business not found")
    ),
    security(("bearer" = []))
)]
pub async fn upload_image(state: &AppState, principal: Principal, id: &str, req: Request) -> Result<Json<&'static str>, ApiError> {
    attach_image(state, &state.businesses, &principal, id, req.into_body()).await
}

#[utoipa::path(
    delete, path = "/businesses/{id}", tag = "businesses",
    params(("id" = String, Path, description = "Business id")),
    responses(
        (status = 200, description = "successful deletion"),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer" = []))
)]
pub async fn delete(state: &AppState, principal: Principal, id: &str) -> Result<Json<&'static str>, ApiError> {
    remove(&state.businesses, &principal, id).await
}
