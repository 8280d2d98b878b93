use axum::{
    extract::Request,
    response::{IntoResponse, Response},
    Json,
};
use models::{Client, ClientFilter, CreateClientRequest};
use tracing::info;

use super::{attach_image, fetch, read_image, not_implemented, parse_json, read_body, remove, Dispatch};
use crate::{
    auth::{authenticate, Principal},
    errors::ApiError,
    state::AppState,
};

pub(crate) async fn route(state: &AppState, action: Dispatch, req: Request) -> Result<Response, ApiError> {
    match action {
        Dispatch::List => Ok(list(state).await?.into_response()),
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
    get, path = "/clients/", tag = "clients",
    responses(
        (status = 200, description = "Clients", body = [crate::openapi::ClientDoc]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list(state: &AppState) -> Result<Json<Vec<Client>>, ApiError> {
    Ok(Json(state.clients.list(&ClientFilter).await?))
}

#[utoipa::path(
    get, path = "/clients/{id}", tag = "clients",
    params(("id" = String, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client", body = crate::openapi::ClientDoc),
        (status = 404, description = "client not found")
    )
)]
pub async fn get(state: &AppState, id: &str) -> Result<Json<Client>, ApiError> {
    fetch(&state.clients, id).await
}

#[utoipa::path(
    post, path = "/clients/", tag = "clients",
    request_body = crate::openapi::CreateClientDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::ClientDoc),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer" = []))
)]
pub async fn create(state: &AppState, principal: Principal, body: &[u8]) -> Result<Json<Client>, ApiError> {
    let input: CreateClientRequest = parse_json(body)?;
    let created = state.clients.create(input.into_new(principal.id)?).await?;
    info!(id = %created.id, user = %created.user_id, "client created");
    Ok(Json(created))
}

#[utoipa::path(
    get, path = "/clients/{id}/images/{key}", tag = "clients",
    params(
        ("id" = String, Path, description = "Client id"),
        ("key" = String, Path, description = "Image key, the last segment of a recorded image URL")
    ),
    responses(
        (status = 200, description = "Raw image bytes", body = String, content_type = "application/octet-stream"),
        (status = 404, description = "client or image not found")
    )
)]
pub async fn get_image(state: &AppState, id: &str, key: &str) -> Result<Response, ApiError> {
    read_image(state, &state.clients, id, key).await
}

#[utoipa::path(
    post, path = "/clients/{id}/images", tag = "clients",
    params(("id" = String, Path, description = "Client id")),
    request_body(content = String, content_type = "application/octet-stream", description = "Raw image bytes"),
    responses(
        (status = 200, description = "success"),
        (status = 400, description = "no image provided"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "client not found")
    ),
    security(("bearer" = []))
)]
pub async fn upload_image(state: &AppState, principal: Principal, id: &str, req: Request) -> Result<Json<&'static str>, ApiError> {
    attach_image(state, &state.clients, &principal, id, req.into_body()).await
}

#[utoipa::path(
    delete, path = "/clients/{id}", tag = "clients",
    params(("id" = String, Path, description = "Client id")),
    responses(
        (status = 200, description = "successful deletion"),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer" = []))
)]
pub async fn delete(state: &AppState, principal: Principal, id: &str) -> Result<Json<&'static str>, ApiError> {
    remove(&state.clients, &principal, id).await
}
