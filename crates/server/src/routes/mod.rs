use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Query, Request, State},
    http::{header, Method, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use common::types::Health;
use serde::de::DeserializeOwned;
use service::repository::{Entity, HasImages, Repository};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use utoipa::OpenApi;

use crate::{auth::Principal, errors::ApiError, openapi::ApiDoc, state::AppState};

pub mod appointments;
pub mod businesses;
pub mod clients;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "OK", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router. Resource mounts are resolved in the
/// fallback so that `/businesses`, `/businesses/` and `/businesses/{id}/...`
/// all reach the same resource router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(mount)
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resource {
    Businesses,
    Clients,
    Appointments,
}

const MOUNTS: [(&str, Resource); 3] = [
    ("/businesses", Resource::Businesses),
    ("/clients", Resource::Clients),
    ("/appointments", Resource::Appointments),
];

/// Split a request path into its resource and the tail after the mount.
fn resolve(path: &str) -> Option<(Resource, &str)> {
    MOUNTS.iter().find_map(|(prefix, resource)| {
        let rest = path.strip_prefix(prefix)?;
        if rest.is_empty() {
            Some((*resource, rest))
        } else {
            rest.strip_prefix('/').map(|tail| (*resource, tail))
        }
    })
}

/// What a resource router should do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    List,
    Get(String),
    GetImage(String, String),
    Create,
    UploadImage(String),
    Delete(String),
    NotImplemented(Method),
}

pub fn dispatch(method: &Method, tail: &str) -> Dispatch {
    let id = tail.trim_end_matches('/');
    match *method {
        Method::GET if id.is_empty() => Dispatch::List,
        Method::GET => match id.split_once("/images/") {
            Some((owner, key)) if !key.contains('/') => Dispatch::GetImage(owner.to_string(), key.to_string()),
            _ => Dispatch::Get(id.to_string()),
        },
        Method::POST => match id.strip_suffix("/images") {
            Some(owner) => Dispatch::UploadImage(owner.to_string()),
            None => Dispatch::Create,
        },
        Method::DELETE => Dispatch::Delete(id.to_string()),
        _ => Dispatch::NotImplemented(method.clone()),
    }
}

async fn mount(State(state): State<AppState>, req: Request) -> Response {
    let path = req.uri().path().to_string();
    let outcome = match resolve(&path) {
        Some((resource, tail)) => {
            let action = dispatch(req.method(), tail);
            match resource {
                Resource::Businesses => businesses::route(&state, action, req).await,
                Resource::Clients => clients::route(&state, action, req).await,
                Resource::Appointments => appointments::route(&state, action, req).await,
            }
        }
        None => Err(ApiError::not_found("not found")),
    };
    outcome.unwrap_or_else(IntoResponse::into_response)
}

pub(crate) fn not_implemented(method: &Method) -> ApiError {
    ApiError::not_implemented(format!("{method} not implemented yet"))
}

pub(crate) fn parse_query<Q: DeserializeOwned>(uri: &Uri) -> Result<Q, ApiError> {
    Query::<Q>::try_from_uri(uri)
        .map(|Query(q)| q)
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

pub(crate) async fn read_body(state: &AppState, body: Body) -> Result<Bytes, ApiError> {
    to_bytes(body, state.max_upload_bytes)
        .await
        .map_err(|e| ApiError::bad_request(format!("request body rejected: {e}")))
}

/// Decode a JSON body, answering 400 with the decoder's message.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(e.to_string()))
}

pub(crate) async fn fetch<T: Entity>(repo: &Repository<T>, id: &str) -> Result<Json<T>, ApiError> {
    Ok(Json(repo.get_by_id(id).await?))
}

pub(crate) async fn remove<T: Entity>(
    repo: &Repository<T>,
    principal: &Principal,
    id: &str,
) -> Result<Json<&'static str>, ApiError> {
    repo.delete(id).await?;
    info!(kind = T::KIND, %id, user = %principal.id, "deleted");
    Ok(Json("successful deletion"))
}

/// Serve the raw bytes of one image recorded on record `id`. Keys not
/// recorded on the record answer 404 even if the object exists.
pub(crate) async fn read_image<T: HasImages>(
    state: &AppState,
    repo: &Repository<T>,
    id: &str,
    key: &str,
) -> Result<Response, ApiError> {
    let record = repo.get_by_id(id).await?;
    let url = state.images.url(id, key);
    if !record.images().contains(&url) {
        return Err(ApiError::not_found("image not found"));
    }
    let raw = state
        .images
        .get_images(std::slice::from_ref(&url))
        .await?
        .pop()
        .ok_or_else(|| ApiError::not_found("image not found"))?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], raw).into_response())
}

/// Store the body as a new image of record `id` and record its URL.
/// The record is checked before the body is read.
pub(crate) async fn attach_image<T: HasImages>(
    state: &AppState,
    repo: &Repository<T>,
    principal: &Principal,
    id: &str,
    body: Body,
) -> Result<Json<&'static str>, ApiError> {
    repo.get_by_id(id).await?;
    let raw = read_body(state, body).await?;
    if raw.is_empty() {
        return Err(ApiError::bad_request("no image provided"));
    }
    let image = state.images.upload(id, raw).await?;
    repo.append_image(id, &state.images.url_for(id, &image)).await?;
    info!(kind = T::KIND, %id, key = %image.key, user = %principal.id, "image attached");
    Ok(Json("success"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_accepts_bare_and_slashed_mounts() {
        assert_eq!(resolve("/businesses"), Some((Resource::Businesses, "")));
        assert_eq!(resolve("/businesses/"), Some((Resource::Businesses, "")));
        assert_eq!(resolve("/clients/abc"), Some((Resource::Clients, "abc")));
        assert_eq!(resolve("/appointments/a/images"), Some((Resource::Appointments, "a/images")));
        assert_eq!(resolve("/businessesx"), None);
        assert_eq!(resolve("/other"), None);
    }

    #[test]
    fn dispatch_by_method_and_tail() {
        assert_eq!(dispatch(&Method::GET, ""), Dispatch::List);
        assert_eq!(dispatch(&Method::GET, "abc"), Dispatch::Get("abc".into()));
        assert_eq!(dispatch(&Method::GET, "abc/"), Dispatch::Get("abc".into()));
        assert_eq!(dispatch(&Method::GET, "abc/images/k1"), Dispatch::GetImage("abc".into(), "k1".into()));
        assert_eq!(dispatch(&Method::GET, "abc/images/k1/"), Dispatch::GetImage("abc".into(), "k1".into()));
        assert_eq!(dispatch(&Method::GET, "abc/images/k1/x"), Dispatch::Get("abc/images/k1/x".into()));
        assert_eq!(dispatch(&Method::POST, ""), Dispatch::Create);
        assert_eq!(dispatch(&Method::POST, "abc/images"), Dispatch::UploadImage("abc".into()));
        assert_eq!(dispatch(&Method::POST, "abc/images/"), Dispatch::UploadImage("abc".into()));
        assert_eq!(dispatch(&Method::DELETE, "abc"), Dispatch::Delete("abc".into()));
        assert_eq!(dispatch(&Method::PUT, "abc"), Dispatch::NotImplemented(Method::PUT));
    }

    #[test]
    fn not_implemented_names_the_method() {
        assert_eq!(not_implemented(&Method::PATCH).message, "PATCH not implemented yet");
    }
}
