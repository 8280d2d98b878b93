use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::ModelError;
use service::{errors::RepoError, images::ImageError};
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;

/// Failure answered to the caller as `{"error": "<message>"}`.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_IMPLEMENTED, message)
    }

    /// The cause is logged here and never sent to the caller.
    pub fn internal(cause: impl Display) -> Self {
        error!(error = %cause, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "something went wrong")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(_) => Self::not_found(e.to_string()),
            RepoError::Store(_) => Self::internal(e),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<ImageError> for ApiError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::NotFound(_) => Self::not_found("image not found"),
            ImageError::ForeignUrl(_) | ImageError::Store(_) => Self::internal(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage unavailable: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_errors_map_by_variant() {
        let nf = ApiError::from(RepoError::NotFound("client"));
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "client not found");

        let store = ApiError::from(RepoError::Store("disk on fire".into()));
        assert_eq!(store.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.message, "something went wrong");
    }

    #[test]
    fn validation_and_auth_errors_keep_their_message() {
        let bad = ApiError::from(ModelError::InvalidCategory);
        assert_eq!((bad.status, bad.message.as_str()), (StatusCode::BAD_REQUEST, "invalid category"));

        let unauth = ApiError::from(AuthError::TokenExpired);
        assert_eq!((unauth.status, unauth.message.as_str()), (StatusCode::UNAUTHORIZED, "token expired"));
    }

    #[test]
    fn missing_image_is_404_other_image_errors_500() {
        let nf = ApiError::from(ImageError::NotFound("c1/k".into()));
        assert_eq!((nf.status, nf.message.as_str()), (StatusCode::NOT_FOUND, "image not found"));

        let foreign = ApiError::from(ImageError::ForeignUrl("other/c1/k".into()));
        assert_eq!(foreign.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
