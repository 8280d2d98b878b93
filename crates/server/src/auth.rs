//! Bearer credential gate in front of every mutating handler.
//!
//! Handlers never look the caller up themselves: the router authenticates
//! first and passes the resulting [`Principal`] as an argument.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{DateTime, Utc};
use service::identity::IdentityVerifier;
use thiserror::Error;
use tracing::{debug, warn};

use crate::state::AppState;

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("email not verified")]
    EmailNotVerified,
}

fn credential(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    (!token.is_empty()).then_some(token)
}

pub async fn authenticate_at(
    verifier: &dyn IdentityVerifier,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Result<Principal, AuthError> {
    let Some(token) = credential(headers) else {
        debug!("missing authorization header");
        return Err(AuthError::InvalidCredentials);
    };
    let verified = verifier.verify(token).await.map_err(|e| {
        warn!(error = %e, "credential rejected");
        AuthError::InvalidCredentials
    })?;
    if verified.expires_at <= now.timestamp() {
        return Err(AuthError::TokenExpired);
    }
    if !verified.email_verified {
        return Err(AuthError::EmailNotVerified);
    }
    Ok(Principal { id: verified.subject })
}

pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, AuthError> {
    authenticate_at(state.verifier.as_ref(), headers, Utc::now()).await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use service::identity::{mock::StaticVerifier, VerifiedToken};

    use super::*;

    fn verifier() -> StaticVerifier {
        let token = |expires_at, email_verified| VerifiedToken { subject: "u1".into(), expires_at, email_verified };
        StaticVerifier::new()
            .with_token("good", token(2_000, true))
            .with_token("old", token(1_000, true))
            .with_token("unverified", token(2_000, false))
    }

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[tokio::test]
    async fn accepts_raw_and_bearer_credentials() {
        let v = verifier();
        let expected = Ok(Principal { id: "u1".into() });
        assert_eq!(authenticate_at(&v, &headers("good"), at(1_500)).await, expected);
        assert_eq!(authenticate_at(&v, &headers("Bearer good"), at(1_500)).await, expected);
    }

    #[tokio::test]
    async fn missing_or_unknown_credential_is_invalid() {
        let v = verifier();
        assert_eq!(authenticate_at(&v, &HeaderMap::new(), at(0)).await, Err(AuthError::InvalidCredentials));
        assert_eq!(authenticate_at(&v, &headers("Bearer "), at(0)).await, Err(AuthError::InvalidCredentials));
        assert_eq!(authenticate_at(&v, &headers("nope"), at(0)).await, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn expiry_is_checked_before_email() {
        let v = verifier();
        assert_eq!(authenticate_at(&v, &headers("old"), at(1_500)).await, Err(AuthError::TokenExpired));
        // expiring exactly now counts as expired
        assert_eq!(authenticate_at(&v, &headers("good"), at(2_000)).await, Err(AuthError::TokenExpired));
        assert_eq!(authenticate_at(&v, &headers("unverified"), at(3_000)).await, Err(AuthError::TokenExpired));
        assert_eq!(authenticate_at(&v, &headers("unverified"), at(1_500)).await, Err(AuthError::EmailNotVerified));
    }
}
