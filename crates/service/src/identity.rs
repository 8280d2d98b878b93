//! Identity verifier boundary for bearer credentials.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Claims extracted from a verified credential. Expiry is reported, not
/// enforced; the caller compares it to its own clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    /// Unix seconds.
    pub expires_at: i64,
    pub email_verified: bool,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("malformed credential: {0}")]
    Malformed(String),
    #[error("unknown credential")]
    Unknown,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<VerifiedToken, VerifyError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    #[serde(default)]
    email_verified: bool,
}

/// HS256 JWT verifier with a shared secret.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedToken, VerifyError> {
        let data = decode::<Claims>(credential, &self.key, &self.validation).map_err(|e| {
            debug!(err = %e, "jwt rejected");
            VerifyError::Malformed(e.to_string())
        })?;
        let Claims { sub, exp, email_verified } = data.claims;
        Ok(VerifiedToken { subject: sub, expires_at: exp, email_verified })
    }
}

pub mod mock {
    use std::collections::HashMap;

    use super::*;

    /// Fixed credential table for tests and local runs.
    #[derive(Default, Clone)]
    pub struct StaticVerifier {
        tokens: HashMap<String, VerifiedToken>,
    }

    impl StaticVerifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_token(mut self, credential: impl Into<String>, token: VerifiedToken) -> Self {
            self.tokens.insert(credential.into(), token);
            self
        }
    }

    #[async_trait]
    impl IdentityVerifier for StaticVerifier {
        async fn verify(&self, credential: &str) -> Result<VerifiedToken, VerifyError> {
            self.tokens.get(credential).cloned().ok_or(VerifyError::Unknown)
        }
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    use super::*;

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[tokio::test]
    async fn jwt_yields_claims_without_checking_expiry() -> Result<(), anyhow::Error> {
        let verifier = JwtVerifier::new("s3cret");
        let token = sign(json!({"sub": "u1", "exp": 10, "email_verified": true}), "s3cret");
        let got = verifier.verify(&token).await?;
        assert_eq!(got, VerifiedToken { subject: "u1".into(), expires_at: 10, email_verified: true });
        Ok(())
    }

    #[tokio::test]
    async fn email_verified_defaults_to_false() -> Result<(), anyhow::Error> {
        let verifier = JwtVerifier::new("s3cret");
        let token = sign(json!({"sub": "u1", "exp": 4_000_000_000i64}), "s3cret");
        assert!(!verifier.verify(&token).await?.email_verified);
        Ok(())
    }

    #[tokio::test]
    async fn jwt_rejects_wrong_secret_and_garbage() {
        let verifier = JwtVerifier::new("s3cret");
        let token = sign(json!({"sub": "u1", "exp": 4_000_000_000i64}), "other");
        assert!(matches!(verifier.verify(&token).await, Err(VerifyError::Malformed(_))));
        assert!(verifier.verify("not-a-jwt").await.is_err());
    }

    #[tokio::test]
    async fn jwt_requires_subject() {
        let verifier = JwtVerifier::new("s3cret");
        let token = sign(json!({"exp": 4_000_000_000i64}), "s3cret");
        assert!(verifier.verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn static_verifier_knows_only_its_table() {
        let token = VerifiedToken { subject: "u".into(), expires_at: 1, email_verified: true };
        let verifier = mock::StaticVerifier::new().with_token("good", token.clone());
        assert_eq!(verifier.verify("good").await.ok(), Some(token));
        assert!(matches!(verifier.verify("bad").await, Err(VerifyError::Unknown)));
    }
}
