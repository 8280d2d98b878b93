use thiserror::Error;

/// Failures reported by a [`DocumentStore`](crate::store::DocumentStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Failures reported by a [`Repository`](crate::repository::Repository).
///
/// Only reads produce `NotFound`; deletes are idempotent.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("store error: {0}")]
    Store(String),
}

impl RepoError {
    pub fn from_store(kind: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound(kind),
            StoreError::Backend(msg) => Self::Store(msg),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
