use thiserror::Error;

/// Validation failures raised while turning a request body into a new record.
///
/// The display strings are returned to API callers verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("invalid category")]
    InvalidCategory,
    #[error("date invalid")]
    InvalidDate,
}
