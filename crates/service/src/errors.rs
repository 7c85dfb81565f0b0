use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("user already exists: {0}")]
    DuplicateUsername(String),
    #[error("{0}")]
    NotFound(String),
    #[error("invalid username or password")]
    AuthFailure,
    #[error("corrupt store: {0}")]
    CorruptStore(String),
    #[error("io failure: {0}")]
    Io(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("no free user id after {0} attempts")]
    IdExhausted(usize),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::DuplicateUsername(_) => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::AuthFailure => 1004,
            ServiceError::Hash(_) => 1101,
            ServiceError::IdExhausted(_) => 1102,
            ServiceError::CorruptStore(_) => 1200,
            ServiceError::Io(_) => 1201,
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(err: models::errors::ModelError) -> Self {
        match err {
            models::errors::ModelError::Validation(msg) => ServiceError::Validation(msg),
            models::errors::ModelError::Malformed(msg) => ServiceError::CorruptStore(msg),
        }
    }
}
