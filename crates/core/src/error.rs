//! Error taxonomy for the patient-records domain.
//!
//! Every service operation either completes its full contract or returns one
//! of these variants; nothing is swallowed. The HTTP layer maps each kind to
//! a status code (validation 400, forbidden 403, not-found 404, conflict 409,
//! everything else 500).

#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("caller is not the creator of this patient")]
    Forbidden,
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to encode messages payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RecordsError {
    /// A field-level validation failure, pinpointing the offending field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

pub type RecordsResult<T> = std::result::Result<T, RecordsError>;
