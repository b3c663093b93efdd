use spectrum_types::FieldError;

/// Errors produced by the core services.
///
/// `Validation` and `NotFound` carry enough structure for the REST layer to
/// build field- or resource-scoped error bodies without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A submitted field failed a format, length, or referential check.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    /// A requested resource does not exist.
    #[error("{resource} not found (ID: {id})")]
    NotFound { resource: &'static str, id: String },
    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// A stored value could not be decoded (bad UUID or timestamp text).
    #[error("corrupt value in column {column}: {value}")]
    Corrupt {
        column: &'static str,
        value: String,
    },
}

impl From<FieldError> for ServiceError {
    fn from(err: FieldError) -> Self {
        ServiceError::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
