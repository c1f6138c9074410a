//! Error types for larder

use hyper::StatusCode;

/// Main error type for catalog operations
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request payload failed schema validation. Carries every missing or
    /// invalid field, not just the first.
    #[error("request is missing required fields: {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    #[error("invalid request: {0}")]
    BadRequest(String),

    /// Owner reference does not resolve to a registered user.
    #[error("Invalid owner ID: {0}.")]
    InvalidOwner(String),

    /// Authentication failure. The message is a static so the two login
    /// failure modes (unknown handle, wrong password) render identically.
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Unauthorized to access that resource.")]
    Forbidden,

    #[error("Requested resource not found.")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    /// Underlying store failure. The detail is for logs only; responses
    /// collapse it to a generic message.
    #[error("store error: {0}")]
    Store(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidOwner(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Store(err.to_string())
    }
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, ApiError>;
