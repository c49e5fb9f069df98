use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use snip_codec::CodecError;
use snip_store::StoreError;

/// Errors surfaced to API callers, mapped to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("missing ?key parameter")]
    MissingKey,

    #[error("invalid edit key")]
    Forbidden,

    #[error("paste not found")]
    NotFound,

    #[error("content blocked by secret scanner:\n{0}")]
    SecretsBlocked(String),

    /// Internal failures (corrupt version payloads and the like). Details
    /// are logged, never sent to the caller.
    #[error("internal error")]
    Internal,
}

impl ApiError {
    /// A stored payload failed to decode: log it, hide the detail.
    pub(crate) fn corrupt(err: CodecError) -> Self {
        tracing::error!(error = %err, "corrupt version payload");
        Self::Internal
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingKey => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::SecretsBlocked(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyContent | StoreError::InvalidTtl(_) => {
                ApiError::BadRequest(err.to_string())
            }
            StoreError::NotFound => ApiError::NotFound,
            StoreError::CorruptVersion(codec) => ApiError::corrupt(codec),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Errors from running the server itself.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;
