use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use treasury_core::TreasuryError;
use treasury_platform::MessageResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    /// Duplicate submission. Answered with 400, not 409, for client
    /// compatibility.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(MessageResponse::new(self.to_string()))).into_response()
    }
}

/// Maps a domain error onto the HTTP taxonomy. Storage failures are logged
/// and replaced by `public_message` so nothing internal leaks to callers.
pub fn treasury_error(public_message: &'static str) -> impl Fn(TreasuryError) -> ApiError {
    move |err| match err {
        TreasuryError::Validation(message) => ApiError::Validation(message),
        TreasuryError::Conflict(message) => ApiError::Conflict(message),
        TreasuryError::Store(source) => {
            error!(error = %source, "{public_message}");
            ApiError::Internal(public_message.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
