use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::mail::MailError;
use crate::store::StoreError;

/// Request-level failure. Handlers bubble these up with `?`; the
/// `IntoResponse` impl decides what the client sees. Anything unexpected
/// collapses to a plain 500 with the detail kept server-side.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed user input.
    #[error("{0}")]
    Validation(String),

    /// A unique field already holds this value; the message is user-visible.
    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) | AppError::Duplicate(msg) => {
                (StatusCode::BAD_REQUEST, msg).into_response()
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::Store(e) => {
                tracing::error!(error = %e, "datastore failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            AppError::Mail(e) => {
                tracing::error!(error = %e, "mail failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "unexpected failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
