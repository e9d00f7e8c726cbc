//! Application error type shared by every handler, service, and store.
//!
//! Each variant maps to one HTTP status. Internal errors keep their cause
//! for logging but the response body only ever carries an opaque message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// No identity proof, or the token is invalid/expired.
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated, but the caller's role does not permit the operation.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// An editor-request transition was attempted from the wrong state.
    #[error("{0}")]
    InvalidTransition(String),

    /// The single-Admin invariant would be violated by the write.
    #[error("Only one Admin account is allowed")]
    AdminAlreadyExists,

    /// Unique-key collision on username or email.
    #[error("{0} already exists")]
    DuplicateKey(String),

    /// Field-level validation failure.
    #[error("{0}")]
    Validation(String),

    /// Unexpected failure. The cause is logged, never sent to the client.
    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            AppError::AdminAlreadyExists => StatusCode::CONFLICT,
            AppError::DuplicateKey(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        AppError::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(ref cause) = self {
            tracing::error!(error = %cause, "Unhandled internal error");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (self.status(), body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.into())
    }
}
