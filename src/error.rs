//! # Centralized Error Handling
//!
//! Every handler and pipeline step returns [`AppError`]. The enum maps each
//! failure class onto its HTTP status and a JSON body of the form
//! `{"message": "..."}`. Client faults carry an actionable message; storage
//! and database faults carry a generic one, with the cause logged here or at
//! the point of creation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Central application error type.
///
/// _Db errors are logged automatically, while storage errors should be logged
/// where they are created, since only that site knows the underlying cause._
#[derive(Error, Debug)]
pub enum AppError {
    #[error("database error")]
    Db(#[from] sqlx::Error),

    #[error("bad request: {0}")]
    BadRequest(&'static str),

    /// The accepted bytes did not parse as the declared format.
    #[error("decode error: {0}")]
    Decode(&'static str),

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("method not allowed")]
    MethodNotAllowed,

    /// Directory, file or encoder failure.
    #[error("storage error: {0}")]
    Storage(&'static str),

    #[error("internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    message: &'static str,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Db(_) | AppError::Storage(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::BadRequest(_) | AppError::Decode(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Db(e) = &self {
            error!(?e, "Database error occurred");
        }

        let status = self.status();
        let message = match self {
            AppError::Db(_) => "Database error",
            AppError::BadRequest(msg)
            | AppError::Decode(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Storage(msg) => msg,
            AppError::MethodNotAllowed => "Method not allowed",
            AppError::Internal => "Internal server error",
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Convenience Result type alias that uses AppError as the error type.
pub type AppResult<T> = Result<T, AppError>;
