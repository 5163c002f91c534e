use tracing::warn;

use crate::error::AppError;

/// Answers requests that hit a known path with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    warn!("Method not allowed");
    AppError::MethodNotAllowed
}
