//! # Health Check Handler
//!
//! Liveness probe for load balancers and the test harness.

use axum::http::StatusCode;
use tracing::{debug, instrument};

/// Always returns `200 OK` with an empty body. Touches neither the database
/// nor the file system.
#[instrument]
pub async fn health_check() -> StatusCode {
    debug!("Health check endpoint accessed");
    StatusCode::OK
}
