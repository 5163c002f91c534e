//! # Identity Middleware
//!
//! Resolves the bearer token into the current user. Resolution never rejects
//! a request: handlers receive the identity explicitly as a
//! [`MaybeAuthUser`] and decide for themselves what an anonymous caller may
//! do.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, trace, warn};

use crate::models::AppState;
use crate::services::jwt::{Claims, JwtService};
use crate::utils::validator::is_safe_path_segment;

/// Identity middleware.
///
/// # Flow
///
/// 1. Extracts `Authorization` header with `Bearer <token>` format
/// 2. Validates the JWT token signature and expiration
/// 3. Checks the subject is usable as a user id
/// 4. Adds [`AuthUser`] to request extensions for handler access
///
/// Any failure leaves the extensions untouched and the request continues.
#[instrument(
    skip_all,
    fields(
        method = %req.method(),
        uri = %req.uri(),
    )
)]
pub async fn identity_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    trace!("Resolving request identity");

    if let Some(user) = resolve_identity(&state.jwt_service, req.headers()) {
        debug!(user_id = %user.user_id, "Identity resolved");
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}

fn resolve_identity(jwt_service: &JwtService, headers: &HeaderMap) -> Option<AuthUser> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())?;

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        warn!("Invalid Authorization header format");
        return None;
    };

    let claims = jwt_service
        .validate_access_token(token)
        .inspect_err(|e| warn!(error = %e, "Token validation failed"))
        .ok()?;

    if !is_safe_path_segment(&claims.sub) {
        warn!("Token subject is not a valid user id");
        return None;
    }

    Some(AuthUser {
        user_id: claims.sub.clone(),
        claims,
    })
}

/// Authenticated user information available to handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Opaque user identifier, safe to use as a path segment
    pub user_id: String,
    /// JWT claims containing additional token metadata
    pub claims: Claims,
}

/// The current user, if the request carried a valid identity.
///
/// ```rust
/// use axum::response::IntoResponse;
/// use forum_images::middleware::MaybeAuthUser;
/// async fn handler(MaybeAuthUser(user): MaybeAuthUser) -> impl IntoResponse {
///     match user {
///         Some(user) => format!("Hello user: {}", user.user_id),
///         None => "Hello stranger".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<AuthUser>().cloned()))
    }
}
