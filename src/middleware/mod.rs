//! # Middleware Components
//!
//! Cross-cutting request processing. Currently only identity resolution.

pub mod auth;

pub use auth::{AuthUser, MaybeAuthUser, identity_middleware};
