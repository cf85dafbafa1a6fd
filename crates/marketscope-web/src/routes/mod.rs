//! Route handlers.

pub mod analyze;
pub mod backend;
pub mod health;
pub mod home;
pub mod reports;

use axum::extract::OriginalUri;
use axum::http::StatusCode;

use crate::error::ApiError;

/// Fallback for paths no route matches.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Route not found", uri.to_string())
}
