//! Shared plumbing for the JSON API: error mapping and blocking database access.

use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use lunchly_db::DbPool;
use lunchly_models::ModelError;
use rusqlite::Connection;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// `status() == Some(404)` → 404, constraint violations → 400, everything
/// else → 500 (logged).
impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        if e.status() == Some(404) {
            return ApiError::NotFound(e.to_string());
        }
        if e.is_constraint_violation() {
            return ApiError::BadRequest(e.to_string());
        }
        tracing::error!(error = %e, "database operation failed");
        ApiError::InternalServerError(e.to_string())
    }
}

/// A numeric `{id}` path segment.
///
/// Unlike a bare `Path<i64>`, a malformed id is rejected with the same JSON
/// error body as every other 400.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(IdPath(id))
    }
}

/// Runs `f` on the blocking thread pool with a connection checked out of
/// `pool`. The connection goes back to the pool when `f` returns.
pub(crate) async fn with_conn<T, F>(pool: &DbPool, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection");
            ApiError::InternalServerError(format!("db connection failed: {}", e))
        })?;
        f(&*conn)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "database task join error");
        ApiError::InternalServerError(format!("task join error: {}", e))
    })?
}
