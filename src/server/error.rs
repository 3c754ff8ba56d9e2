//! API error taxonomy.
//!
//! Client mistakes (unknown tenant, malformed filter) get 4xx responses;
//! database-side failures stay 5xx. Everything renders as `{"error": msg}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Producto no válido: {0}")]
    InvalidTenant(String),

    #[error("Filtro no válido: {0}")]
    InvalidFilter(String),

    #[error("Error de conexión: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Error de consulta: {0}")]
    Query(#[source] sqlx::Error),
}

/// Failures that mean the cached pool is no good anymore; the handler
/// invalidates the tenant slot so the next request reconnects.
pub fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidTenant(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            ApiError::Connection(_) | ApiError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_distinguish_client_from_server_errors() {
        let cases = [
            (
                ApiError::InvalidTenant("x".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::InvalidFilter("fecha".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Query(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn connection_classification() {
        assert!(is_connection_error(&sqlx::Error::PoolTimedOut));
        assert!(is_connection_error(&sqlx::Error::PoolClosed));
        assert!(!is_connection_error(&sqlx::Error::RowNotFound));
    }
}
