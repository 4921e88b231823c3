//! Error types for web handlers.
//!
//! This module bridges catalog and auth errors into HTTP responses by
//! implementing Axum's `IntoResponse` trait.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fluxflix_auth::AuthError;
use fluxflix_runtime::CatalogError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Every error body is JSON `{"code": ..., "message": ...}`. Server errors
/// are logged together with their source, which is never sent to clients.
///
/// # Examples
///
/// ```ignore
/// async fn handler(Path(id): Path<MovieId>) -> Result<Json<Movie>, AppError> {
///     let movie = catalog.by_id(&id).await?
///         .ok_or_else(|| AppError::not_found("Movie", &id))?;
///     Ok(Json(movie))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            message.into(),
            "FORBIDDEN".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Not-found maps to 404; store failures are opaque 500s.
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => Self::not_found("Movie", id),
            CatalogError::Store(source) => Self::internal("An internal error occurred")
                .with_source(anyhow::Error::new(source)),
        }
    }
}

/// Missing or bad credentials map to 401, a missing role to 403.
impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if err.is_unauthenticated() {
            Self::unauthorized("Authentication required")
        } else {
            Self::forbidden("Access denied")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fluxflix_core::movie::MovieId;
    use fluxflix_core::repository::RepositoryError;

    #[test]
    fn test_error_display() {
        let err = AppError::unauthorized("Authentication required");
        assert_eq!(err.to_string(), "[UNAUTHORIZED] Authentication required");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::from(CatalogError::NotFound(MovieId::new("m404")));
        assert_eq!(err.to_string(), "[NOT_FOUND] Movie with id m404 not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_errors_hide_their_message() {
        let err = AppError::from(CatalogError::Store(RepositoryError::Backend(
            "secret dsn".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("secret"));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<RepositoryError>().is_some());
    }

    #[test]
    fn auth_errors_split_into_401_and_403() {
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        let forbidden = AppError::from(AuthError::InsufficientPermissions {
            required: "stream".to_string(),
        });
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.code(), "FORBIDDEN");
    }
}
