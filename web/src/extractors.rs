//! Custom Axum extractors.
//!
//! - `CorrelationId`: the request's correlation ID
//! - `AuthenticatedPrincipal`: the principal the gateway authorized
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(
//!     correlation_id: CorrelationId,
//!     AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
//! ) -> String {
//!     format!("{} ({})", principal.username, correlation_id.0)
//! }
//! ```

use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use fluxflix_core::principal::Principal;
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Read from the request extensions set by the correlation ID layer,
/// falling back to the `X-Correlation-ID` header, or a fresh UUID v4.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Uuid>() {
            return Ok(Self(*id));
        }

        let correlation_id = parts
            .headers
            .get(crate::middleware::CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// The principal admitted by the gateway.
///
/// Rejects with `401` when the request did not pass through
/// [`authorize_request`](crate::middleware::authorize_request).
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}
