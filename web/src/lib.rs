//! HTTP gateway for the Fluxflix catalog.
//!
//! Every request passes the gateway before any handler runs:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ TraceLayer            request span           │
//! │ CorrelationIdLayer    X-Correlation-ID       │
//! │ authorize_request     Basic auth + role      │ ─ deny ─> 401 / 403
//! ├──────────────────────────────────────────────┤
//! │ handlers              JSON / SSE             │
//! │   └─ CatalogService   repository, generator  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use fluxflix_auth::{AuthorizationEngine, UserDirectory};
//! use fluxflix_core::environment::SystemClock;
//! use fluxflix_core::repository::MovieRepository;
//! use fluxflix_runtime::{CatalogService, EventStreamGenerator, generator::DEFAULT_INTERVAL};
//! use fluxflix_web::{AppState, router};
//! use std::sync::Arc;
//!
//! # async fn example(repository: Arc<dyn MovieRepository>) -> Result<(), Box<dyn std::error::Error>> {
//! let generator = EventStreamGenerator::new(DEFAULT_INTERVAL, Arc::new(SystemClock));
//! let state = AppState::new(
//!     CatalogService::new(repository, generator),
//!     AuthorizationEngine::default(),
//!     UserDirectory::demo(),
//! );
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::AppError;
pub use extractors::{AuthenticatedPrincipal, CorrelationId};
pub use middleware::{
    CORRELATION_ID_HEADER, GatewayOutcome, authorize_request,
    correlation_id_layer,
};
pub use router::{ROUTES, RouteEntry, RouteKind, router};
pub use state::AppState;
