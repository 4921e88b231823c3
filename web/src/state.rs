//! Application state for Axum handlers.

use fluxflix_auth::{AuthorizationEngine, UserDirectory};
use fluxflix_runtime::CatalogService;
use std::sync::Arc;

/// State shared by the gateway middleware and every handler.
///
/// Cheap to clone: the catalog is reference-counted internally and the
/// directory and engine are read-only for the life of the process.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Catalog reads and event streams.
    pub catalog: CatalogService,
    /// Path-to-role rules.
    pub engine: Arc<AuthorizationEngine>,
    /// Known users.
    pub directory: Arc<UserDirectory>,
}

impl AppState {
    /// Create application state.
    #[must_use]
    pub fn new(
        catalog: CatalogService,
        engine: AuthorizationEngine,
        directory: UserDirectory,
    ) -> Self {
        Self {
            catalog,
            engine: Arc::new(engine),
            directory: Arc::new(directory),
        }
    }
}
