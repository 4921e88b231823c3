//! Catalog service.
//!
//! Thin read façade over the movie repository plus the event stream
//! generator. Repository failures pass through unchanged; a missing movie is
//! `Ok(None)` for lookups and [`CatalogError::NotFound`] for streams.

use crate::generator::{EventStreamGenerator, MovieEventStream};
use crate::metrics::CatalogMetrics;
use fluxflix_core::movie::{Movie, MovieId};
use fluxflix_core::repository::{MovieRepository, RepositoryError};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Errors from catalog operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No movie has this id.
    #[error("Movie not found: {0}")]
    NotFound(MovieId),

    /// The repository failed; the message is the repository's own.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Serves list, lookup, and event-stream reads.
///
/// Cloning is cheap (shared repository, stateless generator).
#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn MovieRepository>,
    generator: EventStreamGenerator,
}

impl CatalogService {
    /// Create a service over `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn MovieRepository>, generator: EventStreamGenerator) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// The generator used for event streams.
    #[must_use]
    pub const fn generator(&self) -> &EventStreamGenerator {
        &self.generator
    }

    /// Every movie, in repository order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if the repository fails.
    #[tracing::instrument(skip(self), name = "catalog_all")]
    pub async fn all(&self) -> Result<Vec<Movie>, CatalogError> {
        let started = Instant::now();
        let result = self.repository.find_all().await;
        Self::observe("all", started, result.is_ok());

        let movies = result?;
        tracing::debug!(count = movies.len(), "Loaded movies");
        Ok(movies)
    }

    /// The movie with `id`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if the repository fails.
    #[tracing::instrument(skip(self, id), fields(movie_id = %id), name = "catalog_by_id")]
    pub async fn by_id(&self, id: &MovieId) -> Result<Option<Movie>, CatalogError> {
        let started = Instant::now();
        let result = self.repository.find_by_id(id).await;
        Self::observe("by_id", started, result.is_ok());
        Ok(result?)
    }

    /// Open an event stream for the movie with `id`.
    ///
    /// The movie is read once; the stream carries that snapshot for its
    /// whole life. No producer is started when the movie does not exist.
    ///
    /// # Errors
    ///
    /// - `CatalogError::NotFound` if no movie has this id
    /// - `CatalogError::Store` if the repository fails
    #[tracing::instrument(skip(self, id), fields(movie_id = %id), name = "catalog_stream_events")]
    pub async fn stream_events(&self, id: &MovieId) -> Result<MovieEventStream, CatalogError> {
        let movie = self
            .by_id(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        tracing::info!(movie_id = %movie.id, title = %movie.title, "Starting event stream");
        Ok(self.generator.generate(movie))
    }

    fn observe(operation: &'static str, started: Instant, ok: bool) {
        CatalogMetrics::record_request(operation, started.elapsed());
        if !ok {
            CatalogMetrics::record_error(operation);
        }
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_their_message() {
        let err = CatalogError::from(RepositoryError::Unavailable("down".to_string()));
        assert_eq!(err.to_string(), "Repository unavailable: down");
    }

    #[test]
    fn not_found_display() {
        let err = CatalogError::NotFound(MovieId::new("m404"));
        assert_eq!(err.to_string(), "Movie not found: m404");
    }
}
