//! Movie repository trait.
//!
//! The repository is the document store the catalog reads from. The core
//! never writes to it; `save` and `delete_all` exist for seeding and future
//! write paths.
//!
//! # Implementations
//!
//! - `InMemoryMovieRepository` (in `fluxflix-testing`): fast, deterministic,
//!   also used by the server binary
//! - `SpyMovieRepository` / `FailingMovieRepository` (in `fluxflix-testing`):
//!   test doubles
//!
//! # Example
//!
//! ```no_run
//! use fluxflix_core::movie::MovieId;
//! use fluxflix_core::repository::{MovieRepository, RepositoryError};
//!
//! async fn example(repo: &dyn MovieRepository) -> Result<(), RepositoryError> {
//!     let all = repo.find_all().await?;
//!     let one = repo.find_by_id(&MovieId::new("m1")).await?;
//!     println!("{} movies, m1 present: {}", all.len(), one.is_some());
//!     Ok(())
//! }
//! ```

use crate::movie::{Movie, MovieId};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by repository operations.
pub type RepositoryFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

/// Errors raised by a repository backend.
///
/// Not-found is not an error: `find_by_id` returns `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backend could not be reached.
    #[error("Repository unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected or failed the operation.
    #[error("Repository backend error: {0}")]
    Backend(String),
}

/// Asynchronous CRUD access to the movie collection.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the catalog shares a single
/// instance across all concurrent requests.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures so the repository can be held as
/// `Arc<dyn MovieRepository>`.
pub trait MovieRepository: Send + Sync {
    /// Load every movie, in backend-defined order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn find_all(&self) -> RepositoryFuture<'_, Vec<Movie>>;

    /// Load one movie by id. `Ok(None)` when no record matches.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn find_by_id<'a>(&'a self, id: &'a MovieId) -> RepositoryFuture<'a, Option<Movie>>;

    /// Insert or replace a movie, returning the stored record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn save(&self, movie: Movie) -> RepositoryFuture<'_, Movie>;

    /// Remove every movie.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn delete_all(&self) -> RepositoryFuture<'_, ()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_error_display() {
        let error = RepositoryError::Unavailable("connection refused".to_string());
        assert_eq!(error.to_string(), "Repository unavailable: connection refused");
    }

    #[test]
    fn backend_error_display() {
        let error = RepositoryError::Backend("write conflict".to_string());
        assert!(error.to_string().contains("write conflict"));
    }
}
