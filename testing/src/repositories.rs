//! In-memory movie repositories.
//!
//! - [`InMemoryMovieRepository`]: insertion-ordered storage, also used by
//!   the server binary as its document store
//! - [`SpyMovieRepository`]: wraps another repository and counts calls
//! - [`FailingMovieRepository`]: every call fails

use fluxflix_core::movie::{Movie, MovieId};
use fluxflix_core::repository::{MovieRepository, RepositoryError, RepositoryFuture};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory movie store for fast, deterministic tests.
///
/// Movies are kept in insertion order; saving an existing id replaces the
/// record in place.
///
/// # Example
///
/// ```
/// use fluxflix_core::movie::{Movie, MovieId};
/// use fluxflix_core::repository::MovieRepository;
/// use fluxflix_testing::InMemoryMovieRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repository = InMemoryMovieRepository::new();
/// repository.save(Movie::new(MovieId::new("m1"), "Flux Gordon")).await?;
///
/// let movie = repository.find_by_id(&MovieId::new("m1")).await?;
/// assert!(movie.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryMovieRepository {
    movies: Arc<RwLock<Vec<Movie>>>,
}

impl InMemoryMovieRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `movies`.
    #[must_use]
    pub fn with_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        Self {
            movies: Arc::new(RwLock::new(movies.into_iter().collect())),
        }
    }

    /// Number of stored movies.
    pub async fn len(&self) -> usize {
        self.movies.read().await.len()
    }

    /// Whether the repository is empty.
    pub async fn is_empty(&self) -> bool {
        self.movies.read().await.is_empty()
    }
}

impl MovieRepository for InMemoryMovieRepository {
    fn find_all(&self) -> RepositoryFuture<'_, Vec<Movie>> {
        Box::pin(async move { Ok(self.movies.read().await.clone()) })
    }

    fn find_by_id<'a>(&'a self, id: &'a MovieId) -> RepositoryFuture<'a, Option<Movie>> {
        Box::pin(async move {
            Ok(self
                .movies
                .read()
                .await
                .iter()
                .find(|movie| &movie.id == id)
                .cloned())
        })
    }

    fn save(&self, movie: Movie) -> RepositoryFuture<'_, Movie> {
        Box::pin(async move {
            let mut movies = self.movies.write().await;
            match movies.iter_mut().find(|existing| existing.id == movie.id) {
                Some(existing) => existing.clone_from(&movie),
                None => movies.push(movie.clone()),
            }
            Ok(movie)
        })
    }

    fn delete_all(&self) -> RepositoryFuture<'_, ()> {
        Box::pin(async move {
            self.movies.write().await.clear();
            Ok(())
        })
    }
}

/// Counts every call before delegating to an inner repository.
///
/// Lets tests assert that a code path never touched the store.
#[derive(Clone)]
pub struct SpyMovieRepository {
    inner: Arc<dyn MovieRepository>,
    calls: Arc<AtomicUsize>,
}

impl SpyMovieRepository {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn MovieRepository>) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Total calls across all methods and clones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl MovieRepository for SpyMovieRepository {
    fn find_all(&self) -> RepositoryFuture<'_, Vec<Movie>> {
        self.record();
        self.inner.find_all()
    }

    fn find_by_id<'a>(&'a self, id: &'a MovieId) -> RepositoryFuture<'a, Option<Movie>> {
        self.record();
        self.inner.find_by_id(id)
    }

    fn save(&self, movie: Movie) -> RepositoryFuture<'_, Movie> {
        self.record();
        self.inner.save(movie)
    }

    fn delete_all(&self) -> RepositoryFuture<'_, ()> {
        self.record();
        self.inner.delete_all()
    }
}

/// Repository whose every operation fails with the same error.
#[derive(Clone, Debug)]
pub struct FailingMovieRepository {
    error: RepositoryError,
}

impl FailingMovieRepository {
    /// Fail with `error`.
    #[must_use]
    pub const fn new(error: RepositoryError) -> Self {
        Self { error }
    }

    /// Fail with `RepositoryError::Unavailable`.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn fail<T: Send + 'static>(&self) -> RepositoryFuture<'_, T> {
        let error = self.error.clone();
        Box::pin(async move { Err(error) })
    }
}

impl MovieRepository for FailingMovieRepository {
    fn find_all(&self) -> RepositoryFuture<'_, Vec<Movie>> {
        self.fail()
    }

    fn find_by_id<'a>(&'a self, _id: &'a MovieId) -> RepositoryFuture<'a, Option<Movie>> {
        self.fail()
    }

    fn save(&self, _movie: Movie) -> RepositoryFuture<'_, Movie> {
        self.fail()
    }

    fn delete_all(&self) -> RepositoryFuture<'_, ()> {
        self.fail()
    }
}
