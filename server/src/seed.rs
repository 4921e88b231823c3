//! Startup data seeding.

use fluxflix_core::movie::Movie;
use fluxflix_core::repository::{MovieRepository, RepositoryError};

/// Titles written by [`seed_movies`], in order.
pub const SEED_TITLES: [&str; 4] = [
    "Flux Gordon",
    "Enter the Mono<Void>",
    "Back to the Future",
    "AEon Flux",
];

/// Replace the catalog with the demo movies, each under a fresh id.
///
/// # Errors
///
/// Returns the first repository error; earlier writes are not undone.
pub async fn seed_movies(repository: &dyn MovieRepository) -> Result<Vec<Movie>, RepositoryError> {
    repository.delete_all().await?;

    let mut saved = Vec::with_capacity(SEED_TITLES.len());
    for title in SEED_TITLES {
        let movie = repository.save(Movie::with_generated_id(title)).await?;
        tracing::info!(id = %movie.id, title = %movie.title, "Seeded movie");
        saved.push(movie);
    }
    Ok(saved)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fluxflix_core::movie::MovieId;
    use fluxflix_testing::{FailingMovieRepository, InMemoryMovieRepository};
    use std::collections::HashSet;

    #[tokio::test]
    async fn replaces_existing_movies() {
        let repository = InMemoryMovieRepository::with_movies([Movie::new(
            MovieId::new("stale"),
            "Stale",
        )]);

        let saved = seed_movies(&repository).await.unwrap();

        let stored = repository.find_all().await.unwrap();
        assert_eq!(stored, saved);
        let titles: Vec<_> = stored.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, SEED_TITLES);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let repository = InMemoryMovieRepository::new();
        let saved = seed_movies(&repository).await.unwrap();
        let ids: HashSet<_> = saved.iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids.len(), SEED_TITLES.len());
    }

    #[tokio::test]
    async fn stops_on_store_failure() {
        assert!(seed_movies(&FailingMovieRepository::unavailable()).await.is_err());
    }
}
