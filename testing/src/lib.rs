//! # Fluxflix Testing
//!
//! Testing utilities for the Fluxflix catalog.
//!
//! This crate provides:
//! - Deterministic and observable clocks
//! - In-memory, spying, and failing movie repositories
//! - Fixtures and proptest strategies for domain types
//!
//! ## Example
//!
//! ```ignore
//! use fluxflix_testing::{InMemoryMovieRepository, fixtures};
//!
//! #[tokio::test]
//! async fn test_lookup() {
//!     let repository = fixtures::seeded_repository();
//!     let movie = repository.find_by_id(&fixtures::flux_gordon().id).await.unwrap();
//!     assert!(movie.is_some());
//! }
//! ```

pub mod repositories;

pub use mocks::{CountingClock, FixedClock, TokioClock, test_clock};
pub use repositories::{FailingMovieRepository, InMemoryMovieRepository, SpyMovieRepository};

/// Mock implementations of Environment traits
pub mod mocks {
    use chrono::{DateTime, Utc};
    use fluxflix_core::environment::Clock;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use fluxflix_testing::mocks::FixedClock;
    /// use fluxflix_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }

    /// Clock that follows Tokio's (pausable) time.
    ///
    /// Returns `base + (tokio::time::Instant::now() - start)`, so with
    /// `#[tokio::test(start_paused = true)]` timestamps advance exactly as
    /// the runtime's virtual time does.
    #[derive(Debug, Clone)]
    pub struct TokioClock {
        base: DateTime<Utc>,
        start: tokio::time::Instant,
    }

    impl TokioClock {
        /// Start at 2025-01-01 00:00:00 UTC, now.
        #[must_use]
        pub fn new() -> Self {
            Self {
                base: epoch(),
                start: tokio::time::Instant::now(),
            }
        }
    }

    impl Default for TokioClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for TokioClock {
        fn now(&self) -> DateTime<Utc> {
            let elapsed = self.start.elapsed();
            self.base + chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero())
        }
    }

    /// Clock wrapper that counts how often it was read.
    ///
    /// An event stream reads the clock once per tick, so the count is a
    /// tick counter.
    #[derive(Clone)]
    pub struct CountingClock {
        inner: Arc<dyn Clock>,
        reads: Arc<AtomicU64>,
    }

    impl CountingClock {
        /// Wrap `inner`.
        #[must_use]
        pub fn new(inner: Arc<dyn Clock>) -> Self {
            Self {
                inner,
                reads: Arc::new(AtomicU64::new(0)),
            }
        }

        /// Number of `now()` calls so far, across all clones.
        #[must_use]
        pub fn reads(&self) -> u64 {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl Clock for CountingClock {
        fn now(&self) -> DateTime<Utc> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.now()
        }
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }
}

/// Fixtures for common test scenarios.
pub mod fixtures {
    use crate::repositories::InMemoryMovieRepository;
    use fluxflix_core::movie::{Movie, MovieId};
    use fluxflix_core::principal::{Principal, Role};

    /// `{id: "m1", title: "Flux Gordon"}`.
    #[must_use]
    pub fn flux_gordon() -> Movie {
        Movie::new(MovieId::new("m1"), "Flux Gordon")
    }

    /// `{id: "m2", title: "Back to the Future"}`.
    #[must_use]
    pub fn back_to_the_future() -> Movie {
        Movie::new(MovieId::new("m2"), "Back to the Future")
    }

    /// Principal holding only `stream`.
    #[must_use]
    pub fn rwinch() -> Principal {
        Principal::new("rwinch", [Role::stream()])
    }

    /// Repository holding [`flux_gordon`] and [`back_to_the_future`].
    #[must_use]
    pub fn seeded_repository() -> InMemoryMovieRepository {
        InMemoryMovieRepository::with_movies([flux_gordon(), back_to_the_future()])
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use fluxflix_core::movie::{Movie, MovieId};
    use fluxflix_core::principal::Role;
    use proptest::prelude::*;

    /// Arbitrary movie with a non-empty id.
    pub fn arb_movie() -> impl Strategy<Value = Movie> {
        ("[a-z0-9]{1,12}", "[A-Za-z ]{1,30}")
            .prop_map(|(id, title)| Movie::new(MovieId::new(id), title))
    }

    /// Arbitrary role set that never contains `stream` in any casing.
    pub fn arb_roles_without_stream() -> impl Strategy<Value = Vec<Role>> {
        proptest::collection::vec("[a-zA-Z]{1,10}", 0..4).prop_map(|names| {
            names
                .into_iter()
                .filter(|name| !name.eq_ignore_ascii_case(Role::STREAM))
                .map(Role::new)
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxflix_core::environment::Clock;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn counting_clock_counts_across_clones() {
        let clock = CountingClock::new(Arc::new(test_clock()));
        let clone = clock.clone();
        let _ = clock.now();
        let _ = clone.now();
        assert_eq!(clock.reads(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_follows_virtual_time() {
        let clock = TokioClock::new();
        let before = clock.now();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(clock.now() - before, chrono::Duration::seconds(5));
    }
}
