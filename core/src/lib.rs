//! # Fluxflix Core
//!
//! Domain types and store traits for the Fluxflix movie catalog.
//!
//! ## Core Concepts
//!
//! - **Movie**: a catalog record with an immutable id and a title
//! - **`MovieEvent`**: a timestamped snapshot emitted while a client watches a movie
//! - **Principal**: an authenticated user and the roles granted to them
//! - **`MovieRepository`**: the injected document store the catalog reads from
//! - **Clock**: injected time source, so event timestamps are testable
//!
//! ## Example
//!
//! ```
//! use fluxflix_core::movie::{Movie, MovieEvent, MovieId};
//! use fluxflix_core::environment::{Clock, SystemClock};
//!
//! let movie = Movie::new(MovieId::new("m1"), "Flux Gordon");
//! let event = MovieEvent::new(movie, SystemClock.now());
//! assert_eq!(event.movie.id.as_str(), "m1");
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

pub mod movie;
pub mod principal;
pub mod repository;

pub use movie::{Movie, MovieEvent, MovieId, ParseMovieIdError};
pub use principal::{Principal, Role};
pub use repository::{MovieRepository, RepositoryError, RepositoryFuture};

/// Environment module - injected dependencies
///
/// External dependencies are abstracted behind traits so tests can swap
/// them for deterministic implementations.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system wall clock.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
