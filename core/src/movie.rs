//! Catalog entities and the events streamed about them.
//!
//! This module defines the strong types for catalog records (`Movie`),
//! their identity (`MovieId`), and the transient values emitted while a
//! client watches a movie (`MovieEvent`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error type for `MovieId` parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid movie ID: {0}")]
pub struct ParseMovieIdError(String);

/// Unique identifier for a movie in the catalog.
///
/// The identifier is an opaque string assigned once at creation time and
/// never changed afterwards.
///
/// # Validation
///
/// - `FromStr::from_str()`: Validates input (rejects empty strings)
/// - `From::from()` and `new()`: No validation (for trusted input)
///
/// Use `FromStr` when parsing path segments and other external input.
///
/// # Examples
///
/// ```
/// use fluxflix_core::movie::MovieId;
///
/// let id = MovieId::new("m1");
/// assert_eq!(id.as_str(), "m1");
///
/// let parsed: MovieId = "m2".parse().unwrap();
/// assert_eq!(parsed, MovieId::new("m2"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    /// Create a new `MovieId` from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier (UUID v4).
    ///
    /// Used by write paths such as startup seeding.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the `MovieId` into its inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MovieId {
    type Err = ParseMovieIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ParseMovieIdError("Movie ID cannot be empty".to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<String> for MovieId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MovieId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for MovieId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A catalog record.
///
/// # Examples
///
/// ```
/// use fluxflix_core::movie::{Movie, MovieId};
///
/// let movie = Movie::new(MovieId::new("m1"), "Flux Gordon");
/// assert_eq!(movie.title, "Flux Gordon");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Immutable identity.
    pub id: MovieId,
    /// Display title.
    pub title: String,
}

impl Movie {
    /// Create a movie with an explicit id.
    #[must_use]
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Create a movie with a freshly generated id.
    #[must_use]
    pub fn with_generated_id(title: impl Into<String>) -> Self {
        Self::new(MovieId::generate(), title)
    }
}

/// A single tick of a movie's event stream.
///
/// Pairs the movie snapshot taken when the stream started with the
/// wall-clock time the event was emitted. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieEvent {
    /// Snapshot of the watched movie.
    pub movie: Movie,
    /// Emission time.
    pub when: DateTime<Utc>,
}

impl MovieEvent {
    /// Create a new event.
    #[must_use]
    pub const fn new(movie: Movie, when: DateTime<Utc>) -> Self {
        Self { movie, when }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn movie_id_rejects_empty_input() {
        assert!("".parse::<MovieId>().is_err());
        assert!("   ".parse::<MovieId>().is_err());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = MovieId::generate();
        let b = MovieId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn movie_serializes_with_flat_id() {
        let movie = Movie::new(MovieId::new("m1"), "Flux Gordon");
        let json = serde_json::to_string(&movie).unwrap();
        assert_eq!(json, r#"{"id":"m1","title":"Flux Gordon"}"#);
    }

    #[test]
    fn movie_event_serializes_movie_and_timestamp() {
        let when = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let event = MovieEvent::new(Movie::new(MovieId::new("m1"), "Flux Gordon"), when);
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["movie"]["id"], "m1");
        assert_eq!(json["movie"]["title"], "Flux Gordon");
        assert_eq!(json["when"], "2025-01-01T00:00:00Z");
    }

    proptest! {
        #[test]
        fn non_blank_ids_parse_verbatim(raw in "[a-zA-Z0-9-]{1,40}") {
            let id: MovieId = raw.parse().unwrap();
            prop_assert_eq!(id.as_str(), raw.as_str());
        }
    }
}
