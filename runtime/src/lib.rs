//! # Fluxflix Runtime
//!
//! The moving parts of the catalog: the [`CatalogService`] read façade and
//! the [`EventStreamGenerator`] that turns one movie into an unbounded,
//! time-paced, cancellable stream of [`MovieEvent`]s.
//!
//! ## Concurrency model
//!
//! - Every stream owns one producer task and one capacity-1 channel.
//! - Streams share nothing; each has its own ticker starting at subscription.
//! - Dropping a [`MovieEventStream`] cancels its producer before the next tick.
//!
//! ## Example
//!
//! ```no_run
//! use fluxflix_core::environment::SystemClock;
//! use fluxflix_core::movie::MovieId;
//! use fluxflix_core::repository::MovieRepository;
//! use fluxflix_runtime::{CatalogService, EventStreamGenerator, generator::DEFAULT_INTERVAL};
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! # async fn example(repository: Arc<dyn MovieRepository>) -> Result<(), Box<dyn std::error::Error>> {
//! let generator = EventStreamGenerator::new(DEFAULT_INTERVAL, Arc::new(SystemClock));
//! let catalog = CatalogService::new(repository, generator);
//!
//! let mut events = catalog.stream_events(&MovieId::new("m1")).await?;
//! while let Some(event) = events.next().await {
//!     println!("{} @ {}", event.movie.title, event.when);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`MovieEvent`]: fluxflix_core::movie::MovieEvent

pub mod catalog;
pub mod generator;
pub mod metrics;

pub use catalog::{CatalogError, CatalogService};
pub use generator::{
    CompletionHook, EventStreamGenerator, LoggingCompletionHook, MovieEventStream,
    StreamTermination,
};
