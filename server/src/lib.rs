//! Fluxflix catalog server.
//!
//! Wires the in-memory movie store, the event stream generator, the
//! gateway router, and an ops listener for metrics and health.

pub mod config;
pub mod ops;
pub mod seed;

pub use config::Config;
pub use ops::ops_router;
pub use seed::{SEED_TITLES, seed_movies};
