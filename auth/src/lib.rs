//! # Fluxflix Authentication & Authorization
//!
//! Resolves request credentials to a [`Principal`] and decides whether that
//! principal may access a path.
//!
//! ## Pieces
//!
//! - [`UserDirectory`]: immutable username → roles table, built once at startup
//! - [`BasicCredentials`]: `Authorization: Basic …` parsing
//! - [`AuthorizationEngine`]: pure `(principal, path) → allow/deny`
//!
//! ## Example
//!
//! ```rust
//! use fluxflix_auth::{AuthorizationEngine, BasicCredentials, UserDirectory};
//!
//! let directory = UserDirectory::demo();
//! let engine = AuthorizationEngine::default();
//!
//! let creds = BasicCredentials::new("rwinch", "password");
//! let principal = directory.authenticate(&creds);
//! assert!(engine.decide(principal.as_ref(), "/movies/m1/events").is_allowed());
//! ```
//!
//! [`Principal`]: fluxflix_core::principal::Principal

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod authorization;
pub mod credentials;
pub mod directory;
pub mod error;

pub use authorization::{AccessRule, AuthorizationDecision, AuthorizationEngine};
pub use credentials::BasicCredentials;
pub use directory::{UserDirectory, UserDirectoryBuilder, UserRecord};
pub use error::{AuthError, Result};
