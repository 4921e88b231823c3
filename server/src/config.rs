//! Configuration management for the catalog server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that fail to parse fall back to their default.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Listener configuration
    pub server: ServerConfig,
    /// Event stream configuration
    pub stream: StreamConfig,
    /// Replace the catalog with the demo movies at startup
    pub seed_movies: bool,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Ops server host (metrics and health)
    pub metrics_host: String,
    /// Ops server port
    pub metrics_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// Event stream configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Spacing between events in milliseconds
    pub interval_ms: u64,
}

impl Config {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            server: ServerConfig {
                host: text("HOST", "0.0.0.0"),
                port: parsed(&lookup, "PORT").unwrap_or(8080),
                metrics_host: text("METRICS_HOST", "0.0.0.0"),
                metrics_port: parsed(&lookup, "METRICS_PORT").unwrap_or(9090),
                shutdown_timeout: parsed(&lookup, "SHUTDOWN_TIMEOUT").unwrap_or(30),
            },
            stream: StreamConfig {
                interval_ms: parsed(&lookup, "STREAM_INTERVAL_MS")
                    .filter(|ms: &u64| *ms > 0)
                    .unwrap_or(1000),
            },
            seed_movies: parsed(&lookup, "SEED_MOVIES").unwrap_or(true),
        }
    }

    /// Address of the catalog listener (`HOST:PORT`).
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Address of the ops listener (`METRICS_HOST:METRICS_PORT`).
    #[must_use]
    pub fn metrics_addr(&self) -> String {
        format!("{}:{}", self.server.metrics_host, self.server.metrics_port)
    }

    /// Event spacing.
    #[must_use]
    pub const fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream.interval_ms)
    }

    /// Grace period for open connections after a shutdown signal.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
