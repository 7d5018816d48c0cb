//! Error types for the external collaborators the engine calls into.

use thiserror::Error;

/// Errors from [`SnapshotProvider`](super::traits::SnapshotProvider).
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot unavailable: {message}")]
    Unavailable { message: String },
    #[error("snapshot read error: {message}")]
    Read { message: String },
}

/// Errors from [`RouterService`](super::traits::RouterService).
///
/// Router failures are environment faults. Handlers never catch them;
/// they propagate and abort the containing chain.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("navigation to {destination} failed: {message}")]
    Navigation {
        destination: String,
        message: String,
    },
    #[error("page state refresh failed: {message}")]
    Refresh { message: String },
}

/// Errors from [`QueryRunner`](super::traits::QueryRunner).
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query not found: {action_id}")]
    NotFound { action_id: String },
    #[error("query execution failed: {message}")]
    Execution { message: String },
    #[error("no query runner configured")]
    Unconfigured,
}

/// Errors from loading or validating [`EngineConfig`](super::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {message}")]
    Invalid { message: String },
}
