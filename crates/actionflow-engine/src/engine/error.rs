//! Engine error types.

use thiserror::Error;

use crate::dispatcher::ChainError;
use crate::errors::ConfigError;

/// Errors from [`Engine`](super::Engine) operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The configuration failed validation at build time.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// An action chain aborted.
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),
    /// A spawned chain task panicked or was aborted.
    #[error("chain task failed: {message}")]
    Join { message: String },
}

impl EngineError {
    /// The user-facing message for a failed trigger, if this error carries one.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Chain(err) => err.trigger_error().map(|e| e.user_message()),
            _ => None,
        }
    }
}
