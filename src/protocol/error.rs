//! Failure taxonomy for a single plugin invocation
//!
//! Every variant is fatal: the invocation ends with a stderr diagnostic and a
//! non-zero exit code, and no response document is written.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error(
        "this program is an external encryption plugin and must be driven by its host over pipes; \
         it cannot be run from an interactive terminal"
    )]
    InteractiveInvocation,

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("No transform direction selected: pass --encrypt or --decrypt")]
    UnsupportedMode,

    #[error("Encryption key is empty")]
    EmptyKey,

    #[error("Key derivation failed: {0}")]
    InternalDerivationFailure(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("I/O error on plugin stream: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginError {
    pub fn malformed(err: impl std::fmt::Display) -> Self {
        PluginError::MalformedRequest(err.to_string())
    }

    pub fn derivation(err: impl std::fmt::Display) -> Self {
        PluginError::InternalDerivationFailure(err.to_string())
    }
}
