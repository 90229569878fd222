//! Unified error types for the Stackform workspace.
//!
//! Every failure the composition engine can raise is a local validation
//! failure detected synchronously at the violated precondition. None of them
//! is transient, so callers fix the input and retry the whole composition.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum StackformError {
    /// A cluster reference could not be resolved.
    #[error("cannot resolve cluster \"{name}\": {reason}")]
    Resolution {
        /// Cluster name that was requested.
        name: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A port lies outside the valid TCP range.
    #[error("invalid {field}: {value} is outside 1-65535")]
    InvalidPort {
        /// Which port field was rejected.
        field: &'static str,
        /// The rejected value.
        value: u32,
    },

    /// Two resources were declared with the same logical name.
    #[error("naming collision: a resource named \"{name}\" already exists")]
    NamingCollision {
        /// The colliding logical name.
        name: String,
    },

    /// A configuration or manifest value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The resource registry rejected a record.
    #[error("registry error: {message}")]
    Registry {
        /// Description of the registry failure.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StackformError>;
