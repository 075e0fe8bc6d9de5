//! Error types for spawngrid.

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpawnError>;

/// Store call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Get,
    Put,
    Sync,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Sync => "sync",
        })
    }
}

#[derive(Debug, Error)]
pub enum SpawnError {
    /// A coordinate could not be decoded, parsed, or is out of range.
    #[error("invalid {field} '{value}': {reason}")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The bucket store failed; the request is abandoned.
    #[error("bucket store {operation} failed for '{key}': {source}")]
    UpstreamStore {
        key: String,
        operation: StoreOperation,
        #[source]
        source: Box<SpawnError>,
    },

    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "snapshot")]
    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("invalid snapshot format")]
    InvalidFormat,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SpawnError {
    pub fn invalid_input(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a store adapter failure with the key and call it happened on.
    ///
    /// Errors that are already `UpstreamStore` pass through unchanged.
    pub fn upstream(key: impl Into<String>, operation: StoreOperation, source: SpawnError) -> Self {
        match source {
            err @ Self::UpstreamStore { .. } => err,
            source => Self::UpstreamStore {
                key: key.into(),
                operation,
                source: Box::new(source),
            },
        }
    }

    /// True for errors caused by the caller's input rather than the service.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
