//! Error types for the event registry
//!
//! Handler failures never surface here: they are contained at the entry
//! boundary. These variants cover contract violations, configuration and the
//! collaborators around the catalog.

use thiserror::Error;

/// Unified error type for the registry
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Dispatch Errors
    // =========================================================================
    #[error("Unknown selection strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("Entry for event {event} on node {node} is not local")]
    NotLocal { event: String, node: String },

    #[error("Transport failed sending {event} to {node}: {reason}")]
    Transport {
        event: String,
        node: String,
        reason: String,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}

/// Result type alias for the registry
pub type Result<T> = std::result::Result<T, Error>;
