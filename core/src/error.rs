//! Error types for the learning platform client.
//!
//! # Design
//! The inbound side of the transport folds every failure into one of a few
//! well-known cases: the resource is missing, the server broke, the request
//! ran out of time, or no response arrived at all. Their messages are the
//! user-facing text shown by pages. Any other status passes through as
//! `Http` with the original body attached.

use std::path::PathBuf;

/// Errors returned by the request builder, the transport and the parsers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered 404.
    #[error("Resource not found")]
    NotFound,

    /// The backend answered with a 5xx status.
    #[error("Server error occurred")]
    ServerError { status: u16, body: String },

    /// The client-side deadline elapsed before a response arrived.
    #[error("Request timeout - the operation took too long")]
    Timeout,

    /// No response reached the client (DNS, connect or socket failure).
    /// The payload keeps the transport's own description for logs.
    #[error("Network error - please check your connection")]
    Network(String),

    /// Any other non-2xx status, with the body as sent by the backend.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A 2xx body could not be deserialized into the expected envelope.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Status code the error was derived from, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::ServerError { status, .. } | ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised by the key-value stores backing the client identity.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The state file exists but is not a JSON object of strings.
    #[error("corrupted state file '{path}': {message}")]
    Corrupt { path: PathBuf, message: String },
}

impl StorageError {
    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }
}
