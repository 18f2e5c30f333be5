//! Error types for Pricewatch

use thiserror::Error;

/// Result type alias using Pricewatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a command before the batch starts.
///
/// Per-URL and per-channel failures never surface here; the runner records
/// them in the batch report instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Items file could not be used
    #[error("Items file {path}: {reason}")]
    Items { path: String, reason: String },

    /// Page fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Price extraction failed
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Notification delivery failed
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an items file error
    pub fn items(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Items {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// A page could not be retrieved.
///
/// `status` is set when the server answered with something other than
/// HTTP 200, and left empty for network failures and timeouts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct FetchError {
    pub status: Option<u16>,
    pub reason: String,
}

impl FetchError {
    /// Non-200 response
    pub fn status(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            reason: reason.into(),
        }
    }

    /// Connection, TLS or timeout failure
    pub fn network(reason: impl Into<String>) -> Self {
        Self {
            status: None,
            reason: reason.into(),
        }
    }
}

/// No extraction strategy produced a price.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("not found")]
    NotFound,
}

/// Notification errors
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{channel} returned {status}: {body}")]
    Rejected {
        channel: String,
        status: u16,
        body: String,
    },

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("Invalid address {address}: {reason}")]
    Address { address: String, reason: String },

    #[error("Message error: {0}")]
    Message(String),
}
