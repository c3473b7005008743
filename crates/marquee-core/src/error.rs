//! Error types for Marquee Core

use thiserror::Error;

/// Result type alias for facade and configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Marquee error types
///
/// Token resolution itself never fails. These errors come from loading
/// configuration, decoding notification payloads, and the opt-in
/// [`MetadataFacade::try_resolve`](crate::MetadataFacade::try_resolve).
#[derive(Error, Debug)]
pub enum Error {
    // Readiness
    #[error("No content metadata has been received yet")]
    NotReady,

    // Configuration errors
    #[error("Unknown token: {name}")]
    UnknownToken { name: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Payload errors
    #[error("Invalid notification payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// Returns true if retrying after more notifications may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NotReady)
    }

    /// Returns the error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::NotReady => "NOT_READY",
            Error::UnknownToken { .. } => "UNKNOWN_TOKEN",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::InvalidPayload(_) => "INVALID_PAYLOAD",
            Error::Io(_) => "IO",
        }
    }
}
