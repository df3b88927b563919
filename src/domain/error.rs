//! Error types for the discovery core.
//!
//! This module defines the centralized error type [`DiscoveryError`], the
//! [`Result`] alias used throughout the crate, and [`ApiFailure`], the
//! structured failure the host reports when a backend request does not
//! succeed. All errors are implemented with `thiserror`.

use thiserror::Error;

use super::event::EventId;

/// The main error type for discovery-core operations.
///
/// Nothing in this enum is fatal to the embedding application. Configuration
/// and I/O variants surface while loading settings; the mutation variants are
/// returned by the optimistic controller and turned into user notifications
/// by the event handler.
///
/// # Examples
///
/// ```
/// use campus_discovery::DiscoveryError;
///
/// fn validate(rail_size: usize) -> Result<(), DiscoveryError> {
///     if rail_size == 0 {
///         return Err(DiscoveryError::Config("rail size must be positive".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(validate(0).is_err());
/// ```
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A TOML configuration document could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// An optimistic change for the same event field is still awaiting the server.
    ///
    /// Overlapping writes are rejected rather than raced.
    #[error("a change to event {event} is already in progress")]
    MutationInFlight {
        /// The event whose field is busy.
        event: EventId,
    },

    /// The event targeted by a mutation is not part of the displayed data.
    #[error("event {event} is not displayed")]
    NotDisplayed {
        /// The event that could not be found.
        event: EventId,
    },

    /// The current session is not allowed to perform the action.
    #[error("action not permitted: {0}")]
    NotPermitted(String),
}

/// A specialized `Result` type for discovery-core operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Failure of a single backend request, as reported by the host.
///
/// `status` is `None` when the request never produced an HTTP response
/// (connection failure, timeout in the transport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    /// HTTP status code, if a response was received.
    pub status: Option<u16>,
    /// Human-readable detail, usually the server's `detail` field.
    pub message: String,
}

impl ApiFailure {
    /// Creates a failure for a non-success HTTP response.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a failure for a request that produced no response.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(code) => write!(f, "request failed with status {code}: {}", self.message),
            None => write!(f, "request failed: {}", self.message),
        }
    }
}

impl std::error::Error for ApiFailure {}
