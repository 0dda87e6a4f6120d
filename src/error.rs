//! Error types for the execution engine.
//!
//! Error handling follows these principles:
//!
//! - Errors are explicit and typed (no stringly-typed errors)
//! - Transport-level failures carry the originating request so callers and
//!   the retry decorator can act on it
//! - Only [`ClientError::Network`] is eligible for retry; everything else is
//!   fatal on first occurrence
//! - Resource teardown is ownership-driven and always runs while an error
//!   propagates

use std::fmt;

use crate::message::Request;

/// Engine-level failure not attributable to the network.
#[derive(Debug)]
pub enum ClientError {
    /// A transfer handle could not be created or configured.
    Handle(String),
    /// The polling primitive reported a fatal, non-recoverable status.
    Session {
        /// Primitive-specific status code.
        code: i32,
        /// Primitive-provided status description.
        message: String,
    },
    /// Transfer metadata could not be retrieved even though no transport
    /// error occurred (the status-code sentinel was zero).
    MissingStatusCode,
    /// Transport-level transfer failure (connect/DNS/TLS/timeout).
    ///
    /// The only error kind the retry decorator replays.
    Network(NetworkError),
    /// Request rejected before any transfer was attempted.
    Request(RequestError),
    /// Invalid engine or decorator configuration.
    Config(ConfigError),
}

impl ClientError {
    /// Returns true for transport-level failures eligible for retry.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handle(message) => write!(f, "unable to set up transfer handle: {message}"),
            Self::Session { code, message } => {
                write!(f, "transfer session failed ({code}): {message}")
            }
            Self::MissingStatusCode => write!(
                f,
                "failed to retrieve the response status code; \
                 check the request and verify network accessibility"
            ),
            Self::Network(e) => e.fmt(f),
            Self::Request(e) => e.fmt(f),
            Self::Config(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            Self::Request(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NetworkError> for ClientError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

impl From<RequestError> for ClientError {
    fn from(e: RequestError) -> Self {
        Self::Request(e)
    }
}

impl From<ConfigError> for ClientError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// A transfer failed at the transport level.
#[derive(Debug, Clone)]
pub struct NetworkError {
    /// The request whose transfer failed.
    pub request: Request,
    /// Human-readable failure description from the transport.
    pub message: String,
    /// Transport-specific error code.
    pub code: i32,
}

impl NetworkError {
    /// Create a network error for the given request.
    #[must_use]
    pub fn new(request: Request, message: impl Into<String>, code: i32) -> Self {
        Self {
            request,
            message: message.into(),
            code,
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transfer of {} {} failed ({}): {}",
            self.request.method, self.request.uri, self.code, self.message
        )
    }
}

impl std::error::Error for NetworkError {}

/// A request was rejected before any transfer attempt.
#[derive(Debug, Clone)]
pub struct RequestError {
    /// The rejected request.
    pub request: Request,
    /// Reason for the rejection.
    pub message: String,
}

impl RequestError {
    /// Create a request-rejection error.
    #[must_use]
    pub fn new(request: Request, message: impl Into<String>) -> Self {
        Self {
            request,
            message: message.into(),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request {} {} rejected: {}",
            self.request.method, self.request.uri, self.message
        )
    }
}

impl std::error::Error for RequestError {}

/// Invalid configuration detected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The retry decorator requires at least one attempt.
    #[error("max_attempts must be at least 1")]
    ZeroMaxAttempts,
    /// A multi-request requires at least one entry.
    #[error("at least one request is expected")]
    EmptyMultiRequest,
}
