//! Error handling for MowerDeck
//!
//! Provides error types for the layers of the dashboard engine:
//! - Transport errors (HTTP fetch/write channel)
//! - Command errors (device rejected an operator command)
//! - Validation errors (local form/range checks, never sent to the network)
//!
//! All error types use `thiserror`. None of these are fatal: a transport
//! failure degrades to a stale display and a validation failure blocks the
//! local operation only.

use thiserror::Error;

/// Transport error type
///
/// Represents failures on the HTTP channel to the remote device.
/// Network failures are always non-fatal; the poll cycle continues.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The request could not be sent or the connection dropped
    #[error("Network failure: {message}")]
    Network {
        /// Description of the underlying network failure.
        message: String,
    },

    /// The device answered with a non-2xx status
    #[error("HTTP error {status}")]
    Http {
        /// The HTTP status code returned by the device.
        status: u16,
    },

    /// The response body could not be decoded
    #[error("Malformed response body: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },
}

/// Command error type
///
/// A command reached the device but was not acknowledged. The message is
/// the device's response body, suitable for surfacing to the operator.
#[derive(Error, Debug, Clone)]
pub enum CommandError {
    /// The device returned a non-numeric (non-acknowledging) response
    #[error("Command rejected: {message}")]
    Rejected {
        /// The device's response body.
        message: String,
    },

    /// The command could not be delivered at all
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The command was refused locally before any network traffic
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Validation error type
///
/// A local check failed before submission. Accumulates human-readable
/// messages; the first failing field is reported for focus handling.
#[derive(Error, Debug, Clone)]
#[error("{}", messages.join("; "))]
pub struct ValidationError {
    /// Human-readable messages, one per failing field.
    pub messages: Vec<String>,
    /// Logical name of the first failing field, if known.
    pub first_field: Option<String>,
}

impl ValidationError {
    /// Create a validation error for a single field.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            messages: vec![message.into()],
            first_field: Some(name),
        }
    }
}

/// Top-level error type for MowerDeck operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Device command failure.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Local validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Result alias using the MowerDeck error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message() {
        let err = ValidationError::field("DRIVETOX", "must be a number");
        assert_eq!(err.to_string(), "must be a number");
        assert_eq!(err.first_field.as_deref(), Some("DRIVETOX"));
    }

    #[test]
    fn test_command_error_from_transport() {
        let err: CommandError = TransportError::Http { status: 503 }.into();
        assert!(err.to_string().contains("503"));
    }
}
