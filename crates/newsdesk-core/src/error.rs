//! Error types for the NewsDesk admin console

use std::{error::Error as StdError, fmt};

/// Main error type for the NewsDesk admin console
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Network error: the request never produced a response
    Network {
        /// Error message
        message: String,
    },

    /// Server error: a response arrived but reported failure
    Server {
        /// HTTP status code, or 200 for an envelope-level failure
        status: u16,
        /// Message supplied by the backend, if any
        message: String,
    },

    /// A success response whose payload could not be decoded
    MalformedResponse {
        /// Decode error message
        message: String,
    },

    /// Validation error: a local form-field check failed
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Authentication error
    Authentication(String),

    /// Not found error
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Serialization error
    Serialization(serde_json::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Network { message } => write!(f, "Network error: {message}"),
            Self::Server { status, message } => {
                write!(f, "Server error ({status}): {message}")
            }
            Self::MalformedResponse { message } => {
                write!(f, "Malformed response: {message}")
            }
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::Authentication(msg) => write!(f, "Authentication failed: {msg}"),
            Self::NotFound { resource } => write!(f, "Resource not found: {resource}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

// From implementations for automatic conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl Error {
    /// True when the error is a transport-level failure: the request never
    /// reached the server, or timed out without a response.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// True when the failure came from the backend rather than the transport.
    #[must_use]
    pub const fn is_server(&self) -> bool {
        matches!(
            self,
            Self::Server { .. } | Self::MalformedResponse { .. } | Self::NotFound { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
#[allow(
    clippy::uninlined_format_args,
    clippy::missing_errors_doc,
    clippy::unnecessary_wraps,
    clippy::match_same_arms
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_network_error_display() {
        let err = Error::Network {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert!(err.is_network());
        assert!(!err.is_server());
    }

    #[test]
    fn test_server_error_display() {
        let err = Error::Server {
            status: 500,
            message: "internal error".to_string(),
        };
        assert_eq!(err.to_string(), "Server error (500): internal error");
        assert!(err.is_server());
    }

    #[test]
    fn test_envelope_failure_uses_status_200() {
        let err = Error::Server {
            status: 200,
            message: "Xəbər yenilənmədi".to_string(),
        };
        assert_eq!(err.to_string(), "Server error (200): Xəbər yenilənmədi");
    }

    #[test]
    fn test_validation_error_names_field() {
        let err = Error::Validation {
            field: "title".to_string(),
            message: "must not be empty".to_string(),
        };
        assert_eq!(err.to_string(), "Validation error: title - must not be empty");
    }

    #[test]
    fn test_io_error_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::from(io_err);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json")
            .err()
            .map(Error::from);
        assert!(json_err.is_some());
    }
}
