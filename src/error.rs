//! Error types for the Zennfy client core.
//!
//! Every failure the service clients can hit maps onto one of these
//! kinds. The fetchers absorb them internally and hand callers a
//! designed fallback value instead; `StorageUnavailable` is the only
//! kind that surfaces, since silently dropping a credential the user
//! believes was saved would be misleading.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// The main error type for the Zennfy client core.
#[derive(Clone, Debug)]
pub enum Error {
    /// No credential is configured for the requested service.
    MissingCredential {
        /// The persisted key name of the missing credential.
        name: String,
    },

    /// Transport-level failure: connect error, timeout, DNS, TLS.
    Network {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// The endpoint answered with a non-2xx status.
    Http {
        /// HTTP status code.
        status_code: u16,
        /// Human-readable error message.
        message: String,
    },

    /// The response body did not have the expected shape.
    MalformedResponse {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// The persistence medium backing the credential store is inaccessible.
    StorageUnavailable {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Creates a new missing-credential error.
    pub fn missing_credential(name: impl Into<String>) -> Self {
        Error::MissingCredential { name: name.into() }
    }

    /// Creates a new network error.
    pub fn network(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Network {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new HTTP status error.
    pub fn http(status_code: u16, message: impl Into<String>) -> Self {
        Error::Http {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a new malformed-response error.
    pub fn malformed_response(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::MalformedResponse {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new storage-unavailable error.
    pub fn storage_unavailable(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::StorageUnavailable {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Returns true if this error is a missing credential.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Error::MissingCredential { .. })
    }

    /// Returns true if this error is transport-level.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. })
    }

    /// Returns true if this error is a non-2xx response.
    pub fn is_http(&self) -> bool {
        matches!(self, Error::Http { .. })
    }

    /// Returns true if this error is a malformed response body.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Error::MalformedResponse { .. })
    }

    /// Returns true if this error is a storage failure.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Error::StorageUnavailable { .. })
    }

    /// Returns the status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Classify a reqwest failure into our error kinds.
    ///
    /// Timeouts and connect failures are transport-level; decode
    /// failures mean the body did not parse; everything else reqwest
    /// reports without a status is treated as a network failure too.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Error::http(status.as_u16(), format!("request failed: {}", err))
        } else if err.is_timeout() {
            Error::network(format!("request timed out: {}", err), Some(Box::new(err)))
        } else if err.is_connect() {
            Error::network(format!("connection error: {}", err), Some(Box::new(err)))
        } else if err.is_decode() {
            Error::malformed_response(
                format!("failed to parse response: {}", err),
                Some(Box::new(err)),
            )
        } else {
            Error::network(format!("request failed: {}", err), Some(Box::new(err)))
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingCredential { name } => {
                write!(f, "Missing credential: {name} is not configured")
            }
            Error::Network { message, .. } => {
                write!(f, "Network error: {message}")
            }
            Error::Http {
                status_code,
                message,
            } => {
                write!(f, "HTTP error {status_code}: {message}")
            }
            Error::MalformedResponse { message, .. } => {
                write!(f, "Malformed response: {message}")
            }
            Error::StorageUnavailable { message, .. } => {
                write!(f, "Storage unavailable: {message}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Network { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::MalformedResponse { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::StorageUnavailable { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::storage_unavailable(err.to_string(), Some(Box::new(err)))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::malformed_response(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::from_reqwest(err)
    }
}

/// A specialized Result type for Zennfy operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        let err = Error::missing_credential("zennfy_cmc_key");
        assert_eq!(
            err.to_string(),
            "Missing credential: zennfy_cmc_key is not configured"
        );

        let err = Error::http(503, "service unavailable");
        assert_eq!(err.to_string(), "HTTP error 503: service unavailable");
        assert_eq!(err.status_code(), Some(503));
    }

    #[test]
    fn predicates() {
        assert!(Error::missing_credential("k").is_missing_credential());
        assert!(Error::network("down", None).is_network());
        assert!(Error::http(404, "nope").is_http());
        assert!(Error::malformed_response("bad body", None).is_malformed_response());
        assert!(Error::storage_unavailable("quota", None).is_storage_unavailable());
        assert!(!Error::network("down", None).is_http());
    }

    #[test]
    fn io_errors_map_to_storage() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from(io);
        assert!(err.is_storage_unavailable());
    }

    #[test]
    fn json_errors_map_to_malformed() {
        let parse = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = Error::from(parse);
        assert!(err.is_malformed_response());
    }
}
