//! Error types for Store operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to the Store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the Store, or the request timed out.
    #[error("Failed to connect to the Store at {url}: {source}")]
    ConnectionFailed {
        /// Store URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP error from the Store.
    #[error("Failure working with the Store: [{status}] {message}")]
    HttpError {
        /// HTTP status code (0 when the request never got a response).
        status: u16,
        /// Error message.
        message: String,
    },

    /// Invalid URL.
    #[error("Invalid URL: {url}")]
    InvalidUrl {
        /// URL string.
        url: String,
    },

    /// Credentials missing or rejected by the Store.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Error message.
        message: String,
    },

    /// The charm file could not be read.
    #[error("Cannot access charm file {path}: {source}")]
    FileAccess {
        /// Charm file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The credential file could not be read or written.
    #[error("Credential storage error at {path}: {source}")]
    CredentialStorage {
        /// Credential file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A response lacked an expected field or had the wrong shape.
    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse {
        /// Endpoint that produced the response.
        endpoint: String,
        /// What was wrong with it.
        message: String,
    },

    /// The storage service refused the pushed bytes.
    #[error("Server error while pushing file: {message}")]
    PushRejected {
        /// Raw server answer.
        message: String,
    },

    /// The upload job did not reach an ending status before the deadline.
    #[error(
        "Upload {upload_id} did not finish in time \
         (last status: {last_status}, status url: {status_url})"
    )]
    UploadTimedOut {
        /// Upload id returned by the push.
        upload_id: String,
        /// Status URL being polled.
        status_url: String,
        /// Last non-ending status observed.
        last_status: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {source}")]
    JsonError {
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Builds a [`StoreError::MalformedResponse`].
    pub(crate) fn malformed(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::ConnectionFailed {
                url: err
                    .url()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string),
                source: err,
            }
        } else if err.is_status() {
            let status = err.status().map_or(0, |s| s.as_u16());
            Self::HttpError {
                status,
                message: err.to_string(),
            }
        } else {
            Self::HttpError {
                status: 0,
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError { source: err }
    }
}

impl From<url::ParseError> for StoreError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_http() {
        let err = StoreError::HttpError {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failure working with the Store: [404] not found"
        );
    }

    #[test]
    fn test_error_display_file_access() {
        let err = StoreError::FileAccess {
            path: PathBuf::from("/tmp/missing.charm"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/missing.charm"));
    }

    #[test]
    fn test_error_display_malformed() {
        let err = StoreError::malformed("/v1/whoami", "missing field `username`");
        assert_eq!(
            err.to_string(),
            "Malformed response from /v1/whoami: missing field `username`"
        );
    }

    #[test]
    fn test_error_display_timed_out() {
        let err = StoreError::UploadTimedOut {
            upload_id: "abc".to_string(),
            status_url: "https://store/status".to_string(),
            last_status: "scanning".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("abc"));
        assert!(msg.contains("scanning"));
    }
}
