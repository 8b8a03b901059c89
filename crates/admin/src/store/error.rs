//! Document store errors.

use thiserror::Error;

/// Errors that can occur when talking to a document store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or is temporarily failing.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request.
    #[error("document store denied access: {0}")]
    PermissionDenied(String),

    /// The targeted document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The store answered with something we could not interpret.
    #[error("unexpected document store response: {0}")]
    Protocol(String),

    /// Any other error status reported by the store.
    #[error("document store error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl StoreError {
    /// Classify an HTTP error status from a REST document store.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::PermissionDenied(message),
            404 => Self::NotFound(message),
            408 | 429 | 500 | 502 | 503 | 504 => Self::Unavailable(message),
            _ => Self::Api { status, message },
        }
    }
}
