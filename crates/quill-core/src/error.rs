//! Fetch error types.

use quill_store::StoreError;

/// Error from [`DocumentFetcher::fetch`](crate::DocumentFetcher::fetch).
///
/// A missing document is not an error; it is reported as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The identifier is malformed: blank, or rejected by the store's key
    /// rules. Never retryable.
    #[error("invalid identifier: {0}")]
    Validation(String),

    /// The store could not answer. Whether a retry may help follows the
    /// store's [`ErrorStatus`](quill_store::ErrorStatus).
    #[error("document store failure: {0}")]
    Transient(#[from] StoreError),
}

impl FetchError {
    /// Whether repeating the same call may succeed.
    ///
    /// Validation errors never are. Store failures are when the backend
    /// marked them temporary or persistent (timeouts, rate limits, 5xx).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transient(err) => err.is_temporary(),
            Self::Validation(_) => false,
        }
    }

    /// The underlying store error, if any.
    #[must_use]
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Transient(err) => Some(err),
            Self::Validation(_) => None,
        }
    }
}
