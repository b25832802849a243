//! Display states for a document page.

use crate::document::RenderedDocument;
use crate::error::FetchError;

/// What a display surface shows for a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DocumentView {
    /// Fetch in progress.
    #[default]
    Loading,
    /// No document matches the identifier.
    NotFound,
    /// Fetch failed.
    Failed {
        /// Human readable reason.
        message: String,
        /// Whether offering a retry makes sense.
        retryable: bool,
    },
    /// Document is ready to display.
    Ready(RenderedDocument),
}

impl DocumentView {
    /// Map a pipeline result to a view state.
    #[must_use]
    pub fn from_result(result: Result<Option<RenderedDocument>, FetchError>) -> Self {
        match result {
            Ok(Some(doc)) => Self::Ready(doc),
            Ok(None) => Self::NotFound,
            Err(err) => Self::Failed {
                message: err.to_string(),
                retryable: err.is_retryable(),
            },
        }
    }

    /// Whether the view holds a final outcome.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

impl From<Result<Option<RenderedDocument>, FetchError>> for DocumentView {
    fn from(result: Result<Option<RenderedDocument>, FetchError>) -> Self {
        Self::from_result(result)
    }
}
