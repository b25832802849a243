//! Document fetcher.

use quill_store::{DocumentStore, StoreErrorKind};

use crate::document::Document;
use crate::error::FetchError;

/// Resolves identifiers to documents through a [`DocumentStore`].
///
/// Issues exactly one store lookup per [`fetch`](Self::fetch) call. No
/// caching and no retries; callers decide whether to retry a
/// [`FetchError::Transient`].
#[derive(Debug)]
pub struct DocumentFetcher<S> {
    store: S,
}

impl<S: DocumentStore> DocumentFetcher<S> {
    /// Create a fetcher over the given store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the document with the given identifier.
    ///
    /// Returns `Ok(None)` when no document matches.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Validation`] if the identifier is empty or blank (the
    ///   store is not contacted) or the store rejects it as malformed
    /// - [`FetchError::Transient`] if the store failed to answer
    pub fn fetch(&self, identifier: &str) -> Result<Option<Document>, FetchError> {
        if identifier.trim().is_empty() {
            return Err(FetchError::Validation(
                "identifier cannot be empty".to_owned(),
            ));
        }

        tracing::debug!(identifier, backend = self.store.backend(), "Looking up document");

        match self.store.lookup(identifier) {
            Ok(Some(record)) => Ok(Some(Document::from_stored(identifier, record))),
            Ok(None) => {
                tracing::info!(identifier, "Document not found");
                Ok(None)
            }
            Err(err) if err.kind == StoreErrorKind::InvalidPath => {
                tracing::info!(identifier, error = %err, "Identifier rejected by store");
                Err(FetchError::Validation(
                    err.message
                        .unwrap_or_else(|| format!("{identifier:?} rejected by store")),
                ))
            }
            Err(err) => {
                tracing::warn!(identifier, error = %err, "Document lookup failed");
                Err(FetchError::Transient(err))
            }
        }
    }
}
