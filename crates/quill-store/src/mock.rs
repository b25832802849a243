//! Mock store implementation for testing.
//!
//! Provides [`MockStore`] for unit testing without filesystem or network access.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::store::{DocumentStore, ErrorStatus, StoreError, StoreErrorKind, StoredDocument};

/// Mock store for testing.
///
/// Stores records in memory and counts every lookup, so tests can assert
/// that a caller did (or did not) reach the backend.
///
/// # Example
///
/// ```ignore
/// use quill_store::{DocumentStore, MockStore};
///
/// let store = MockStore::new().with_document("hello", "Hello", "# Hello");
///
/// let record = store.lookup("hello").unwrap();
/// assert_eq!(store.lookup_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    documents: RwLock<HashMap<String, StoredDocument>>,
    failure: RwLock<Option<(StoreErrorKind, ErrorStatus)>>,
    lookups: AtomicUsize,
}

impl MockStore {
    /// Create a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with the given title and body.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_document(
        self,
        identifier: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.documents
            .write()
            .unwrap()
            .insert(identifier.into(), StoredDocument::new(title, body));
        self
    }

    /// Add a raw record, e.g. one with missing fields.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_record(self, identifier: impl Into<String>, record: StoredDocument) -> Self {
        self.documents
            .write()
            .unwrap()
            .insert(identifier.into(), record);
        self
    }

    /// Make every lookup fail with the given kind and retry status.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, kind: StoreErrorKind, status: ErrorStatus) -> Self {
        *self.failure.write().unwrap() = Some((kind, status));
        self
    }

    /// Replace the body of a stored document, simulating an author edit.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn update_body(&self, identifier: &str, body: impl Into<String>) {
        if let Some(record) = self.documents.write().unwrap().get_mut(identifier) {
            record.body = Some(body.into());
        }
    }

    /// Number of lookups issued against this store.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl DocumentStore for MockStore {
    fn lookup(&self, identifier: &str) -> Result<Option<StoredDocument>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if let Some((kind, status)) = *self.failure.read().unwrap() {
            return Err(StoreError::new(kind)
                .with_status(status)
                .with_identifier(identifier)
                .with_backend("Mock"));
        }

        Ok(self.documents.read().unwrap().get(identifier).cloned())
    }

    fn backend(&self) -> &'static str {
        "Mock"
    }
}
