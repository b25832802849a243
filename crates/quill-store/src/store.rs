//! Store trait and error types.
//!
//! Provides the core [`DocumentStore`] trait for resolving identifiers to raw
//! records, along with [`StoreError`] for unified error handling across
//! backends.
//!
//! # Lookup Convention
//!
//! A lookup has three outcomes:
//! - `Ok(Some(record))` - exactly one record matches the identifier
//! - `Ok(None)` - no record matches (this is not an error)
//! - `Err(StoreError)` - the store could not determine the answer

use std::sync::Arc;

use serde::Deserialize;

/// Raw record returned by a store lookup.
///
/// Both fields are optional because hosted content stores return `null` for
/// fields that were never filled in by an author.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StoredDocument {
    /// Document title as authored.
    #[serde(default)]
    pub title: Option<String>,
    /// Raw Markdown body as authored.
    #[serde(default)]
    pub body: Option<String>,
}

impl StoredDocument {
    /// Create a record with both fields present.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }
}

/// Semantic error categories (inspired by Object Store + `OpenDAL`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Permission denied.
    PermissionDenied,
    /// Identifier cannot be mapped to the backend's key space.
    InvalidPath,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Too many requests.
    RateLimited,
    /// Operation timed out.
    Timeout,
    /// Backend answered with something that is not a valid lookup result.
    InvalidResponse,
    /// Other/unknown error category.
    Other,
}

/// Retry guidance (from `OpenDAL`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    /// Don't retry (config error, invalid identifier).
    #[default]
    Permanent,
    /// Retry immediately (timeout, connection reset).
    Temporary,
    /// Retry with backoff (rate limited, service unavailable).
    Persistent,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Retry guidance.
    pub status: ErrorStatus,
    /// Identifier being looked up (if applicable).
    pub identifier: Option<String>,
    /// Backend identifier (e.g., "Fs", "Http", "Mock").
    pub backend: Option<&'static str>,
    /// Short human-readable detail.
    pub message: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::Permanent,
            identifier: None,
            backend: None,
            message: None,
            source: None,
        }
    }

    /// Attach identifier context.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set retry status.
    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach a short detail message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Whether the backend suggests the lookup may succeed if repeated.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.status != ErrorStatus::Permanent
    }

    /// Create a store error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::PermissionDenied => StoreErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => StoreErrorKind::Timeout,
            std::io::ErrorKind::InvalidData => StoreErrorKind::InvalidResponse,
            _ => StoreErrorKind::Other,
        };
        let status = match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted => {
                ErrorStatus::Temporary
            }
            _ => ErrorStatus::Permanent,
        };
        Self::new(kind).with_status(status).with_source(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message: source (identifier: slug)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::PermissionDenied => "Permission denied",
            StoreErrorKind::InvalidPath => "Invalid identifier",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::RateLimited => "Rate limited",
            StoreErrorKind::Timeout => "Timeout",
            StoreErrorKind::InvalidResponse => "Invalid response",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(identifier) = &self.identifier {
            write!(f, " (identifier: {identifier})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read-only content store keyed by document identifier.
///
/// Implementations must never return more than one record for an
/// identifier. A backend that observes several matches reports
/// [`StoreErrorKind::InvalidResponse`] instead of choosing one.
pub trait DocumentStore: Send + Sync {
    /// Resolve an identifier to its stored record.
    ///
    /// Issues at most one read against the backend. Implementations do not
    /// retry; retry policy belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot answer (unreachable,
    /// rate limited, malformed response, invalid identifier).
    fn lookup(&self, identifier: &str) -> Result<Option<StoredDocument>, StoreError>;

    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    fn lookup(&self, identifier: &str) -> Result<Option<StoredDocument>, StoreError> {
        (**self).lookup(identifier)
    }

    fn backend(&self) -> &'static str {
        (**self).backend()
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn lookup(&self, identifier: &str) -> Result<Option<StoredDocument>, StoreError> {
        (**self).lookup(identifier)
    }

    fn backend(&self) -> &'static str {
        (**self).backend()
    }
}
