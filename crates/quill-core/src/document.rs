//! Document and rendered document types.

use quill_renderer::TocEntry;
use quill_store::StoredDocument;
use serde::Serialize;

/// A remote-authored content record.
///
/// Read-only from this crate's perspective; content authors own it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Stable slug, unique per document.
    pub identifier: String,
    /// Plain-text title, possibly empty.
    pub title: String,
    /// Raw markdown body, possibly empty.
    pub body: String,
}

impl Document {
    /// Build a document from a raw store record.
    ///
    /// Missing title or body fields become empty strings.
    #[must_use]
    pub fn from_stored(identifier: impl Into<String>, record: StoredDocument) -> Self {
        Self {
            identifier: identifier.into(),
            title: record.title.unwrap_or_default(),
            body: record.body.unwrap_or_default(),
        }
    }
}

/// Display-ready form of a [`Document`].
///
/// Derived fresh on every render and never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    /// Identifier of the source document.
    pub identifier: String,
    /// HTML-escaped title.
    pub title_markup: String,
    /// Sanitized body HTML.
    pub body_markup: String,
    /// Table of contents for the body.
    pub toc: Vec<TocEntry>,
    /// Spans that were degraded while rendering.
    pub warnings: Vec<String>,
}
