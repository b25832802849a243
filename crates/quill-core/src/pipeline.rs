//! Fetch and render composition.

use quill_renderer::{MarkdownRenderer, RenderOptions, escape_html};
use quill_store::DocumentStore;

use crate::document::{Document, RenderedDocument};
use crate::error::FetchError;
use crate::fetcher::DocumentFetcher;

/// Fetches a document and renders it for display.
///
/// Stateless apart from the store; safe to share across threads when the
/// store is.
#[derive(Debug)]
pub struct DocumentPipeline<S> {
    fetcher: DocumentFetcher<S>,
    renderer: MarkdownRenderer,
}

impl<S: DocumentStore> DocumentPipeline<S> {
    /// Create a pipeline over the given store.
    #[must_use]
    pub fn new(store: S, options: RenderOptions) -> Self {
        Self {
            fetcher: DocumentFetcher::new(store),
            renderer: MarkdownRenderer::new(options),
        }
    }

    /// The fetcher stage.
    #[must_use]
    pub fn fetcher(&self) -> &DocumentFetcher<S> {
        &self.fetcher
    }

    /// The renderer stage.
    #[must_use]
    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Fetch and render the document with the given identifier.
    ///
    /// Returns `Ok(None)` when no document matches.
    ///
    /// # Errors
    ///
    /// Propagates [`FetchError`] from the fetch stage unmodified. Rendering
    /// never fails.
    pub fn load(&self, identifier: &str) -> Result<Option<RenderedDocument>, FetchError> {
        Ok(self
            .fetcher
            .fetch(identifier)?
            .map(|doc| self.render_document(&doc)))
    }

    /// Render an already fetched document.
    #[must_use]
    pub fn render_document(&self, doc: &Document) -> RenderedDocument {
        let result = self.renderer.render(&doc.body);
        for warning in &result.warnings {
            tracing::debug!(identifier = %doc.identifier, warning = %warning, "Render degraded");
        }

        RenderedDocument {
            identifier: doc.identifier.clone(),
            title_markup: escape_html(&doc.title),
            body_markup: result.html,
            toc: result.toc,
            warnings: result.warnings,
        }
    }
}
