//! Deterministic, sanitizing markdown renderer.
//!
//! This crate turns author-supplied markdown into HTML that is safe to embed
//! in a page, using GitHub's markup conventions so GitHub markdown
//! stylesheets apply.
//!
//! # Guarantees
//!
//! - **Deterministic**: the same body and [`RenderOptions`] always produce the
//!   same [`RenderResult`]
//! - **Safe**: no script elements, event handler attributes or `javascript:`
//!   URLs survive, however they are nested
//! - **Infallible**: malformed input degrades to literal text and is reported
//!   in [`RenderResult::warnings`]
//!
//! # Example
//!
//! ```
//! use quill_renderer::{LinkTarget, MarkdownRenderer, RenderOptions};
//!
//! let options = RenderOptions::default().with_link_target(LinkTarget::NewContext);
//! let result = MarkdownRenderer::new(options).render("[Docs](https://example.com)");
//!
//! assert!(result.html.contains(r#"target="_blank""#));
//! ```

mod html;
mod options;
mod renderer;
mod sanitize;
mod state;

pub use html::{AlertKind, wrap_markdown_body};
pub use options::{LinkTarget, RenderOptions};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use sanitize::{clean_block_html, is_safe_image, is_safe_link};
pub use state::{TocEntry, escape_html, slugify};
