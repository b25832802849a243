//! Fetch and render pipeline for remote-authored markdown documents.
//!
//! Two components composed linearly:
//!
//! - [`DocumentFetcher`] resolves an identifier (slug) to a [`Document`]
//!   through any [`DocumentStore`](quill_store::DocumentStore)
//! - [`MarkdownRenderer`](quill_renderer::MarkdownRenderer) turns the body
//!   into display-safe HTML
//!
//! [`DocumentPipeline`] wires them together and [`DocumentView`] maps the
//! outcome to the states a display surface shows.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use quill_core::DocumentPipeline;
//! use quill_renderer::RenderOptions;
//! use quill_store::FsStore;
//!
//! let pipeline = DocumentPipeline::new(FsStore::new(PathBuf::from("docs")), RenderOptions::default());
//! match pipeline.load("hello-world")? {
//!     Some(rendered) => println!("{}", rendered.body_markup),
//!     None => eprintln!("not found"),
//! }
//! ```

mod document;
mod error;
mod fetcher;
mod pipeline;
mod view;

pub use document::{Document, RenderedDocument};
pub use error::FetchError;
pub use fetcher::DocumentFetcher;
pub use pipeline::DocumentPipeline;
pub use view::DocumentView;
