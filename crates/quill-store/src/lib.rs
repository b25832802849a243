//! Document store abstraction for Quill.
//!
//! This crate provides a [`DocumentStore`] trait that resolves a document
//! identifier (slug) to the raw record held by a content store. This enables:
//!
//! - **Unit testing** without network access
//! - **Backend flexibility** (local directory, hosted CMS, in-memory)
//! - **Clean separation** between fetch policy and I/O
//!
//! # Architecture
//!
//! The crate provides:
//! - [`DocumentStore`] trait with a single read-only `lookup()` method
//! - [`FsStore`] for a local directory of `<slug>.md` files
//! - [`MockStore`] for testing (behind `mock` feature flag)
//!
//! The hosted CMS backend lives in the `quill-cms` crate.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use quill_store::{DocumentStore, FsStore};
//!
//! let store = FsStore::new(PathBuf::from("docs"));
//! if let Some(record) = store.lookup("getting-started")? {
//!     println!("{}", record.title.unwrap_or_default());
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod store;

pub use fs::FsStore;
#[cfg(feature = "mock")]
pub use mock::MockStore;
pub use store::{DocumentStore, ErrorStatus, StoreError, StoreErrorKind, StoredDocument};
