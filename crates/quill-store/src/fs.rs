//! Filesystem store implementation.
//!
//! Serves documents from a local directory where each document is stored as
//! `<identifier>.md`. Useful for offline previews and for authoring content
//! before it is published to a hosted store.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::store::{DocumentStore, StoreError, StoreErrorKind, StoredDocument};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// ATX H1 heading line.
static H1_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[ \t]+(.+)$").expect("H1 regex is a valid constant"));

/// Filesystem-backed document store.
///
/// The title of a document is taken from its first H1 heading, falling back
/// to a title derived from the identifier (`setup-guide` becomes
/// `Setup Guide`). The whole file is returned as the body.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use quill_store::{DocumentStore, FsStore};
///
/// let store = FsStore::new(PathBuf::from("docs"));
/// let record = store.lookup("setup-guide")?;
/// ```
#[derive(Debug)]
pub struct FsStore {
    /// Root directory for documents.
    source_dir: PathBuf,
}

impl FsStore {
    /// Create a new filesystem store rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Root directory this store reads from.
    #[must_use]
    pub fn source_dir(&self) -> &std::path::Path {
        &self.source_dir
    }

    /// Validate that an identifier maps to a single file inside the source directory.
    ///
    /// Rejects separators, leading dots and NUL bytes so that identifiers like
    /// `../../etc/passwd` or `.git/config` cannot escape the source directory.
    fn validate_identifier(identifier: &str) -> Result<(), StoreError> {
        let invalid = identifier.is_empty()
            || identifier.starts_with('.')
            || identifier.contains(['/', '\\', '\0']);

        if invalid {
            return Err(StoreError::new(StoreErrorKind::InvalidPath)
                .with_message("must not be empty, start with '.' or contain path separators")
                .with_identifier(identifier)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Extract title from first H1 heading outside fenced code blocks.
    fn extract_title(content: &str) -> Option<String> {
        let mut fence: Option<&str> = None;
        for line in content.lines() {
            let trimmed = line.trim_start();
            match fence {
                Some(marker) => {
                    if trimmed.starts_with(marker) {
                        fence = None;
                    }
                }
                None if trimmed.starts_with("```") => fence = Some("```"),
                None if trimmed.starts_with("~~~") => fence = Some("~~~"),
                None => {
                    if let Some(title) = H1_REGEX.captures(line).and_then(|caps| caps.get(1)) {
                        return Some(title.as_str().trim().to_owned());
                    }
                }
            }
        }
        None
    }

    /// Generate title from identifier.
    fn title_from_identifier(identifier: &str) -> String {
        identifier
            .replace(['-', '_'], " ")
            .split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl DocumentStore for FsStore {
    fn lookup(&self, identifier: &str) -> Result<Option<StoredDocument>, StoreError> {
        Self::validate_identifier(identifier)?;

        let full_path = self.source_dir.join(format!("{identifier}.md"));
        tracing::debug!(path = %full_path.display(), "Reading document");

        let content = match fs::read_to_string(&full_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::io(e)
                    .with_identifier(identifier)
                    .with_backend(BACKEND));
            }
        };

        let title = Self::extract_title(&content)
            .unwrap_or_else(|| Self::title_from_identifier(identifier));

        Ok(Some(StoredDocument {
            title: Some(title),
            body: Some(content),
        }))
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }
}
