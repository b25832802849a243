//! CLI error types.

use quill_config::ConfigError;
use quill_core::FetchError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Load(String),

    #[error("{0}")]
    Build(String),
}
