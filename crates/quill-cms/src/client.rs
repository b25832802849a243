//! HTTP store client.

use std::time::Duration;

use quill_store::{DocumentStore, ErrorStatus, StoreError, StoreErrorKind, StoredDocument};
use ureq::Agent;

use crate::query::build_query_url;
use crate::response::parse_query_response;

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default GROQ query. `$type` and `$slug` are bound per lookup.
pub const DEFAULT_QUERY: &str = "*[_type == $type && slug.current == $slug]{title, body}";

const BACKEND: &str = "Http";

/// Connection settings for [`HttpStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpStoreConfig {
    /// Project identifier, part of the default host name.
    pub project_id: String,
    /// Dataset to query.
    pub dataset: String,
    /// API version: `1`, `X`, or a `YYYY-MM-DD` date.
    pub api_version: String,
    /// Query the edge cache instead of the live API.
    pub use_cdn: bool,
    /// Value bound to `$type`.
    pub document_type: String,
    /// GROQ query text.
    pub query: String,
    /// Overrides the host derived from `project_id`.
    pub base_url: Option<String>,
    /// Global request timeout.
    pub timeout: Duration,
}

impl HttpStoreConfig {
    /// Settings for a project and dataset with all other values defaulted.
    #[must_use]
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            api_version: "2024-01-01".to_owned(),
            use_cdn: false,
            document_type: "post".to_owned(),
            query: DEFAULT_QUERY.to_owned(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Base URL of the query API, without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> String {
        if let Some(base_url) = &self.base_url {
            return base_url.trim_end_matches('/').to_owned();
        }
        let host = if self.use_cdn { "apicdn" } else { "api" };
        format!("https://{}.{host}.sanity.io", self.project_id)
    }
}

/// Document store backed by a headless CMS query API.
pub struct HttpStore {
    agent: Agent,
    config: HttpStoreConfig,
}

impl HttpStore {
    /// Create a store with its own HTTP agent.
    #[must_use]
    pub fn new(config: HttpStoreConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent, config }
    }

    /// Connection settings.
    #[must_use]
    pub fn config(&self) -> &HttpStoreConfig {
        &self.config
    }
}

impl std::fmt::Debug for HttpStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DocumentStore for HttpStore {
    fn lookup(&self, identifier: &str) -> Result<Option<StoredDocument>, StoreError> {
        let url = build_query_url(&self.config, identifier);
        tracing::debug!(url = %url, "Querying CMS");

        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| transport_error(e).with_identifier(identifier))?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| transport_error(e).with_identifier(identifier))?;

        parse_query_response(status, &body).map_err(|e| e.with_identifier(identifier))
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }
}

/// Classify a transport failure (no HTTP status available).
fn transport_error(err: ureq::Error) -> StoreError {
    let timed_out = match &err {
        ureq::Error::Timeout(_) => true,
        ureq::Error::Io(io) => io.kind() == std::io::ErrorKind::TimedOut,
        _ => false,
    };
    let kind = if timed_out {
        StoreErrorKind::Timeout
    } else {
        StoreErrorKind::Unavailable
    };

    StoreError::new(kind)
        .with_status(ErrorStatus::Temporary)
        .with_backend(BACKEND)
        .with_source(err)
}
