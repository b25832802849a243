//! Headless CMS document store.
//!
//! [`HttpStore`] resolves document slugs with one GROQ query against a
//! Sanity-compatible HTTP query API:
//!
//! ```text
//! GET {base}/v{api_version}/data/query/{dataset}?query=...&$slug="..."&$type="..."
//! ```
//!
//! The response is `{"result": ...}` where the result is a list of
//! matching records, a single record, or `null`.

mod client;
mod query;
mod response;

pub use client::{DEFAULT_QUERY, DEFAULT_TIMEOUT, HttpStore, HttpStoreConfig};
pub use query::build_query_url;
pub use response::{classify_status, parse_query_response};
