//! Query response handling.

use quill_store::{ErrorStatus, StoreError, StoreErrorKind, StoredDocument};
use serde::Deserialize;

const BACKEND: &str = "Http";

/// Longest error body excerpt kept in error messages.
const MAX_ERROR_BODY: usize = 200;

/// Envelope of a query response. A missing `result` is malformed; only an
/// explicit `null` means no match.
#[derive(Deserialize)]
struct QueryResponse {
    result: serde_json::Value,
}

/// Map a non-success HTTP status to a store error.
///
/// Returns `None` for 2xx statuses.
#[must_use]
pub fn classify_status(status: u16) -> Option<StoreError> {
    let (kind, retry) = match status {
        200..=299 => return None,
        429 => (StoreErrorKind::RateLimited, ErrorStatus::Persistent),
        500..=599 => (StoreErrorKind::Unavailable, ErrorStatus::Persistent),
        401 | 403 => (StoreErrorKind::PermissionDenied, ErrorStatus::Permanent),
        _ => (StoreErrorKind::Other, ErrorStatus::Permanent),
    };
    Some(
        StoreError::new(kind)
            .with_status(retry)
            .with_backend(BACKEND)
            .with_message(format!("HTTP {status}")),
    )
}

/// Interpret a query API response.
///
/// The result may be a list (zero or one entries), a single record, or
/// `null`.
///
/// # Errors
///
/// - status-derived errors from [`classify_status`]
/// - [`StoreErrorKind::InvalidResponse`] for malformed JSON, a missing
///   `result` field, or when more than one record matches
pub fn parse_query_response(
    status: u16,
    body: &str,
) -> Result<Option<StoredDocument>, StoreError> {
    if let Some(err) = classify_status(status) {
        let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
        let message = if excerpt.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status} - {}", excerpt.trim())
        };
        return Err(err.with_message(message));
    }

    let response: QueryResponse = serde_json::from_str(body).map_err(invalid_response)?;

    match response.result {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Array(mut records) => match records.len() {
            0 => Ok(None),
            1 => decode_record(records.swap_remove(0)).map(Some),
            n => Err(StoreError::new(StoreErrorKind::InvalidResponse)
                .with_backend(BACKEND)
                .with_message(format!("{n} documents match"))),
        },
        record @ serde_json::Value::Object(_) => decode_record(record).map(Some),
        _ => Err(StoreError::new(StoreErrorKind::InvalidResponse)
            .with_backend(BACKEND)
            .with_message("result is not a document")),
    }
}

fn decode_record(value: serde_json::Value) -> Result<StoredDocument, StoreError> {
    serde_json::from_value(value).map_err(invalid_response)
}

fn invalid_response(err: serde_json::Error) -> StoreError {
    StoreError::new(StoreErrorKind::InvalidResponse)
        .with_backend(BACKEND)
        .with_source(err)
}
