//! Query URL construction.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::client::HttpStoreConfig;

/// RFC 3986 unreserved characters: A-Z a-z 0-9 - . _ ~
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(input: &str) -> String {
    utf8_percent_encode(input, QUERY_ENCODE_SET).to_string()
}

/// Encode a query parameter value as a JSON string literal.
fn json_param(value: &str) -> String {
    encode(&serde_json::Value::from(value).to_string())
}

/// Build the lookup URL for a slug.
///
/// The slug and document type are bound as JSON-encoded `$slug` and `$type`
/// parameters; nothing is interpolated into the query text.
#[must_use]
pub fn build_query_url(config: &HttpStoreConfig, identifier: &str) -> String {
    format!(
        "{}/v{}/data/query/{}?query={}&%24slug={}&%24type={}",
        config.api_base(),
        config.api_version,
        encode(&config.dataset),
        encode(&config.query),
        json_param(identifier),
        json_param(&config.document_type),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_build_query_url() {
        let config = HttpStoreConfig {
            query: "*[slug.current == $slug]".to_owned(),
            ..HttpStoreConfig::new("abc123", "production")
        };

        assert_eq!(
            build_query_url(&config, "hello-world"),
            "https://abc123.api.sanity.io/v2024-01-01/data/query/production\
             ?query=%2A%5Bslug.current%20%3D%3D%20%24slug%5D\
             &%24slug=%22hello-world%22&%24type=%22post%22"
        );
    }

    #[test]
    fn test_build_query_url_escapes_slug() {
        let config = HttpStoreConfig::new("abc123", "production");

        let url = build_query_url(&config, r#"a"&b=c"#);

        assert!(url.contains("&%24slug=%22a%5C%22%26b%3Dc%22&"));
    }

    #[test]
    fn test_build_query_url_cdn_and_version() {
        let config = HttpStoreConfig {
            use_cdn: true,
            api_version: "X".to_owned(),
            ..HttpStoreConfig::new("abc123", "staging")
        };

        let url = build_query_url(&config, "a");

        assert!(url.starts_with("https://abc123.apicdn.sanity.io/vX/data/query/staging?"));
    }
}
