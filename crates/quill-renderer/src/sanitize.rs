//! Neutralization of executable content.
//!
//! Two entry points:
//! - [`is_safe_link`] / [`is_safe_image`] check URL schemes against an allow-list
//! - [`clean_block_html`] runs author-supplied HTML through `ammonia`

use std::collections::HashSet;

/// Schemes allowed in link destinations.
const LINK_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Schemes allowed in image sources.
const IMAGE_SCHEMES: &[&str] = &["http", "https"];

/// Check whether a link destination is safe to emit as `href`.
///
/// Relative URLs and fragments are always safe.
#[must_use]
pub fn is_safe_link(url: &str) -> bool {
    scheme_allowed(url, LINK_SCHEMES)
}

/// Check whether an image source is safe to emit as `src`.
#[must_use]
pub fn is_safe_image(url: &str) -> bool {
    scheme_allowed(url, IMAGE_SCHEMES)
}

/// Check the URL scheme against an allow-list.
///
/// Browsers drop ASCII whitespace and control characters from URLs before
/// parsing the scheme (`java\tscript:` is `javascript:`), so they are removed
/// here too. A colon only starts a scheme when it appears before any `/`,
/// `?` or `#`; otherwise the URL is relative.
fn scheme_allowed(url: &str, allowed: &[&str]) -> bool {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect();

    match cleaned.find([':', '/', '?', '#']) {
        Some(pos) if cleaned[pos..].starts_with(':') => {
            let scheme = cleaned[..pos].to_ascii_lowercase();
            allowed.contains(&scheme.as_str())
        }
        _ => true,
    }
}

/// Sanitize a block of author-supplied HTML.
///
/// Removes `<script>`/`<style>` elements with their content, event handler
/// attributes, and URLs with schemes outside the link allow-list. Links keep
/// `rel="noopener noreferrer"`.
#[must_use]
pub fn clean_block_html(html: &str) -> String {
    let schemes: HashSet<&str> = LINK_SCHEMES.iter().copied().collect();
    ammonia::Builder::default()
        .url_schemes(schemes)
        .link_rel(Some("noopener noreferrer"))
        .clean(html)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_links_are_safe() {
        assert!(is_safe_link("page"));
        assert!(is_safe_link("./page.md"));
        assert!(is_safe_link("../up"));
        assert!(is_safe_link("/absolute/path"));
        assert!(is_safe_link("#section"));
        assert!(is_safe_link("?q=1"));
        assert!(is_safe_link("path/with:colon"));
        assert!(is_safe_link(""));
    }

    #[test]
    fn test_allowed_schemes() {
        assert!(is_safe_link("https://example.com"));
        assert!(is_safe_link("HTTP://EXAMPLE.COM"));
        assert!(is_safe_link("mailto:someone@example.com"));
        assert!(is_safe_link("tel:+123456"));
    }

    #[test]
    fn test_script_schemes_rejected() {
        assert!(!is_safe_link("javascript:alert(1)"));
        assert!(!is_safe_link("JavaScript:alert(1)"));
        assert!(!is_safe_link("  javascript:alert(1)"));
        assert!(!is_safe_link("java\tscript:alert(1)"));
        assert!(!is_safe_link("java\nscript:alert(1)"));
        assert!(!is_safe_link("\u{1}javascript:alert(1)"));
        assert!(!is_safe_link("vbscript:msgbox(1)"));
        assert!(!is_safe_link("data:text/html,<script>alert(1)</script>"));
        assert!(!is_safe_link(":nothing"));
    }

    #[test]
    fn test_image_schemes() {
        assert!(is_safe_image("https://example.com/cat.png"));
        assert!(is_safe_image("images/cat.png"));
        assert!(!is_safe_image("javascript:alert(1)"));
        assert!(!is_safe_image("data:image/svg+xml;base64,PHN2Zz4="));
        assert!(!is_safe_image("mailto:someone@example.com"));
    }

    #[test]
    fn test_clean_removes_script() {
        let cleaned = clean_block_html("<div><script>alert(1)</script>ok</div>");

        assert!(!cleaned.contains("<script"));
        assert!(!cleaned.contains("alert"));
        assert!(cleaned.contains("ok"));
    }

    #[test]
    fn test_clean_removes_event_handlers() {
        let cleaned = clean_block_html(r#"<div onclick="steal()">hi</div>"#);

        assert!(!cleaned.contains("onclick"));
        assert!(cleaned.contains("hi"));
    }

    #[test]
    fn test_clean_removes_javascript_href() {
        let cleaned = clean_block_html(r#"<a href="javascript:alert(1)">x</a>"#);

        assert!(!cleaned.contains("javascript:"));
    }

    #[test]
    fn test_clean_keeps_safe_markup() {
        let cleaned = clean_block_html("<details><summary>More</summary><p>Text</p></details>");

        assert!(cleaned.contains("<details>"));
        assert!(cleaned.contains("<summary>More</summary>"));
    }
}
