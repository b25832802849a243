//! HTML element writers.
//!
//! Markup follows what GitHub produces for rendered markdown, so GitHub
//! markdown stylesheets apply without changes.

use std::fmt::Write;

use pulldown_cmark::BlockQuoteKind;

use crate::options::LinkTarget;
use crate::state::escape_html;

/// GitHub alert kinds (`> [!NOTE]`, `> [!TIP]`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    /// `> [!NOTE]`
    Note,
    /// `> [!TIP]`
    Tip,
    /// `> [!IMPORTANT]`
    Important,
    /// `> [!WARNING]`
    Warning,
    /// `> [!CAUTION]`
    Caution,
}

impl From<BlockQuoteKind> for AlertKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => Self::Note,
            BlockQuoteKind::Tip => Self::Tip,
            BlockQuoteKind::Important => Self::Important,
            BlockQuoteKind::Warning => Self::Warning,
            BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

impl AlertKind {
    fn class_and_title(self) -> (&'static str, &'static str) {
        match self {
            Self::Note => ("note", "Note"),
            Self::Tip => ("tip", "Tip"),
            Self::Important => ("important", "Important"),
            Self::Warning => ("warning", "Warning"),
            Self::Caution => ("caution", "Caution"),
        }
    }
}

/// Wrap rendered HTML in the container GitHub markdown stylesheets target.
///
/// # Examples
///
/// ```
/// use quill_renderer::wrap_markdown_body;
///
/// assert_eq!(
///     wrap_markdown_body("<p>Hi</p>"),
///     r#"<article class="markdown-body"><p>Hi</p></article>"#
/// );
/// ```
#[must_use]
pub fn wrap_markdown_body(html: &str) -> String {
    format!(r#"<article class="markdown-body">{html}</article>"#)
}

pub(crate) fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
    if let Some(lang) = lang {
        let _ = write!(
            out,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(content)
        );
    } else {
        let _ = write!(out, "<pre><code>{}</code></pre>", escape_html(content));
    }
}

pub(crate) fn alert_start(kind: AlertKind, out: &mut String) {
    let (class, title) = kind.class_and_title();
    let _ = write!(
        out,
        r#"<div class="markdown-alert markdown-alert-{class}"><p class="markdown-alert-title">{title}</p>"#
    );
}

pub(crate) fn alert_end(out: &mut String) {
    out.push_str("</div>");
}

pub(crate) fn image(src: &str, alt: &str, title: &str, out: &mut String) {
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };
    let _ = write!(
        out,
        r#"<img src="{}"{title_attr} alt="{}">"#,
        escape_html(src),
        escape_html(alt)
    );
}

pub(crate) fn link_start(href: &str, title: &str, target: LinkTarget) -> String {
    let mut tag = format!(r#"<a href="{}""#, escape_html(href));
    if !title.is_empty() {
        let _ = write!(tag, r#" title="{}""#, escape_html(title));
    }
    if target == LinkTarget::NewContext {
        tag.push_str(r#" target="_blank" rel="noopener noreferrer""#);
    }
    tag.push('>');
    tag
}

pub(crate) fn task_list_marker(checked: bool, out: &mut String) {
    if checked {
        out.push_str(r#"<input type="checkbox" class="task-list-item-checkbox" checked disabled> "#);
    } else {
        out.push_str(r#"<input type="checkbox" class="task-list-item-checkbox" disabled> "#);
    }
}
