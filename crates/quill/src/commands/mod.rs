//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod fetch;
pub(crate) mod render;

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use quill_cms::{HttpStore, HttpStoreConfig};
use quill_config::{CliSettings, CmsConfig, Config};
use quill_core::{DocumentPipeline, DocumentView, RenderedDocument};
use quill_renderer::{LinkTarget, wrap_markdown_body};
use quill_store::{DocumentStore, FsStore};

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use fetch::FetchArgs;
pub(crate) use render::RenderArgs;

/// Store and rendering arguments shared by all commands.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Local markdown directory (overrides config; ignored with [cms]).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Pass block-level HTML through the sanitizer instead of escaping it.
    #[arg(long)]
    allow_raw_markup: bool,

    /// Open generated links in a new tab.
    #[arg(long)]
    new_tab: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SourceArgs {
    /// Load configuration with these arguments applied.
    fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            allow_raw_markup: self.allow_raw_markup.then_some(true),
            link_target: self.new_tab.then_some(LinkTarget::NewContext),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Build the fetch and render pipeline described by the configuration.
    pub(crate) fn pipeline(&self) -> Result<DocumentPipeline<Box<dyn DocumentStore>>, CliError> {
        let config = self.load_config()?;
        Ok(DocumentPipeline::new(open_store(&config), config.render))
    }
}

/// Select the document store: the CMS when `[cms]` is configured, the local
/// source directory otherwise.
fn open_store(config: &Config) -> Box<dyn DocumentStore> {
    match &config.cms {
        Some(cms) => {
            tracing::info!(project_id = %cms.project_id, dataset = %cms.dataset, "Using CMS store");
            Box::new(HttpStore::new(http_store_config(cms)))
        }
        None => {
            tracing::info!(source_dir = %config.docs_resolved.source_dir.display(), "Using local store");
            Box::new(FsStore::new(config.docs_resolved.source_dir.clone()))
        }
    }
}

fn http_store_config(cms: &CmsConfig) -> HttpStoreConfig {
    HttpStoreConfig {
        project_id: cms.project_id.clone(),
        dataset: cms.dataset.clone(),
        api_version: cms.api_version.clone(),
        use_cdn: cms.use_cdn,
        document_type: cms.document_type.clone(),
        query: cms.query.clone(),
        base_url: cms.base_url.clone(),
        timeout: Duration::from_secs(cms.timeout_secs),
    }
}

/// Wrap a rendered document in a minimal standalone HTML page.
pub(crate) fn standalone_page(doc: &RenderedDocument) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = doc.title_markup,
        body = wrap_markdown_body(&doc.body_markup),
    )
}

/// Describe a view that did not produce a document.
pub(crate) fn load_failure(view: DocumentView) -> String {
    match view {
        DocumentView::Failed {
            message,
            retryable: true,
        } => format!("{message} (temporary, try again)"),
        DocumentView::Failed { message, .. } => message,
        DocumentView::NotFound => "not found".to_owned(),
        DocumentView::Loading | DocumentView::Ready(_) => "document did not load".to_owned(),
    }
}

/// Make a slug usable as a file name.
pub(crate) fn slug_file_name(slug: &str) -> String {
    let name: String = slug
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    format!("{}.html", name.trim_start_matches('.'))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quill_renderer::escape_html;

    use super::*;

    fn rendered(title: &str, body: &str) -> RenderedDocument {
        RenderedDocument {
            identifier: "a".to_owned(),
            title_markup: escape_html(title),
            body_markup: body.to_owned(),
            toc: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_standalone_page() {
        let page = standalone_page(&rendered("A & B", "<p>x</p>"));

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>A &amp; B</title>"));
        assert!(page.contains(r#"<article class="markdown-body"><p>x</p></article>"#));
    }

    #[test]
    fn test_load_failure_marks_retryable() {
        let retryable = DocumentView::Failed {
            message: "timeout".to_owned(),
            retryable: true,
        };
        let permanent = DocumentView::Failed {
            message: "denied".to_owned(),
            retryable: false,
        };

        assert_eq!(load_failure(retryable), "timeout (temporary, try again)");
        assert_eq!(load_failure(permanent), "denied");
    }

    #[test]
    fn test_slug_file_name() {
        assert_eq!(slug_file_name("hello-world"), "hello-world.html");
        assert_eq!(slug_file_name("blog/2024/post"), "blog_2024_post.html");
        assert_eq!(slug_file_name("../etc"), "_etc.html");
    }

    #[test]
    fn test_http_store_config_from_cms() {
        let config: Config = toml_config(
            "[cms]\nproject_id = \"abc\"\ndataset = \"prod\"\nuse_cdn = true\ntimeout_secs = 5\n",
        );

        let store_config = http_store_config(config.cms.as_ref().unwrap());

        assert_eq!(store_config.project_id, "abc");
        assert!(store_config.use_cdn);
        assert_eq!(store_config.timeout, Duration::from_secs(5));
        assert_eq!(store_config.api_base(), "https://abc.apicdn.sanity.io");
    }

    #[test]
    fn test_open_store_without_cms_is_local() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "").unwrap();
        let config = Config::load(Some(&path), None).unwrap();

        let store = open_store(&config);

        assert_eq!(store.backend(), "Fs");
    }

    fn toml_config(content: &str) -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, content).unwrap();
        Config::load(Some(&path), None).unwrap()
    }
}
