//! `quill build` command implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Args;
use quill_core::{DocumentPipeline, DocumentView};
use quill_store::DocumentStore;
use rayon::prelude::*;

use super::{SourceArgs, load_failure, slug_file_name, standalone_page};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Document slugs to render.
    #[arg(required = true)]
    slugs: Vec<String>,

    /// Output directory for the generated pages.
    #[arg(short, long, default_value = "site")]
    out_dir: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Outcome of building one slug.
#[derive(Debug)]
enum BuildOutcome {
    Written { path: PathBuf, warnings: usize },
    NotFound,
    Failed(String),
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let pipeline = self.source.pipeline()?;

        std::fs::create_dir_all(&self.out_dir)?;
        output.info(&format!("Output: {}", self.out_dir.display()));

        let outcomes = build_all(&pipeline, &self.slugs, &self.out_dir);

        let mut failed = 0;
        for (slug, outcome) in self.slugs.iter().zip(&outcomes) {
            match outcome {
                BuildOutcome::Written { path, warnings: 0 } => {
                    output.info(&format!("  {slug} -> {}", path.display()));
                }
                BuildOutcome::Written { path, warnings } => output.warning(&format!(
                    "  {slug} -> {} ({warnings} warnings)",
                    path.display()
                )),
                BuildOutcome::NotFound => {
                    failed += 1;
                    output.error(&format!("  {slug}: not found"));
                }
                BuildOutcome::Failed(message) => {
                    failed += 1;
                    output.error(&format!("  {slug}: {message}"));
                }
            }
        }

        if failed > 0 {
            return Err(CliError::Build(format!(
                "{failed} of {} documents failed",
                self.slugs.len()
            )));
        }
        output.success(&format!("Built {} documents", self.slugs.len()));
        Ok(())
    }
}

/// Fetch, render and write every slug on the global rayon pool.
///
/// Results are returned in input order. Slugs that map to the same output
/// file fail without being fetched.
fn build_all<S: DocumentStore>(
    pipeline: &DocumentPipeline<S>,
    slugs: &[String],
    out_dir: &Path,
) -> Vec<BuildOutcome> {
    let mut file_names: HashMap<String, usize> = HashMap::new();
    for slug in slugs {
        *file_names.entry(slug_file_name(slug)).or_default() += 1;
    }

    slugs
        .par_iter()
        .map(|slug| {
            let file_name = slug_file_name(slug);
            if file_names.get(&file_name).copied().unwrap_or_default() > 1 {
                return BuildOutcome::Failed(format!(
                    "output file {file_name} is shared with another slug"
                ));
            }
            build_one(pipeline, slug, out_dir.join(file_name))
        })
        .collect()
}

fn build_one<S: DocumentStore>(
    pipeline: &DocumentPipeline<S>,
    slug: &str,
    path: PathBuf,
) -> BuildOutcome {
    let rendered = match DocumentView::from_result(pipeline.load(slug)) {
        DocumentView::Ready(rendered) => rendered,
        DocumentView::NotFound => return BuildOutcome::NotFound,
        view => return BuildOutcome::Failed(load_failure(view)),
    };

    match std::fs::write(&path, standalone_page(&rendered)) {
        Ok(()) => BuildOutcome::Written {
            path,
            warnings: rendered.warnings.len(),
        },
        Err(err) => BuildOutcome::Failed(format!("cannot write {}: {err}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use quill_renderer::RenderOptions;
    use quill_store::MockStore;

    use super::*;

    #[test]
    fn test_build_all_writes_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = DocumentPipeline::new(
            MockStore::new()
                .with_document("a", "A", "# A")
                .with_document("b", "B", "<script>x</script>"),
            RenderOptions::default(),
        );
        let slugs = vec!["a".to_owned(), "missing".to_owned(), "b".to_owned()];

        let outcomes = build_all(&pipeline, &slugs, dir.path());

        assert!(matches!(&outcomes[0], BuildOutcome::Written { warnings: 0, .. }));
        assert!(matches!(outcomes[1], BuildOutcome::NotFound));
        assert!(matches!(&outcomes[2], BuildOutcome::Written { warnings: 1, .. }));

        let page = std::fs::read_to_string(dir.path().join("a.html")).unwrap();
        assert!(page.contains(r#"<h1 id="a">A</h1>"#));
        let page = std::fs::read_to_string(dir.path().join("b.html")).unwrap();
        assert!(!page.contains("<script"));
    }

    #[test]
    fn test_build_one_empty_slug_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = DocumentPipeline::new(MockStore::new(), RenderOptions::default());

        let outcome = build_one(&pipeline, "", dir.path().join("index.html"));

        assert!(matches!(outcome, BuildOutcome::Failed(_)));
        assert!(!dir.path().join("index.html").exists());
        assert_eq!(pipeline.fetcher().store().lookup_count(), 0);
    }

    #[test]
    fn test_build_all_rejects_colliding_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = DocumentPipeline::new(
            MockStore::new()
                .with_document("a/b", "Nested", "nested")
                .with_document("a_b", "Flat", "flat")
                .with_document("c", "C", "c"),
            RenderOptions::default(),
        );
        let slugs = vec![
            "a/b".to_owned(),
            "a_b".to_owned(),
            "c".to_owned(),
            "c".to_owned(),
        ];

        let outcomes = build_all(&pipeline, &slugs, dir.path());

        assert!(outcomes.iter().all(|o| matches!(o, BuildOutcome::Failed(_))));
        assert!(!dir.path().join("a_b.html").exists());
        assert!(!dir.path().join("c.html").exists());
        assert_eq!(pipeline.fetcher().store().lookup_count(), 0);
    }
}
