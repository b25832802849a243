//! `quill render` command implementation.

use std::path::PathBuf;

use clap::Args;
use quill_core::DocumentView;

use super::{SourceArgs, load_failure, standalone_page};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Document slug.
    slug: String,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit a complete HTML page instead of a fragment.
    #[arg(long)]
    standalone: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let pipeline = self.source.pipeline()?;

        let rendered = match DocumentView::from_result(pipeline.load(&self.slug)) {
            DocumentView::Ready(rendered) => rendered,
            DocumentView::NotFound => return Err(CliError::NotFound(self.slug)),
            view => return Err(CliError::Load(load_failure(view))),
        };

        for warning in &rendered.warnings {
            output.warning(&format!("Warning: {warning}"));
        }

        let html = if self.standalone {
            standalone_page(&rendered)
        } else {
            rendered.body_markup
        };

        match self.output {
            Some(path) => {
                std::fs::write(&path, html)?;
                output.success(&format!("Rendered {} to {}", self.slug, path.display()));
            }
            None => output.document(&html)?,
        }
        Ok(())
    }
}
