//! `quill fetch` command implementation.

use clap::Args;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fetch command.
#[derive(Args)]
pub(crate) struct FetchArgs {
    /// Document slug.
    slug: String,

    #[command(flatten)]
    pub source: SourceArgs,
}

impl FetchArgs {
    /// Print the raw document as pretty JSON on stdout.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let pipeline = self.source.pipeline()?;
        let doc = pipeline
            .fetcher()
            .fetch(&self.slug)?
            .ok_or(CliError::NotFound(self.slug))?;

        Output::new().document(&serde_json::to_string_pretty(&doc)?)?;
        Ok(())
    }
}
