//! `build` command handler
//!
//! Loads configuration, applies CLI overrides and runs the interactive
//! build against stdin/stdout.

use tracing::info;

use crate::build::{BuildOutcome, Builder};
use crate::cli::args::BuildArgs;
use crate::config::ConfigLoader;
use crate::error::HelperError;
use crate::questions::LinePrompter;

/// Build documentation pages for one interface.
///
/// # Errors
///
/// Returns an error if configuration, the IDL source, the compatibility
/// data, prompting or writing fails, and `HelperError::Aborted` when the
/// user declines the flagged-interface confirmation.
pub async fn run(args: &BuildArgs) -> Result<(), HelperError> {
    let mut config = ConfigLoader::from_env(args.config.as_deref()).load()?;
    if let Some(output) = &args.output {
        config.output_directory.clone_from(output);
    }
    if let Some(templates) = &args.templates {
        config.templates_directory.clone_from(templates);
    }

    let dataset = super::load_dataset(args.compat.as_deref(), &config)?;
    let builder = Builder::new(config, dataset, LinePrompter::stdio())
        .json_only(args.json_only)
        .assume_yes(args.yes);

    match builder.build(&args.source).await? {
        BuildOutcome::Completed { pages, burn_file } => {
            info!(pages = pages.len(), burn_file = %burn_file.display(), "done");
            for page in &pages {
                println!("{}", page.display());
            }
            println!("{}", burn_file.display());
            Ok(())
        }
        BuildOutcome::Aborted => Err(HelperError::Aborted),
    }
}
