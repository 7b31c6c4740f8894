//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod build;
pub mod burn;
pub mod config;
pub mod version;

use std::path::Path;

use tracing::warn;

use crate::cli::args::{Cli, Commands};
use crate::compat::CompatDataset;
use crate::config::AppConfig;
use crate::error::HelperError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), HelperError> {
    match cli.command {
        Commands::Build(args) => build::run(&args).await,
        Commands::Burn(args) => burn::run(&args),
        Commands::Config(args) => config::run(&args),
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Loads the compatibility dataset named by `--compat` or the configuration.
///
/// Without either, an empty dataset is used and every key resolves as absent.
fn load_dataset(explicit: Option<&Path>, config: &AppConfig) -> Result<CompatDataset, HelperError> {
    match explicit.or(config.compat_data.as_deref()) {
        Some(path) => Ok(CompatDataset::load(path)?),
        None => {
            warn!("no compatibility data configured; all keys will resolve as absent");
            Ok(CompatDataset::empty())
        }
    }
}
