//! `config` command handler
//!
//! Prints the effective configuration after layering and `$HOME` expansion.

use crate::cli::args::{ConfigArgs, OutputFormat};
use crate::config::ConfigLoader;
use crate::error::HelperError;

/// Display the effective configuration.
///
/// # Errors
///
/// Returns an error if configuration loading or serialization fails.
pub fn run(args: &ConfigArgs) -> Result<(), HelperError> {
    let config = ConfigLoader::from_env(args.config.as_deref()).load()?;
    match args.format {
        OutputFormat::Human => {
            let yaml = serde_yaml::to_string(&config).map_err(std::io::Error::other)?;
            print!("{yaml}");
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}
