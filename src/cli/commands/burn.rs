//! `burn` command handler
//!
//! Resolves compatibility records for an interface and prints them.

use crate::build::load_model;
use crate::cli::args::{BurnArgs, OutputFormat};
use crate::compat::{BurnRecord, resolve_burn_records};
use crate::config::ConfigLoader;
use crate::error::HelperError;

/// Print the burn records for one interface.
///
/// # Errors
///
/// Returns an error if configuration, the IDL source or the compatibility
/// data cannot be loaded.
pub fn run(args: &BurnArgs) -> Result<(), HelperError> {
    let config = ConfigLoader::from_env(args.config.as_deref()).load()?;
    let model = load_model(&args.source)?;
    let dataset = super::load_dataset(args.compat.as_deref(), &config)?;
    let records = resolve_burn_records(&model.keys(), &dataset);

    match args.format {
        OutputFormat::Human => print!("{}", format_human(&records)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
    }
    Ok(())
}

fn mark(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

fn format_human(records: &[BurnRecord]) -> String {
    let width = records.iter().map(|r| r.key.len()).max().unwrap_or(0);
    let mut out = String::new();
    for record in records {
        let exists = mark(record.exists_in_dataset);
        let url = record.documentation_url.as_deref().unwrap_or("-");
        out.push_str(&format!("{:<width$}  bcd: {exists:<3}  {url}\n", record.key));
    }
    out
}
