//! CLI argument definitions
//!
//! All Clap derive structs for `mdn-helper` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Generate MDN documentation scaffolds from WebIDL interfaces.
#[derive(Parser, Debug)]
#[command(name = "mdn-helper", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "MDN_HELPER_COLOR")]
    pub color: ColorChoice,

    /// Log event format on stderr.
    #[arg(long, default_value = "human", global = true, env = "MDN_HELPER_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build documentation pages for an interface.
    Build(BuildArgs),

    /// Print compatibility records for an interface without writing pages.
    Burn(BurnArgs),

    /// Display the effective configuration.
    Config(ConfigArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// IDL source file (`.idl`, or a `.json` syntax tree). A bare name gets `.idl` appended.
    pub source: PathBuf,

    /// Path to YAML configuration file.
    #[arg(short, long, env = "MDN_HELPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output root directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Template directory.
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Browser compatibility dataset (JSON).
    #[arg(long)]
    pub compat: Option<PathBuf>,

    /// Only write the compatibility record file.
    #[arg(long)]
    pub json_only: bool,

    /// Proceed with flagged or origin-trial interfaces without asking.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `burn`.
#[derive(Args, Debug)]
pub struct BurnArgs {
    /// IDL source file.
    pub source: PathBuf,

    /// Path to YAML configuration file.
    #[arg(short, long, env = "MDN_HELPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Browser compatibility dataset (JSON).
    #[arg(long)]
    pub compat: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "MDN_HELPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `version`.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for informational commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}
