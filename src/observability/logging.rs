//! Diagnostic log setup.
//!
//! Build progress, compatibility hints and warnings about unnamed members
//! are `tracing` events written to stderr. Stdout carries only question
//! banners, prompts and command output, so a build can be piped or
//! scripted without log lines mixing into the answers.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable holding an `EnvFilter` directive, e.g.
/// `mdn_helper::page=debug`. Takes precedence over `-v` flags.
pub const LOG_LEVEL_ENV: &str = "MDN_HELPER_LOG_LEVEL";

/// How log events are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// One line per event, colored on a terminal
    #[default]
    Human,
    /// One JSON object per event
    Json,
}

/// Level directive for a `-v` count. A plain build reports warnings only,
/// such as getters whose name could not be inferred.
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn filter_for(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)))
}

/// `NO_COLOR` disables automatic coloring.
fn use_ansi(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

/// Installs the stderr subscriber for this process.
///
/// Module targets are shown from `-vv` upward, where events from the IDL
/// parser and the page renderer become hard to tell apart. A second call
/// leaves the first subscriber in place.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Human => builder.with_ansi(use_ansi(color)).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
