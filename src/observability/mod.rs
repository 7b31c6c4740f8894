//! Observability module
//!
//! Structured logging for `mdn-helper` runs. Logs go to stderr so they never
//! interleave with the interactive question stream on stdout.

pub mod logging;

pub use logging::{LOG_LEVEL_ENV, LogFormat, init_logging};
