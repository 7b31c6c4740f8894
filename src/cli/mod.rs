//! Command-line interface
//!
//! Argument definitions and command handlers for the `mdn-helper` binary.

pub mod args;
pub mod commands;
