//! `mdn-helper` - MDN documentation scaffolds from WebIDL
//!
//! Parses a WebIDL interface, classifies its members, resolves their
//! browser compatibility records and renders one HTML page per documented
//! member from templates, asking the author for every placeholder.

pub mod build;
pub mod cli;
pub mod compat;
pub mod config;
pub mod error;
pub mod idl;
pub mod model;
pub mod observability;
pub mod page;
pub mod questions;
