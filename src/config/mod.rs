//! Application configuration.
//!
//! YAML configuration with a layered user override file.

pub mod loader;
pub mod schema;

pub use loader::{ConfigLoader, ConfigSource, LoaderOptions};
pub use schema::AppConfig;
