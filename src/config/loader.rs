//! Configuration loader.
//!
//! Loading pipeline:
//! 1. Read the application file (explicit path, `MDN_HELPER_CONFIG`, or
//!    `./mdn-helper.yaml` when present)
//! 2. Deep-merge the user override file on top (`MDN_HELPER_USER_CONFIG`
//!    or `$HOME/.mdn-helper.yaml` when present)
//! 3. Deserialize to [`AppConfig`]
//! 4. Expand `$HOME` in path values

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use crate::config::schema::AppConfig;
use crate::error::ConfigError;

/// Environment variable naming the application configuration file.
pub const CONFIG_ENV: &str = "MDN_HELPER_CONFIG";

/// Environment variable naming the user override file.
pub const USER_CONFIG_ENV: &str = "MDN_HELPER_USER_CONFIG";

/// Application file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "mdn-helper.yaml";

/// User override file looked up in the home directory.
pub const USER_CONFIG_FILE: &str = ".mdn-helper.yaml";

/// A configuration file and whether it must exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub required: bool,
}

impl ConfigSource {
    #[must_use]
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    #[must_use]
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: false,
        }
    }
}

/// Options for the configuration loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Application configuration file
    pub app: Option<ConfigSource>,

    /// User override file
    pub user: Option<ConfigSource>,

    /// Directory substituted for `$HOME`
    pub home: Option<PathBuf>,
}

impl LoaderOptions {
    /// Resolves file locations from an explicit path and the environment.
    #[must_use]
    pub fn from_env(explicit: Option<&Path>) -> Self {
        let home = std::env::var_os("HOME").map(PathBuf::from);

        let app = explicit
            .map(ConfigSource::required)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(ConfigSource::required))
            .or_else(|| Some(ConfigSource::optional(DEFAULT_CONFIG_FILE)));

        let user = std::env::var_os(USER_CONFIG_ENV)
            .map(ConfigSource::required)
            .or_else(|| {
                home.as_ref()
                    .map(|h| ConfigSource::optional(h.join(USER_CONFIG_FILE)))
            });

        Self { app, user, home }
    }
}

/// Layered configuration loader.
#[derive(Debug)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Loader using [`LoaderOptions::from_env`].
    #[must_use]
    pub fn from_env(explicit: Option<&Path>) -> Self {
        Self::new(LoaderOptions::from_env(explicit))
    }

    /// Loads, merges and deserializes the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingFile` if a required file does not exist,
    /// `ConfigError::Read` if a file cannot be read, or
    /// `ConfigError::ParseError` for invalid YAML or unknown fields.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut root = Value::Mapping(serde_yaml::Mapping::new());
        let mut layers = Vec::new();

        for source in [&self.options.app, &self.options.user].into_iter().flatten() {
            if let Some(layer) = read_layer(source)? {
                deep_merge(&mut root, &layer);
                layers.push(source.path.display().to_string());
            }
        }

        let mut config: AppConfig =
            serde_yaml::from_value(root).map_err(|e| ConfigError::ParseError {
                path: PathBuf::from(layers.join(" + ")),
                message: e.to_string(),
            })?;

        config.expand_home(self.options.home.as_deref())?;
        Ok(config)
    }
}

/// Reads one configuration layer. Absent optional files yield `None`.
///
/// Each layer is checked against the schema on its own, so a bad value is
/// reported against the file that contains it.
fn read_layer(source: &ConfigSource) -> Result<Option<Value>, ConfigError> {
    if !source.path.exists() {
        if source.required {
            return Err(ConfigError::MissingFile {
                path: source.path.clone(),
            });
        }
        return Ok(None);
    }

    let raw = std::fs::read_to_string(&source.path).map_err(|e| ConfigError::Read {
        path: source.path.clone(),
        source: e,
    })?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let value: Value = serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
        path: source.path.clone(),
        message: e.to_string(),
    })?;
    // An empty file parses as null and contributes nothing.
    if value.is_null() {
        return Ok(None);
    }
    serde_yaml::from_value::<AppConfig>(value.clone()).map_err(|e| ConfigError::ParseError {
        path: source.path.clone(),
        message: e.to_string(),
    })?;
    debug!(path = %source.path.display(), "loaded configuration layer");
    Ok(Some(value))
}

/// Deep merges override into base.
///
/// For mappings: recursively merge keys.
/// For other types: override replaces base.
fn deep_merge(base: &mut Value, override_val: &Value) {
    match (base, override_val) {
        (Value::Mapping(base_map), Value::Mapping(override_map)) => {
            for (key, override_value) in override_map {
                if let Some(base_value) = base_map.get_mut(key) {
                    deep_merge(base_value, override_value);
                } else {
                    base_map.insert(key.clone(), override_value.clone());
                }
            }
        }
        (base, override_val) => {
            *base = override_val.clone();
        }
    }
}
