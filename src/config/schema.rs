//! Application configuration schema.
//!
//! Every field has a default, so an empty or absent file yields a usable
//! configuration.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Placeholder expanded to the user's home directory in path values.
pub const HOME_PLACEHOLDER: &str = "$HOME";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Root directory for generated pages and burn records
    pub output_directory: PathBuf,

    /// Directory holding `<pageType>.html` templates
    pub templates_directory: PathBuf,

    /// Browser compatibility dataset (JSON)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compat_data: Option<PathBuf>,

    /// Whether `blacklist` is enforced
    pub use_blacklist: bool,

    /// Interface names that `build` refuses
    pub blacklist: Vec<String>,

    /// Tokens answered with the empty string and never prompted
    pub hidden_questions: Vec<String>,

    /// Prompt text per token
    pub prompts: IndexMap<String, String>,

    /// Help text per page type; `shared` is shown under the shared banner
    pub help: IndexMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from(format!("{HOME_PLACEHOLDER}/mdn-helper/out")),
            templates_directory: PathBuf::from("templates"),
            compat_data: None,
            use_blacklist: false,
            blacklist: Vec::new(),
            hidden_questions: Vec::new(),
            prompts: IndexMap::new(),
            help: IndexMap::new(),
        }
    }
}

impl AppConfig {
    /// Returns `true` if blacklisting is enabled and lists `name`.
    #[must_use]
    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.use_blacklist && self.blacklist.iter().any(|b| b == name)
    }

    /// Replaces a leading `$HOME` in path values with `home`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HomeUnset` if a path starts with `$HOME` and
    /// `home` is `None`.
    pub fn expand_home(&mut self, home: Option<&Path>) -> Result<(), ConfigError> {
        let paths = [
            ("output_directory", Some(&mut self.output_directory)),
            ("templates_directory", Some(&mut self.templates_directory)),
            ("compat_data", self.compat_data.as_mut()),
        ];
        for (field, path) in paths {
            let Some(path) = path else {
                continue;
            };
            let Ok(rest) = path.strip_prefix(HOME_PLACEHOLDER) else {
                continue;
            };
            let Some(home) = home else {
                return Err(ConfigError::HomeUnset {
                    field,
                    path: path.clone(),
                });
            };
            *path = home.join(rest);
        }
        Ok(())
    }
}
