//! Browser compatibility data lookups ("burn records").
//!
//! A [`BurnRecord`] states whether an identifier key exists in the
//! compatibility dataset and, when it does, where its documentation lives.
//! Records are written next to the generated pages for a downstream report.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::CompatError;

/// Retry budget given to each record for the downstream refresh workflow.
pub const RETRY_COUNT: u32 = 3;

/// Resolved compatibility status for one identifier key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnRecord {
    /// Identifier key, e.g. `Foo.bar`
    pub key: String,
    /// Key exists in the compatibility dataset
    #[serde(rename = "bcd")]
    pub exists_in_dataset: Option<bool>,
    /// Documentation URL recorded in the dataset
    #[serde(rename = "mdn_url")]
    pub documentation_url: Option<String>,
    /// `Some(true)` when documentation is known to be missing
    #[serde(rename = "mdn_exists", with = "known_missing")]
    pub documentation_known_missing: Option<bool>,
    /// Remaining refresh attempts
    #[serde(rename = "retry")]
    pub retries_remaining: u32,
}

impl BurnRecord {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            exists_in_dataset: None,
            documentation_url: None,
            documentation_known_missing: None,
            retries_remaining: RETRY_COUNT,
        }
    }
}

/// The wire field `mdn_exists` is `false` when documentation is known to be
/// missing, the inverse of the in-memory flag.
mod known_missing {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<bool>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(missing) => s.serialize_some(&!missing),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(Option::<bool>::deserialize(d)?.map(|exists| !exists))
    }
}

/// A browser compatibility dataset keyed by API name, then member name.
#[derive(Debug, Clone, Default)]
pub struct CompatDataset {
    api: Map<String, Value>,
}

impl CompatDataset {
    /// An empty dataset; every lookup reports the key as absent.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps dataset JSON. Accepts a full dataset document with a top-level
    /// `api` object or a bare map of API entries.
    ///
    /// # Errors
    ///
    /// Returns `CompatError::InvalidShape` if the value is not an object.
    pub fn from_value(value: Value) -> Result<Self, CompatError> {
        let Value::Object(mut root) = value else {
            return Err(CompatError::InvalidShape);
        };
        let api = match root.remove("api") {
            Some(Value::Object(api)) => api,
            Some(_) => return Err(CompatError::InvalidShape),
            None => root,
        };
        Ok(Self { api })
    }

    /// Loads the dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CompatError::Read` or `CompatError::Parse` if the file
    /// cannot be read or decoded, or `CompatError::InvalidShape`.
    pub fn load(path: &Path) -> Result<Self, CompatError> {
        let contents = fs::read_to_string(path).map_err(|source| CompatError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&contents).map_err(|source| CompatError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_value(value)?;
        info!(path = %path.display(), apis = dataset.api.len(), "loaded compatibility data");
        Ok(dataset)
    }

    /// Returns `true` if the dataset has an entry for the API name.
    #[must_use]
    pub fn contains_api(&self, name: &str) -> bool {
        self.api.contains_key(name)
    }

    /// Looks up a dotted key: `Api` or `Api.member`.
    fn lookup(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let api = self.api.get(segments.next()?)?;
        match segments.next() {
            Some(member) => api.get(member),
            None => Some(api),
        }
    }

    /// Suggests the closest API name for a name missing from the dataset.
    ///
    /// Returns the closest match if its Damerau-Levenshtein distance is ≤ 3.
    #[must_use]
    pub fn suggest_api(&self, name: &str) -> Option<String> {
        self.api
            .keys()
            .map(|k| (k, strsim::damerau_levenshtein(name, k)))
            .filter(|(_, dist)| *dist <= 3)
            .min_by_key(|(_, dist)| *dist)
            .map(|(k, _)| k.clone())
    }
}

/// Resolves one record per key, preserving key order.
#[must_use]
pub fn resolve_burn_records(keys: &[String], dataset: &CompatDataset) -> Vec<BurnRecord> {
    keys.iter()
        .map(|key| {
            let mut record = BurnRecord::new(key);
            match dataset.lookup(key) {
                None => {
                    record.exists_in_dataset = Some(false);
                    record.documentation_known_missing = Some(true);
                }
                Some(entry) => {
                    record.exists_in_dataset = Some(true);
                    match entry.get("__compat") {
                        Some(compat) => {
                            record.documentation_url = compat
                                .get("mdn_url")
                                .and_then(Value::as_str)
                                .map(str::to_string);
                        }
                        None => record.documentation_known_missing = Some(true),
                    }
                }
            }
            debug!(key = %record.key, exists = ?record.exists_in_dataset, "resolved burn record");
            record
        })
        .collect()
}

/// Writes records to `<out_root>/<name>/<name>.json`.
///
/// # Errors
///
/// Returns `CompatError::Write` if the directory or file cannot be written.
pub fn write_burn_records(
    records: &[BurnRecord],
    out_root: &Path,
    name: &str,
) -> Result<PathBuf, CompatError> {
    let dir = out_root.join(name);
    let path = dir.join(format!("{name}.json"));
    let write_err = |source| CompatError::Write {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(&dir).map_err(write_err)?;
    let json = serde_json::to_string_pretty(records).map_err(std::io::Error::other).map_err(write_err)?;
    fs::write(&path, json).map_err(write_err)?;
    info!(path = %path.display(), records = records.len(), "wrote burn records");
    Ok(path)
}
