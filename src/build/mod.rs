//! Build driver.
//!
//! Runs the documentation pipeline for one IDL source: model construction,
//! blacklist and flag checks, burn records, then one page at a time in
//! page-list order. Pages are processed strictly sequentially; the only
//! suspension points are prompter calls.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::compat::{self, CompatDataset};
use crate::config::AppConfig;
use crate::error::{ConfigError, HelperError};
use crate::idl;
use crate::model::{InterfaceModel, PageType};
use crate::page::{self, Page};
use crate::questions::{self, Confirmation, Prompter, QuestionRegistry, QuestionSettings};

/// Help key for the shared question banner.
pub const SHARED_HELP_KEY: &str = "shared";

/// Shared token answered with the interface name.
pub const NAME_TOKEN: &str = "name";

/// Result of a build that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// All output was written.
    Completed {
        /// Written pages, in page-list order
        pages: Vec<PathBuf>,
        /// Burn record file
        burn_file: PathBuf,
    },
    /// The user declined the flagged-interface confirmation; nothing written.
    Aborted,
}

impl From<&AppConfig> for QuestionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            hidden: config.hidden_questions.clone(),
            prompts: config.prompts.clone(),
            help: config.help.clone(),
        }
    }
}

/// Loads an IDL source and builds its interface model.
///
/// # Errors
///
/// Returns `HelperError::Idl` if the source cannot be read or parsed, or
/// does not describe an interface.
pub fn load_model(source: &Path) -> Result<InterfaceModel, HelperError> {
    let defs = idl::load_definitions(source)?;
    let label = source.file_name().map_or_else(
        || source.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    Ok(InterfaceModel::from_definitions(&defs, &label)?)
}

/// Builds documentation scaffolds for interfaces.
pub struct Builder<P> {
    config: AppConfig,
    settings: QuestionSettings,
    dataset: CompatDataset,
    prompter: P,
    json_only: bool,
    assume_yes: bool,
}

impl<P> std::fmt::Debug for Builder<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("config", &self.config)
            .field("json_only", &self.json_only)
            .field("assume_yes", &self.assume_yes)
            .finish_non_exhaustive()
    }
}

impl<P: Prompter> Builder<P> {
    #[must_use]
    pub fn new(config: AppConfig, dataset: CompatDataset, prompter: P) -> Self {
        let settings = QuestionSettings::from(&config);
        Self {
            config,
            settings,
            dataset,
            prompter,
            json_only: false,
            assume_yes: false,
        }
    }

    /// Only write the burn record file; skip pages and questions.
    #[must_use]
    pub const fn json_only(mut self, json_only: bool) -> Self {
        self.json_only = json_only;
        self
    }

    /// Answer the flagged-interface confirmation with yes.
    #[must_use]
    pub const fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    #[must_use]
    pub const fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Runs the full pipeline for one IDL source.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by model construction, the blacklist
    /// check, prompting, template loading or writing.
    pub async fn build(&self, source: &Path) -> Result<BuildOutcome, HelperError> {
        let model = load_model(source)?;
        self.build_model(&model).await
    }

    /// Runs the pipeline for an already-built model.
    ///
    /// # Errors
    ///
    /// See [`Builder::build`].
    pub async fn build_model(&self, model: &InterfaceModel) -> Result<BuildOutcome, HelperError> {
        let name = model.name.as_str();
        info!(interface = name, "building");

        if self.config.is_blacklisted(name) {
            return Err(ConfigError::Blacklisted(name.to_string()).into());
        }

        if let Some(warning) = model.flag_warning() {
            if self.assume_yes {
                warn!(interface = name, "{warning}");
            } else if self.prompter.confirm(&warning).await? == Confirmation::Abort {
                info!(interface = name, "build cancelled");
                return Ok(BuildOutcome::Aborted);
            }
        }

        let pages = model.page_specs();
        let templates = if self.json_only {
            IndexMap::new()
        } else {
            self.load_templates(pages.iter().map(|p| p.page_type))?
        };

        if !self.dataset.contains_api(name) {
            if let Some(suggestion) = self.dataset.suggest_api(name) {
                info!(interface = name, suggestion = %suggestion, "not in compatibility data; did you mean '{suggestion}'?");
            }
        }
        let records = compat::resolve_burn_records(&model.keys(), &self.dataset);
        let out = &self.config.output_directory;
        let burn_file = compat::write_burn_records(&records, out, name)?;

        if self.json_only {
            return Ok(BuildOutcome::Completed {
                pages: Vec::new(),
                burn_file,
            });
        }

        let mut shared =
            QuestionRegistry::new(questions::shared_intro(self.settings.help_for(SHARED_HELP_KEY)));
        shared.add_answered(PageType::Interface.as_str(), name);
        shared.add_answered(NAME_TOKEN, name);

        let mut written = Vec::with_capacity(pages.len());
        for spec in &pages {
            let template = templates
                .get(&spec.page_type)
                .cloned()
                .unwrap_or_default();
            let mut page = Page::new(
                name,
                &spec.name,
                spec.page_type,
                template,
                &mut shared,
                &self.settings,
            );
            questions::resolve(&mut shared, page.questions_mut(), &self.prompter).await?;
            written.push(page.write(&shared, out)?);
        }

        info!(interface = name, pages = written.len(), "build complete");
        Ok(BuildOutcome::Completed {
            pages: written,
            burn_file,
        })
    }

    /// Reads each distinct template once, before anything is written.
    fn load_templates(
        &self,
        types: impl Iterator<Item = PageType>,
    ) -> Result<IndexMap<PageType, String>, HelperError> {
        let mut templates = IndexMap::new();
        for page_type in types {
            if !templates.contains_key(&page_type) {
                let template = page::load_template(&self.config.templates_directory, page_type)?;
                templates.insert(page_type, template);
            }
        }
        Ok(templates)
    }
}
