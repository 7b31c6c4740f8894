//! Page rendering.
//!
//! A page is a template with `[[token]]` and `[[shared:token]]`
//! placeholders. Scanning registers each token with the page-local or the
//! shared [`QuestionRegistry`]; rendering substitutes the answers once the
//! resolution protocol has filled them in.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, info};

use crate::error::RenderError;
use crate::model::PageType;
use crate::questions::{QuestionRegistry, QuestionSettings};

/// Matches `[[name]]` and `[[shared:name]]`.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[(?:shared:)?([\w-]+)\]\]").expect("valid regex"));

const SHARED_PREFIX: &str = "[[shared:";

fn is_shared(caps: &Captures<'_>) -> bool {
    caps.get(0)
        .is_some_and(|m| m.as_str().starts_with(SHARED_PREFIX))
}

/// One output page for a parent interface.
#[derive(Debug, Clone)]
pub struct Page {
    parent: String,
    name: String,
    page_type: PageType,
    template: String,
    questions: QuestionRegistry,
}

impl Page {
    /// Creates a page and scans its template.
    ///
    /// The local registry starts with the page type answered by the page
    /// name, so `[[method]]` in a method template needs no prompt.
    #[must_use]
    pub fn new(
        parent: &str,
        name: &str,
        page_type: PageType,
        template: String,
        shared: &mut QuestionRegistry,
        settings: &QuestionSettings,
    ) -> Self {
        let intro = format!(
            "\nQuestions for the {name} {page_type} page\n{}{}\n",
            "-".repeat(80),
            settings.help_for(page_type.as_str())
        );
        let mut questions = QuestionRegistry::new(intro);
        questions.add_answered(page_type.as_str(), name);

        let mut page = Self {
            parent: parent.to_string(),
            name: name.to_string(),
            page_type,
            template,
            questions,
        };
        page.scan(shared, settings);
        page
    }

    /// Registers every template token: `shared:` tokens with `shared`, the
    /// rest with this page's registry.
    pub fn scan(&mut self, shared: &mut QuestionRegistry, settings: &QuestionSettings) {
        for caps in TOKEN_RE.captures_iter(&self.template) {
            let token = &caps[1];
            let registry = if is_shared(&caps) {
                &mut *shared
            } else {
                &mut self.questions
            };
            if registry.register(token, settings) {
                debug!(page = %self.name, token, shared = is_shared(&caps), "token discovered");
            }
        }
    }

    /// The page-local question registry.
    #[must_use]
    pub const fn questions(&self) -> &QuestionRegistry {
        &self.questions
    }

    pub const fn questions_mut(&mut self) -> &mut QuestionRegistry {
        &mut self.questions
    }

    fn lookup<'a>(
        &'a self,
        shared: &'a QuestionRegistry,
        caps: &Captures<'_>,
    ) -> Option<&'a str> {
        if is_shared(caps) {
            shared.answer_for(&caps[1])
        } else {
            self.questions.answer_for(&caps[1])
        }
    }

    /// Substitutes every token with its answer.
    ///
    /// Substitution is a single pass: answers are inserted verbatim and are
    /// not scanned for further tokens.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::UnresolvedToken` if any token lacks an answer.
    pub fn render(&self, shared: &QuestionRegistry) -> Result<String, RenderError> {
        if let Some(caps) = TOKEN_RE
            .captures_iter(&self.template)
            .find(|caps| self.lookup(shared, caps).is_none())
        {
            return Err(RenderError::UnresolvedToken {
                page: self.file_stem(),
                token: caps[1].to_string(),
            });
        }
        Ok(TOKEN_RE
            .replace_all(&self.template, |caps: &Captures<'_>| {
                self.lookup(shared, caps).unwrap_or_default().to_string()
            })
            .into_owned())
    }

    fn file_stem(&self) -> String {
        format!("{}_{}_{}", self.parent, self.name, self.page_type)
    }

    /// Output path below `out_root`.
    #[must_use]
    pub fn output_path(&self, out_root: &Path) -> PathBuf {
        out_root
            .join(&self.parent)
            .join(format!("{}.html", self.file_stem()))
    }

    /// Renders the page and writes it to
    /// `<out_root>/<parent>/<parent>_<name>_<type>.html`.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::UnresolvedToken` if rendering fails, or
    /// `RenderError::Write` if the directory or file cannot be written.
    pub fn write(&self, shared: &QuestionRegistry, out_root: &Path) -> Result<PathBuf, RenderError> {
        let contents = self.render(shared)?;
        let path = self.output_path(out_root);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| RenderError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, contents).map_err(|source| RenderError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "page written");
        Ok(path)
    }
}

/// Reads the template for a page type from `templates_dir`.
///
/// # Errors
///
/// Returns `RenderError::TemplateNotFound` if the file cannot be read.
pub fn load_template(templates_dir: &Path, page_type: PageType) -> Result<String, RenderError> {
    let path = templates_dir.join(format!("{page_type}.html"));
    fs::read_to_string(&path).map_err(|_| RenderError::TemplateNotFound {
        page_type: page_type.to_string(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn page(template: &str, shared: &mut QuestionRegistry) -> Page {
        Page::new(
            "Foo",
            "bar",
            PageType::Method,
            template.to_string(),
            shared,
            &QuestionSettings::default(),
        )
    }

    #[test]
    fn renders_shared_and_local_answers() {
        let mut shared = QuestionRegistry::default();
        let mut p = page("Hello [[shared:name]], your [[kind]] is ready", &mut shared);
        shared.answer("name", "Foo").unwrap();
        p.questions_mut().answer("kind", "page").unwrap();
        assert_eq!(p.render(&shared).unwrap(), "Hello Foo, your page is ready");
    }

    #[test]
    fn scan_routes_tokens_by_prefix() {
        let mut shared = QuestionRegistry::default();
        let p = page("[[shared:summary]] [[syntax]] [[shared:summary]]", &mut shared);
        assert!(shared.get("summary").is_some());
        assert!(shared.get("syntax").is_none());
        assert!(p.questions().get("syntax").is_some());
        assert!(p.questions().get("summary").is_none());
    }

    #[test]
    fn page_type_token_preanswered() {
        let mut shared = QuestionRegistry::default();
        let p = page("<h1>[[method]]</h1>", &mut shared);
        assert!(!p.questions().needs_answers());
        assert_eq!(p.render(&shared).unwrap(), "<h1>bar</h1>");
    }

    #[test]
    fn repeated_token_resolves_everywhere() {
        let mut shared = QuestionRegistry::default();
        let mut p = page("[[x]]-[[x]]-[[x]]", &mut shared);
        p.questions_mut().answer("x", "y").unwrap();
        assert_eq!(p.render(&shared).unwrap(), "y-y-y");
    }

    #[test]
    fn unanswered_token_fails() {
        let mut shared = QuestionRegistry::default();
        let p = page("a [[shared:summary]] b", &mut shared);
        let err = p.render(&shared).unwrap_err();
        assert!(matches!(err, RenderError::UnresolvedToken { token, .. } if token == "summary"));
    }

    #[test]
    fn answers_are_not_rescanned() {
        let mut shared = QuestionRegistry::default();
        let mut p = page("[[x]]", &mut shared);
        p.questions_mut().answer("x", "[[y]]").unwrap();
        assert_eq!(p.render(&shared).unwrap(), "[[y]]");
    }

    #[test]
    fn hidden_tokens_render_empty() {
        let mut shared = QuestionRegistry::default();
        let settings = QuestionSettings {
            hidden: vec!["draft".into()],
            ..QuestionSettings::default()
        };
        let p = Page::new(
            "Foo",
            "Foo",
            PageType::Interface,
            "[<[[draft]]>]".into(),
            &mut shared,
            &settings,
        );
        assert_eq!(p.render(&shared).unwrap(), "[<>]");
    }

    #[test]
    fn write_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut shared = QuestionRegistry::default();
        let p = page("body [[method]]", &mut shared);
        let path = p.write(&shared, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Foo").join("Foo_bar_method.html"));
        assert_eq!(fs::read_to_string(path).unwrap(), "body bar");
    }

    #[test]
    fn unresolved_page_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut shared = QuestionRegistry::default();
        let p = page("[[missing]]", &mut shared);
        assert!(p.write(&shared, dir.path()).is_err());
        assert!(!dir.path().join("Foo").exists());
    }

    #[test]
    fn missing_template_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_template(dir.path(), PageType::Handler).unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound { page_type, .. } if page_type == "handler"));
    }

    proptest! {
        #[test]
        fn render_ok_iff_all_answered(
            tokens in proptest::collection::vec("[a-z]{1,6}", 1..6),
            answered in proptest::collection::vec(any::<bool>(), 6),
        ) {
            let template: String = tokens.iter().map(|t| format!("<[[{t}]]>")).collect();
            let mut shared = QuestionRegistry::default();
            let mut p = page(&template, &mut shared);

            for (token, answer) in tokens.iter().zip(&answered) {
                if *answer && p.questions().answer_for(token).is_none() {
                    p.questions_mut().answer(token, "v").unwrap();
                }
            }
            let all = tokens.iter().all(|t| p.questions().answer_for(t).is_some());
            prop_assert_eq!(p.render(&shared).is_ok(), all);
        }
    }
}
