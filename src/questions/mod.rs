//! Question registries and the interactive resolution protocol.
//!
//! Every template token becomes a [`Question`]. Tokens shared across the
//! pages of one build live in a single shared [`QuestionRegistry`]; each
//! page owns a local one. [`resolve`] asks the shared questions first and
//! the page-local ones second, so a shared answer is requested at most once
//! per build.

pub mod prompt;

pub use prompt::{Confirmation, LinePrompter, Prompter};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::QuestionError;

/// Header printed the first time shared questions are asked.
pub const SHARED_INTRO: &str = "Questions shared by every page of this interface";

/// Notice printed when a later page discovers new shared questions.
pub const MORE_SHARED: &str = "More shared questions found.";

// ============================================================================
// Question
// ============================================================================

/// A named placeholder awaiting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Token name as written in the template
    pub token: String,
    /// Text shown when prompting
    pub prompt: String,
    /// Resolved answer; an empty string is a valid answer
    pub answer: Option<String>,
}

impl Question {
    /// Returns `true` once an answer has been recorded.
    #[must_use]
    pub const fn is_answered(&self) -> bool {
        self.answer.is_some()
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Per-token prompt configuration.
#[derive(Debug, Clone, Default)]
pub struct QuestionSettings {
    /// Tokens answered with the empty string and never prompted
    pub hidden: Vec<String>,
    /// Prompt text per token
    pub prompts: IndexMap<String, String>,
    /// Help text per page type; `shared` applies to the shared banner
    pub help: IndexMap<String, String>,
}

impl QuestionSettings {
    /// Prompt text for a token, defaulting to the token itself.
    #[must_use]
    pub fn prompt_for<'a>(&'a self, token: &'a str) -> &'a str {
        self.prompts.get(token).map_or(token, String::as_str)
    }

    #[must_use]
    pub fn is_hidden(&self, token: &str) -> bool {
        self.hidden.iter().any(|h| h == token)
    }

    /// Help text for a key, or the empty string.
    #[must_use]
    pub fn help_for(&self, key: &str) -> &str {
        self.help.get(key).map_or("", String::as_str)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Insertion-ordered set of questions with an intro message.
#[derive(Debug, Clone, Default)]
pub struct QuestionRegistry {
    questions: IndexMap<String, Question>,
    intro: String,
    intro_shown: bool,
}

impl QuestionRegistry {
    /// Creates an empty registry with the given intro message.
    #[must_use]
    pub fn new(intro: impl Into<String>) -> Self {
        Self {
            questions: IndexMap::new(),
            intro: intro.into(),
            intro_shown: false,
        }
    }

    /// Inserts an unanswered question unless the token is already present.
    ///
    /// Returns `true` if a question was inserted.
    pub fn add(&mut self, token: &str, prompt: Option<&str>) -> bool {
        if self.questions.contains_key(token) {
            return false;
        }
        self.questions.insert(
            token.to_string(),
            Question {
                token: token.to_string(),
                prompt: prompt.unwrap_or(token).to_string(),
                answer: None,
            },
        );
        true
    }

    /// Inserts an already-answered question unless the token is present.
    pub fn add_answered(&mut self, token: &str, answer: impl Into<String>) -> bool {
        if self.questions.contains_key(token) {
            return false;
        }
        self.questions.insert(
            token.to_string(),
            Question {
                token: token.to_string(),
                prompt: token.to_string(),
                answer: Some(answer.into()),
            },
        );
        true
    }

    /// Adds a token discovered in a template, applying prompt text and
    /// hiding from `settings`.
    pub fn register(&mut self, token: &str, settings: &QuestionSettings) -> bool {
        if settings.is_hidden(token) {
            self.add_answered(token, "")
        } else {
            self.add(token, Some(settings.prompt_for(token)))
        }
    }

    /// Records the answer for a token.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::UnknownToken` if the token was never added
    /// and `QuestionError::AlreadyAnswered` on a second assignment.
    pub fn answer(&mut self, token: &str, text: impl Into<String>) -> Result<(), QuestionError> {
        let question = self
            .questions
            .get_mut(token)
            .ok_or_else(|| QuestionError::UnknownToken(token.to_string()))?;
        if question.answer.is_some() {
            return Err(QuestionError::AlreadyAnswered(token.to_string()));
        }
        question.answer = Some(text.into());
        Ok(())
    }

    #[must_use]
    pub fn get(&self, token: &str) -> Option<&Question> {
        self.questions.get(token)
    }

    /// The recorded answer for a token, if any.
    #[must_use]
    pub fn answer_for(&self, token: &str) -> Option<&str> {
        self.questions.get(token)?.answer.as_deref()
    }

    /// Returns `true` if any question lacks an answer.
    #[must_use]
    pub fn needs_answers(&self) -> bool {
        self.questions.values().any(|q| !q.is_answered())
    }

    /// Questions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn unanswered(&self) -> Vec<Question> {
        self.questions
            .values()
            .filter(|q| !q.is_answered())
            .cloned()
            .collect()
    }
}

/// Builds the banner shown before the first round of shared questions.
#[must_use]
pub fn shared_intro(help: &str) -> String {
    format!("\n{SHARED_INTRO}\n{}\n{help}", "=".repeat(80))
}

// ============================================================================
// Resolution protocol
// ============================================================================

/// Resolves outstanding questions for one page: shared first, then local.
///
/// Returns the number of questions that were prompted.
///
/// # Errors
///
/// Propagates prompter failures such as `QuestionError::InputClosed`.
pub async fn resolve<P: Prompter + ?Sized>(
    shared: &mut QuestionRegistry,
    local: &mut QuestionRegistry,
    prompter: &P,
) -> Result<usize, QuestionError> {
    let mut asked = 0;

    if shared.needs_answers() {
        if shared.intro_shown {
            prompter
                .notify(&format!("{MORE_SHARED}\n{}", "-".repeat(MORE_SHARED.len())))
                .await?;
        } else {
            prompter.notify(&shared.intro).await?;
            shared.intro_shown = true;
        }
        asked += ask_all(shared, prompter).await?;
    }

    if local.needs_answers() {
        prompter.notify(&local.intro).await?;
        local.intro_shown = true;
        asked += ask_all(local, prompter).await?;
    }

    Ok(asked)
}

async fn ask_all<P: Prompter + ?Sized>(
    registry: &mut QuestionRegistry,
    prompter: &P,
) -> Result<usize, QuestionError> {
    let pending = registry.unanswered();
    for question in &pending {
        let answer = prompter.ask(question).await?;
        debug!(token = %question.token, "question answered");
        registry.answer(&question.token, answer)?;
    }
    Ok(pending.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut reg = QuestionRegistry::new("intro");
        assert!(reg.add("name", None));
        assert!(!reg.add("name", Some("other")));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("name").unwrap().prompt, "name");
    }

    #[test]
    fn insertion_order_preserved() {
        let mut reg = QuestionRegistry::default();
        for token in ["c", "a", "b"] {
            reg.add(token, None);
        }
        let order: Vec<&str> = reg.iter().map(|q| q.token.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn needs_answers_tracks_state() {
        let mut reg = QuestionRegistry::default();
        assert!(!reg.needs_answers());
        reg.add("kind", None);
        assert!(reg.needs_answers());
        reg.answer("kind", "page").unwrap();
        assert!(!reg.needs_answers());
        assert_eq!(reg.answer_for("kind"), Some("page"));
    }

    #[test]
    fn second_answer_rejected() {
        let mut reg = QuestionRegistry::default();
        reg.add_answered("interface", "Foo");
        let err = reg.answer("interface", "Bar").unwrap_err();
        assert!(matches!(err, QuestionError::AlreadyAnswered(t) if t == "interface"));
        assert_eq!(reg.answer_for("interface"), Some("Foo"));
    }

    #[test]
    fn unknown_token_rejected() {
        let mut reg = QuestionRegistry::default();
        assert!(matches!(
            reg.answer("nope", "x"),
            Err(QuestionError::UnknownToken(_))
        ));
    }

    #[test]
    fn empty_answer_counts_as_answered() {
        let mut reg = QuestionRegistry::default();
        reg.add("note", None);
        reg.answer("note", "").unwrap();
        assert!(!reg.needs_answers());
    }

    #[test]
    fn register_applies_settings() {
        let mut settings = QuestionSettings::default();
        settings.hidden.push("secret".into());
        settings
            .prompts
            .insert("summary".into(), "One-line summary".into());

        let mut reg = QuestionRegistry::default();
        reg.register("secret", &settings);
        reg.register("summary", &settings);
        reg.register("plain", &settings);

        assert_eq!(reg.answer_for("secret"), Some(""));
        assert_eq!(reg.get("summary").unwrap().prompt, "One-line summary");
        assert_eq!(reg.get("plain").unwrap().prompt, "plain");
    }

    fn prompter(input: &'static str) -> LinePrompter<&'static [u8], Vec<u8>> {
        LinePrompter::new(input.as_bytes(), Vec::new())
    }

    #[tokio::test]
    async fn shared_questions_asked_once() {
        let mut shared = QuestionRegistry::new(shared_intro(""));
        shared.add_answered("interface", "Foo");
        let p = prompter("shared answer\nlocal one\nlocal two\n");

        let mut first = QuestionRegistry::new("first page");
        shared.add("summary", None);
        first.add("kind", None);
        assert_eq!(resolve(&mut shared, &mut first, &p).await.unwrap(), 2);

        let mut second = QuestionRegistry::new("second page");
        shared.add("summary", None);
        second.add("kind", None);
        assert_eq!(resolve(&mut shared, &mut second, &p).await.unwrap(), 1);

        assert_eq!(shared.answer_for("summary"), Some("shared answer"));
        assert_eq!(first.answer_for("kind"), Some("local one"));
        assert_eq!(second.answer_for("kind"), Some("local two"));
    }

    #[tokio::test]
    async fn later_shared_questions_get_short_notice() {
        let mut shared = QuestionRegistry::new("BANNER");
        let p = prompter("a\nb\n");

        shared.add("one", None);
        resolve(&mut shared, &mut QuestionRegistry::default(), &p)
            .await
            .unwrap();
        shared.add("two", None);
        resolve(&mut shared, &mut QuestionRegistry::default(), &p)
            .await
            .unwrap();

        let (_, out) = p.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("BANNER").count(), 1);
        assert!(out.contains(&format!("{MORE_SHARED}\n{}", "-".repeat(28))));
    }

    #[tokio::test]
    async fn nothing_pending_prints_nothing() {
        let mut shared = QuestionRegistry::new("BANNER");
        shared.add_answered("name", "Foo");
        let mut local = QuestionRegistry::new("LOCAL");
        local.add_answered("method", "bar");
        let p = prompter("");

        assert_eq!(resolve(&mut shared, &mut local, &p).await.unwrap(), 0);
        let (_, out) = p.into_inner();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn closed_input_is_error() {
        let mut shared = QuestionRegistry::default();
        shared.add("summary", None);
        let p = prompter("");
        let err = resolve(&mut shared, &mut QuestionRegistry::default(), &p)
            .await
            .unwrap_err();
        assert!(matches!(err, QuestionError::InputClosed));
    }
}
