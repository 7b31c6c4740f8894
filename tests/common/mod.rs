//! Shared integration-test harness: a scripted prompter for driving the
//! library, a temporary workspace with templates, and helpers for running
//! the `mdn-helper` binary.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::Mutex;

use mdn_helper::config::AppConfig;
use mdn_helper::error::QuestionError;
use mdn_helper::questions::{Confirmation, Prompter, Question};

/// Templates written into every test workspace.
pub const TEMPLATES: [(&str, &str); 5] = [
    ("interface", "<h1>[[interface]]</h1><p>[[shared:summary]]</p>"),
    ("constructor", "<h1>[[constructor]]()</h1><p>[[shared:summary]]</p>"),
    (
        "method",
        "<h1>[[shared:name]].[[method]]()</h1><p>[[shared:summary]]</p><p>[[returnValue]]</p>",
    ),
    ("property", "<h1>[[shared:name]].[[property]]</h1><p>[[value]]</p>"),
    ("handler", "<h1>[[shared:name]].[[handler]]</h1><p>[[eventName]]</p>"),
];

// ============================================================================
// Scripted prompter
// ============================================================================

/// Prompter answering from a token → answer table and recording every call.
///
/// Tokens missing from the table are answered with `"<token>-answer"`.
pub struct ScriptedPrompter {
    answers: HashMap<String, String>,
    confirmation: Confirmation,
    asked: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
    confirms: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[(&str, &str)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            confirmation: Confirmation::Proceed,
            asked: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            confirms: Mutex::new(Vec::new()),
        }
    }

    pub fn confirming(mut self, confirmation: Confirmation) -> Self {
        self.confirmation = confirmation;
        self
    }

    /// Tokens asked, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Prompter for ScriptedPrompter {
    async fn notify(&self, text: &str) -> Result<(), QuestionError> {
        self.notices.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn ask(&self, question: &Question) -> Result<String, QuestionError> {
        self.asked.lock().unwrap().push(question.token.clone());
        Ok(self
            .answers
            .get(&question.token)
            .cloned()
            .unwrap_or_else(|| format!("{}-answer", question.token)))
    }

    async fn confirm(&self, message: &str) -> Result<Confirmation, QuestionError> {
        self.confirms.lock().unwrap().push(message.to_string());
        Ok(self.confirmation)
    }
}

// ============================================================================
// Workspace
// ============================================================================

/// Temporary directory holding templates, IDL sources and the output root.
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create tempdir");
        let templates = dir.path().join("templates");
        fs::create_dir(&templates).expect("create templates dir");
        for (name, body) in TEMPLATES {
            fs::write(templates.join(format!("{name}.html")), body).expect("write template");
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn templates(&self) -> PathBuf {
        self.path().join("templates")
    }

    pub fn out(&self) -> PathBuf {
        self.path().join("out")
    }

    /// Configuration pointing at this workspace.
    pub fn config(&self) -> AppConfig {
        AppConfig {
            output_directory: self.out(),
            templates_directory: self.templates(),
            ..AppConfig::default()
        }
    }

    /// Writes a file relative to the workspace root.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, contents).expect("write workspace file");
        path
    }

    /// Every file below the output root, relative to it, sorted.
    pub fn output_files(&self) -> Vec<String> {
        let mut files = Vec::new();
        collect(&self.out(), &self.out(), &mut files);
        files.sort();
        files
    }
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let rel = path.strip_prefix(root).expect("below root");
            files.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}

// ============================================================================
// Binary
// ============================================================================

/// Runs the binary inside `cwd` with `HOME` pointed at `cwd` and the
/// configuration environment cleared, feeding `stdin`.
pub fn run_bin(cwd: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mdn-helper"))
        .args(args)
        .current_dir(cwd)
        .env("HOME", cwd)
        .env("NO_COLOR", "1")
        .env_remove("MDN_HELPER_CONFIG")
        .env_remove("MDN_HELPER_USER_CONFIG")
        .env_remove("MDN_HELPER_LOG_LEVEL")
        .env_remove("MDN_HELPER_LOG_FORMAT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn mdn-helper");

    child
        .stdin
        .take()
        .expect("stdin not captured")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for mdn-helper")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
