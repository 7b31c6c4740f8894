//! Error types for `mdn-helper`
//!
//! One error enum per domain (IDL front end, configuration, compatibility
//! data, questions, rendering), aggregated by [`HelperError`] which also
//! owns the mapping to process exit codes.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `mdn-helper` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, blacklisted interface)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// IDL source could not be parsed or documents the wrong entity
    pub const IDL_ERROR: i32 = 4;

    /// Page template could not be rendered or written
    pub const RENDER_ERROR: i32 = 5;

    /// The user declined to continue
    pub const CANCELLED: i32 = 6;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `mdn-helper` operations.
#[derive(Debug, Error)]
pub enum HelperError {
    /// Configuration loading error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IDL parsing or interface classification error
    #[error(transparent)]
    Idl(#[from] IdlError),

    /// Compatibility dataset error
    #[error(transparent)]
    Compat(#[from] CompatError),

    /// Question registry or prompting error
    #[error(transparent)]
    Question(#[from] QuestionError),

    /// Page rendering or writing error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The user declined the flagged-interface confirmation
    #[error("build cancelled by user")]
    Aborted,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HelperError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Idl(_) => ExitCode::IDL_ERROR,
            Self::Render(_) => ExitCode::RENDER_ERROR,
            Self::Aborted => ExitCode::CANCELLED,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Compat(_) | Self::Question(_) | Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Explicitly requested configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Configuration file could not be read
    #[error("cannot read {path}: {source}")]
    Read {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A path value starts with `$HOME` but the home directory is unknown
    #[error("{field} refers to $HOME but HOME is not set: {path}")]
    HomeUnset {
        /// Configuration key holding the path
        field: &'static str,
        /// The unexpanded path
        path: PathBuf,
    },

    /// The interface is on the configured blacklist
    #[error("interface '{0}' is blacklisted")]
    Blacklisted(String),
}

// ============================================================================
// IDL Errors
// ============================================================================

/// Errors raised while reading IDL sources and building interface models.
#[derive(Debug, Error)]
pub enum IdlError {
    /// The IDL text is not well formed
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        /// 1-based line of the offending token
        line: usize,
        /// 1-based column of the offending token
        column: usize,
        /// What the parser expected or found
        message: String,
    },

    /// The source documents a dictionary rather than an interface
    #[error("{source_name} is for a dictionary ({name}), not an interface")]
    WrongDeclarationKind {
        /// Label of the source file
        source_name: String,
        /// Name of the dictionary found
        name: String,
    },

    /// The source contains no interface definition at all
    #[error("{source_name} does not contain interface data")]
    NoInterfaceFound {
        /// Label of the source file
        source_name: String,
    },

    /// The IDL source file could not be read
    #[error("cannot read {path}: {source}")]
    Read {
        /// Path to the source file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A pre-parsed JSON syntax tree could not be decoded
    #[error("invalid syntax tree in {path}: {source}")]
    Tree {
        /// Path to the JSON file
        path: PathBuf,
        /// Decoder error
        source: serde_json::Error,
    },
}

// ============================================================================
// Compatibility Errors
// ============================================================================

/// Errors raised while loading the compatibility dataset or writing records.
#[derive(Debug, Error)]
pub enum CompatError {
    /// Dataset file could not be read
    #[error("cannot read compatibility data {path}: {source}")]
    Read {
        /// Path to the dataset
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Dataset file is not valid JSON
    #[error("invalid compatibility data {path}: {source}")]
    Parse {
        /// Path to the dataset
        path: PathBuf,
        /// Decoder error
        source: serde_json::Error,
    },

    /// Dataset JSON is not an object keyed by API name
    #[error("compatibility data must be an object keyed by API name")]
    InvalidShape,

    /// Burn record file could not be written
    #[error("cannot write burn records to {path}: {source}")]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

// ============================================================================
// Question Errors
// ============================================================================

/// Errors raised by question registries and prompters.
#[derive(Debug, Error)]
pub enum QuestionError {
    /// An answer was assigned twice
    #[error("question '{0}' is already answered")]
    AlreadyAnswered(String),

    /// An answer was assigned to a token that was never registered
    #[error("no question registered for token '{0}'")]
    UnknownToken(String),

    /// Input ended while waiting for an answer
    #[error("input closed while waiting for an answer")]
    InputClosed,

    /// Prompt I/O failed
    #[error("prompt I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors raised while rendering and writing pages.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Rendering was attempted while a token still lacks an answer
    #[error("page {page}: token '{token}' has no answer")]
    UnresolvedToken {
        /// Page being rendered
        page: String,
        /// Token without an answer
        token: String,
    },

    /// No template exists for the page type
    #[error("no template for page type '{page_type}' at {path}")]
    TemplateNotFound {
        /// Requested page type
        page_type: String,
        /// Path that was tried
        path: PathBuf,
    },

    /// Output directory creation or file write failed
    #[error("cannot write {path}: {source}")]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `mdn-helper` operations.
pub type Result<T> = std::result::Result<T, HelperError>;

// ============================================================================
// Tests
// ============================================================================
