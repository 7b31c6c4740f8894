//! WebIDL front end.
//!
//! Turns an IDL source file into a [`syntax::Definition`] list. Sources
//! are either `.idl` text, parsed by [`parser`], or a `.json` file holding
//! a syntax tree that was parsed elsewhere.

pub mod lexer;
pub mod parser;
pub mod syntax;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::IdlError;
use syntax::Definition;

/// Resolves the path of an IDL source, appending `.idl` when a bare name
/// without an extension does not exist.
#[must_use]
pub fn resolve_source(path: &Path) -> PathBuf {
    if path.exists() || path.extension().is_some() {
        return path.to_path_buf();
    }
    path.with_extension("idl")
}

/// Loads and parses the definitions in an IDL source file.
///
/// # Errors
///
/// Returns `IdlError::Read` if the file cannot be read, `IdlError::Tree`
/// for an undecodable JSON tree, or `IdlError::Syntax` for invalid IDL.
pub fn load_definitions(path: &Path) -> Result<Vec<Definition>, IdlError> {
    let path = resolve_source(path);
    let contents = fs::read_to_string(&path).map_err(|source| IdlError::Read {
        path: path.clone(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let defs = if is_json {
        serde_json::from_str(&contents).map_err(|source| IdlError::Tree {
            path: path.clone(),
            source,
        })?
    } else {
        parser::parse(&contents)?
    };

    debug!(path = %path.display(), definitions = defs.len(), "loaded IDL source");
    Ok(defs)
}
