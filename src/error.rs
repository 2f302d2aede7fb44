//! Error types for prefs.js parsing, editing, and profile discovery
//!
//! This module defines the error types used throughout the ffprefs library.
//! All public functions return [`Result<T, Error>`] for consistent error handling.

use crate::types::PrefKind;
use std::path::PathBuf;

/// Errors that can occur while reading, editing, or writing preference files
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Lexer error during tokenization
    #[error("Lexer error at line {line}, column {column}: {message}")]
    Lexer {
        line: usize,
        column: usize,
        message: String,
    },

    /// Parser error during parsing
    #[error("Parser error at line {line}, column {column}: {message}")]
    Parser {
        line: usize,
        column: usize,
        message: String,
    },

    /// The same key appeared twice while duplicates were rejected
    #[error("Duplicate preference '{key}' at line {line} (first defined at line {first_line})")]
    DuplicateKey {
        key: String,
        first_line: usize,
        line: usize,
    },

    /// A preference exists but holds a value of another kind
    #[error("Preference '{key}' is {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: PrefKind,
        found: PrefKind,
    },

    /// Header line that would not read back as a comment
    #[error("Header line must be empty or start with '//': {0:?}")]
    InvalidHeaderLine(String),

    /// Key rejected for insertion
    #[error("Invalid preference key: {0:?}")]
    InvalidKey(String),

    /// Embedded JSON payload could not be decoded
    #[error("Preference '{key}' does not hold valid JSON: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file on disk was rewritten after it was loaded
    #[error("{} was modified after it was loaded; reload before saving", .0.display())]
    ModifiedOnDisk(PathBuf),

    /// Profile not found
    #[error("Profile '{name}' not found in {directory}")]
    ProfileNotFound { name: String, directory: PathBuf },

    /// More than one profile directory matches the requested name
    #[error("Multiple profiles match '{name}': {}", .candidates.join(", "))]
    AmbiguousProfile {
        name: String,
        candidates: Vec<String>,
    },

    /// Path given as a directory is missing or is a file
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Invalid profile directory
    #[error("Invalid profile directory: {0}")]
    InvalidProfileDirectory(String),

    /// Invalid glob pattern in query
    #[error("Invalid glob pattern: {0}")]
    InvalidGlobPattern(String),

    /// profiles.ini parsing error
    #[error("Failed to parse profiles.ini: {0}")]
    ProfilesIniParse(String),
}

/// Result type alias for convenience
///
/// # Example
///
/// ```rust
/// use ffprefs::{Result, PrefsFile};
///
/// fn count_prefs(content: &str) -> Result<usize> {
///     let prefs = PrefsFile::parse(content)?;
///     Ok(prefs.len())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
