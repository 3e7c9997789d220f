//! Error types for normalizing, loading and querying configuration documents.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur anywhere in the load → query pipeline.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A `/*` block comment was never closed.
    /// `line` is the 1-based line of the opening marker.
    #[error("unterminated comment at line {line}: {excerpt}")]
    UnterminatedComment { line: usize, excerpt: String },

    /// Braces or brackets do not pair up. `depth` is the nesting depth left
    /// over at the end of input, or `-1` for a stray closer.
    #[error("unbalanced structure: {detail} (depth {depth})")]
    UnbalancedStructure { depth: i64, detail: String },

    /// The (normalized) text was not valid JSON, or its root was not an object.
    #[error("JSON parse error: {diagnostic}")]
    Parse { diagnostic: String },

    /// The configuration file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown document: {0}")]
    UnknownDocument(String),

    /// A read was attempted before any document became active.
    #[error("no active document (load one under \"default\" or call select_active)")]
    NoActiveDocument,

    #[error("key not found: {path}")]
    KeyNotFound { path: String },

    #[error("type mismatch at {path}: expected {expected}, found {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse {
            diagnostic: err.to_string(),
        }
    }
}

/// Convenience alias used throughout confjson-core.
pub type Result<T> = std::result::Result<T, ConfigError>;
