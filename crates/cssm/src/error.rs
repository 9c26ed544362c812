//! Error types for the module scoping transform.

use std::path::PathBuf;

/// Result type alias for cssm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or scoping a stylesheet.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// CSS parse error.
    #[error("CSS parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: u32,
        column: u32,
    },

    /// Malformed `@use`/`:import` directive or scope marker.
    #[error("Invalid directive '{directive}': {message}")]
    Syntax { directive: String, message: String },

    /// A referenced module has not been processed yet.
    #[error("'{}' not found or not imported yet", path.display())]
    UnresolvedReference { path: PathBuf },

    /// File I/O error.
    #[error("Failed to read stylesheet '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration file.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Translation table export failed.
    #[error("Failed to serialize translations: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a directive syntax error.
    pub fn syntax(directive: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Syntax {
            directive: directive.into(),
            message: message.into(),
        }
    }

    /// Create an unresolved reference error.
    pub fn unresolved(path: impl Into<PathBuf>) -> Self {
        Self::UnresolvedReference { path: path.into() }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from a malformed directive.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}
