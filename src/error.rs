//! Error types for ignore-guard

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by rule management and persistence
#[derive(Debug, Error)]
pub enum FilterError {
    /// Empty or malformed input to an add operation
    #[error("invalid input: {0}")]
    Validation(String),

    /// A regex rule failed to compile
    #[error("invalid pattern: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The persisted document could not be read or parsed
    #[error("failed to load {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// The persisted document could not be written
    #[error("failed to save {}: {reason}", path.display())]
    Persistence { path: PathBuf, reason: String },

    /// The actor may not run mutating commands
    #[error("actor '{actor}' is not permitted to modify rules")]
    PermissionDenied { actor: String },
}

pub type Result<T> = std::result::Result<T, FilterError>;
