//! Error types for job selection.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectorError {
    /// The argument ends in a separator and names no file.
    #[error("No file name in argument: {argument}")]
    EmptyFileName { argument: String },

    /// Wildcards are only supported in the file name.
    #[error("Wildcards are not supported in directories: {argument}")]
    WildcardInDirectory { argument: String },

    /// The wildcard could not be compiled.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The source directory could not be listed.
    #[error("Failed to read directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
