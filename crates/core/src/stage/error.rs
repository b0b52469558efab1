//! Error types for the stage module.

use std::path::PathBuf;
use thiserror::Error;

use super::types::StageKind;

/// Errors that can occur while running a stage.
#[derive(Debug, Error)]
pub enum StageError {
    /// Tool binary not found.
    #[error("{stage} tool not found at path: {path}")]
    ToolNotFound { stage: StageKind, path: PathBuf },

    /// Stage input file not found.
    #[error("{stage} input not found: {path}")]
    InputNotFound { stage: StageKind, path: PathBuf },

    /// Tool exited with a non-zero status. `code` is `None` when killed by a signal.
    #[error("{stage} tool exited with code: {code:?}")]
    ToolFailed { stage: StageKind, code: Option<i32> },

    /// Tool exited successfully without writing its output.
    #[error("{stage} tool produced no output at {path}")]
    OutputMissing { stage: StageKind, path: PathBuf },

    /// Tool ran past its timeout and was killed.
    #[error("{stage} tool timed out after {timeout_secs} seconds")]
    Timeout { stage: StageKind, timeout_secs: u64 },

    /// The task waiting on the tool panicked or was aborted.
    #[error("{stage} wait task failed: {reason}")]
    TaskFailed { stage: StageKind, reason: String },

    /// I/O error while running the stage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StageError {
    /// The stage this error belongs to, when known.
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            Self::ToolNotFound { stage, .. }
            | Self::InputNotFound { stage, .. }
            | Self::ToolFailed { stage, .. }
            | Self::OutputMissing { stage, .. }
            | Self::Timeout { stage, .. }
            | Self::TaskFailed { stage, .. } => Some(*stage),
            Self::Io(_) => None,
        }
    }

    /// Whether running the tool again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ToolFailed { .. } | Self::OutputMissing { .. } | Self::Timeout { .. }
        )
    }
}
