//! Error types for the job module.

use std::path::PathBuf;
use thiserror::Error;

use crate::placer::PlacerError;
use crate::stage::{StageError, StageKind};

/// Fatal errors that abort a job and the batch it belongs to.
#[derive(Debug, Error)]
pub enum JobError {
    /// Input text file does not exist.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Scratch directory could not be created.
    #[error("Failed to create scratch directory: {path}")]
    ScratchCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every generated scratch name was already taken.
    #[error("No free scratch directory name under {root} after {attempts} attempts")]
    ScratchExhausted { root: PathBuf, attempts: u32 },

    /// A stale output could not be removed.
    #[error("Failed to remove stale file: {path}")]
    Tidy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external tool failed.
    #[error(transparent)]
    Stage(#[from] StageError),

    /// Moving the MP3 or archiving the input failed.
    #[error("Failed to place file: {0}")]
    Placement(#[from] PlacerError),
}

impl JobError {
    /// The stage that failed, for tool errors.
    pub fn failed_stage(&self) -> Option<StageKind> {
        match self {
            Self::Stage(e) => e.stage(),
            _ => None,
        }
    }
}
