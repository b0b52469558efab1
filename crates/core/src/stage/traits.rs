//! Trait definitions for the stage module.

use std::path::Path;
use std::time::Duration;

use super::config::RetryConfig;
use super::types::StageKind;

/// An external tool that turns one file into another.
pub trait Tool: Send + Sync {
    /// Which stage this tool implements.
    fn kind(&self) -> StageKind;

    /// Path to the executable.
    fn program(&self) -> &Path;

    /// Command line arguments for converting `input` into `output`.
    fn args(&self, input: &Path, output: &Path) -> Vec<String>;

    /// Predicted output size in bytes for an input of `input_bytes`.
    fn predict_size(&self, input_bytes: u64) -> u64;

    /// Maximum run time, if any.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Retry policy applied by the runner.
    fn retry(&self) -> RetryConfig {
        RetryConfig::default()
    }
}
