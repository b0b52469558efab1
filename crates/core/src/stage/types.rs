//! Types for the stage module.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// The two stages of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Text to WAV.
    Synthesis,
    /// WAV to MP3.
    Encode,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synthesis => "synthesis",
            Self::Encode => "encode",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved tool invocation.
#[derive(Debug, Clone)]
pub struct StageSpec {
    pub stage: StageKind,
    /// Executable to launch.
    pub program: PathBuf,
    pub args: Vec<String>,
    /// File whose growth is tracked for progress.
    pub target: PathBuf,
    /// Expected final size of `target` in bytes.
    pub predicted_size: u64,
    pub timeout: Option<Duration>,
}

/// Progress update emitted while a stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageProgress {
    pub stage: StageKind,
    /// Estimated completion, 0 to 100.
    pub percent: u8,
}

/// Result of a successful stage run.
#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub stage: StageKind,
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    pub predicted_size: u64,
    /// Wall clock time of the final attempt.
    pub duration_ms: u64,
    /// Number of attempts it took, starting at 1.
    pub attempts: u32,
}
