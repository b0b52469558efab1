//! Types for the job module.

use std::path::{Path, PathBuf};

use crate::stage::StageProgress;

use super::error::JobError;

/// Paths involved in converting one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source_dir: PathBuf,
    pub input_file: String,
    pub wav_file: String,
    pub mp3_file: String,
    pub scratch_dir: PathBuf,
}

impl Job {
    /// Derives the WAV and MP3 names by swapping the input's extension.
    pub fn new(source_dir: &Path, input_file: &str, scratch_dir: &Path) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            input_file: input_file.to_string(),
            wav_file: with_extension(input_file, "wav"),
            mp3_file: with_extension(input_file, "mp3"),
            scratch_dir: scratch_dir.to_path_buf(),
        }
    }

    pub fn input_path(&self) -> PathBuf {
        self.source_dir.join(&self.input_file)
    }

    pub fn scratch_wav(&self) -> PathBuf {
        self.scratch_dir.join(&self.wav_file)
    }

    pub fn scratch_mp3(&self) -> PathBuf {
        self.scratch_dir.join(&self.mp3_file)
    }

    /// Final location of the MP3.
    pub fn output_mp3(&self) -> PathBuf {
        self.source_dir.join(&self.mp3_file)
    }

    /// Where the input ends up once the job is done.
    pub fn archived_input(&self, archive_dir_name: &str) -> PathBuf {
        self.source_dir
            .join(archive_dir_name)
            .join(&self.input_file)
    }

    /// Files left over from an earlier run that must not survive into this one.
    pub fn stale_paths(&self) -> [PathBuf; 3] {
        [self.output_mp3(), self.scratch_mp3(), self.scratch_wav()]
    }
}

fn with_extension(file_name: &str, extension: &str) -> String {
    Path::new(file_name)
        .with_extension(extension)
        .to_string_lossy()
        .to_string()
}

/// Notifications emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// A job has prepared its scratch directory and is about to synthesize.
    Started { input_file: String },
    /// Progress of the running stage.
    Stage(StageProgress),
    /// The scratch directory could not be deleted; the job carries on.
    CleanupFailed { path: PathBuf, reason: String },
    /// The MP3 is in place and the input has been archived.
    Archived { mp3: PathBuf, archived_input: PathBuf },
}

/// Summary of a completed job.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub input_file: String,
    pub mp3_path: PathBuf,
    pub archived_input: PathBuf,
    pub mp3_size_bytes: u64,
    pub duration_ms: u64,
}

/// The job that stopped a batch.
#[derive(Debug)]
pub struct BatchFailure {
    pub input_file: String,
    pub error: JobError,
}

/// Outcome of running every selected job.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Jobs that finished, in the order they ran.
    pub completed: Vec<JobReport>,
    /// The fatal error that stopped the batch, if any.
    pub failure: Option<BatchFailure>,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}
