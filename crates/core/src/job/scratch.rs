//! Per-job scratch directories and stale file cleanup.

use rand::Rng;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::error::JobError;

/// Names drawn before giving up on finding a free scratch directory.
const MAX_NAME_ATTEMPTS: u32 = 16;

/// A uniquely named directory owned by a single job.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Creates a new directory with a random ten digit name under `root`.
    ///
    /// Creation fails on an existing name, in which case another is drawn.
    pub async fn create(root: &Path) -> Result<Self, JobError> {
        fs::create_dir_all(root)
            .await
            .map_err(|e| JobError::ScratchCreation {
                path: root.to_path_buf(),
                source: e,
            })?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let path = root.join(random_name());
            match fs::create_dir(&path).await {
                Ok(()) => {
                    debug!("Created scratch directory {}", path.display());
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(JobError::ScratchCreation { path, source: e }),
            }
        }

        Err(JobError::ScratchExhausted {
            root: root.to_path_buf(),
            attempts: MAX_NAME_ATTEMPTS,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub(crate) fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Deletes the directory and everything in it.
    pub async fn remove(&self) -> std::io::Result<()> {
        fs::remove_dir_all(&self.path).await
    }
}

fn random_name() -> String {
    rand::thread_rng()
        .gen_range(1_000_000_000u64..=9_999_999_999)
        .to_string()
}

/// Removes each path that exists. Missing paths are not an error.
pub async fn tidy(paths: &[PathBuf]) -> Result<(), JobError> {
    for path in paths {
        match fs::remove_file(path).await {
            Ok(()) => debug!("Removed stale file {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(JobError::Tidy {
                    path: path.clone(),
                    source: e,
                })
            }
        }
    }
    Ok(())
}
