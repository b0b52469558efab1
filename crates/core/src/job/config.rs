//! Configuration for the job module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for job orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Directory under which per-job scratch directories are created.
    #[serde(default = "default_temp_root")]
    pub temp_root: PathBuf,

    /// Subdirectory of the source directory receiving converted inputs.
    #[serde(default = "default_archive_dir_name")]
    pub archive_dir_name: String,

    /// Seconds to wait before exiting after a fatal error.
    #[serde(default = "default_fatal_pause")]
    pub fatal_pause_secs: u64,

    /// Seconds to wait before exiting after a normal run.
    #[serde(default = "default_exit_pause")]
    pub exit_pause_secs: u64,
}

fn default_temp_root() -> PathBuf {
    std::env::temp_dir().join("txt2mp3")
}

fn default_archive_dir_name() -> String {
    "converted-text".to_string()
}

fn default_fatal_pause() -> u64 {
    5
}

fn default_exit_pause() -> u64 {
    100
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            temp_root: default_temp_root(),
            archive_dir_name: default_archive_dir_name(),
            fatal_pause_secs: default_fatal_pause(),
            exit_pause_secs: default_exit_pause(),
        }
    }
}

impl JobsConfig {
    /// Sets the scratch root.
    pub fn with_temp_root(mut self, temp_root: PathBuf) -> Self {
        self.temp_root = temp_root;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JobsConfig::default();
        assert!(config.temp_root.ends_with("txt2mp3"));
        assert_eq!(config.archive_dir_name, "converted-text");
        assert_eq!(config.fatal_pause_secs, 5);
        assert_eq!(config.exit_pause_secs, 100);
    }

    #[test]
    fn test_with_temp_root() {
        let config = JobsConfig::default().with_temp_root(PathBuf::from("/scratch"));
        assert_eq!(config.temp_root, PathBuf::from("/scratch"));
    }
}
