//! Configuration for the placer module.

use serde::{Deserialize, Serialize};

/// Configuration for the file system placer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacerConfig {
    /// Buffer size for file copies in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Whether to try a rename before falling back to copying.
    #[serde(default = "default_true")]
    pub prefer_atomic_moves: bool,

    /// Whether to verify checksums after copying.
    #[serde(default)]
    pub verify_checksums: bool,

    /// Whether an existing destination file may be replaced.
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

fn default_buffer_size() -> usize {
    1024 * 1024 // 1 MB
}

fn default_true() -> bool {
    true
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            prefer_atomic_moves: true,
            verify_checksums: false,
            overwrite: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlacerConfig::default();
        assert_eq!(config.buffer_size, 1024 * 1024);
        assert!(config.prefer_atomic_moves);
        assert!(!config.verify_checksums);
        assert!(config.overwrite);
    }

    #[test]
    fn test_partial_deserialize() {
        let config: PlacerConfig = toml::from_str("verify_checksums = true").unwrap();
        assert!(config.verify_checksums);
        assert!(config.prefer_atomic_moves);
    }
}
