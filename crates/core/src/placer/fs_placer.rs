//! File system placer implementation.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::debug;

use super::config::PlacerConfig;
use super::error::PlacerError;

/// A file that has been moved into place.
#[derive(Debug, Clone)]
pub struct PlacedFile {
    pub destination: PathBuf,
    pub size_bytes: u64,
    /// SHA-256 of the copied bytes, when the file was copied with verification.
    pub checksum: Option<String>,
    /// Whether the move was a rename rather than a copy.
    pub renamed: bool,
}

/// File system based placer.
#[derive(Debug, Clone, Default)]
pub struct FsPlacer {
    config: PlacerConfig,
}

impl FsPlacer {
    /// Creates a new file system placer with the given configuration.
    pub fn new(config: PlacerConfig) -> Self {
        Self { config }
    }

    /// Creates a placer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlacerConfig::default())
    }

    /// Moves `source` to `destination`. The source no longer exists afterwards.
    pub async fn place(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<PlacedFile, PlacerError> {
        if !source.exists() {
            return Err(PlacerError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        if destination.exists() {
            if !self.config.overwrite {
                return Err(PlacerError::DestinationExists {
                    path: destination.to_path_buf(),
                });
            }
            fs::remove_file(destination).await?;
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PlacerError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        if self.config.prefer_atomic_moves && Self::try_atomic_move(source, destination).await? {
            let meta = fs::metadata(destination).await?;
            debug!(
                "Renamed {} -> {}",
                source.display(),
                destination.display()
            );
            return Ok(PlacedFile {
                destination: destination.to_path_buf(),
                size_bytes: meta.len(),
                checksum: None,
                renamed: true,
            });
        }

        let (size_bytes, checksum) = self
            .copy_file(source, destination, self.config.verify_checksums)
            .await?;

        if let Some(expected) = &checksum {
            let actual = self.calculate_checksum(destination).await?;
            if &actual != expected {
                let _ = fs::remove_file(destination).await;
                return Err(PlacerError::ChecksumMismatch {
                    path: destination.to_path_buf(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        fs::remove_file(source)
            .await
            .map_err(|e| PlacerError::CleanupFailed {
                path: source.to_path_buf(),
                source: e,
            })?;

        debug!(
            "Copied {} -> {} ({} bytes)",
            source.display(),
            destination.display(),
            size_bytes
        );

        Ok(PlacedFile {
            destination: destination.to_path_buf(),
            size_bytes,
            checksum,
            renamed: false,
        })
    }

    /// Attempts to move a file atomically (rename).
    ///
    /// Returns `Ok(false)` when the rename crosses filesystems.
    async fn try_atomic_move(source: &Path, destination: &Path) -> Result<bool, PlacerError> {
        match fs::rename(source, destination).await {
            Ok(()) => Ok(true),
            Err(e) => {
                // Cross-filesystem moves fail with EXDEV (18 on Linux, 17 on Windows)
                if e.kind() == std::io::ErrorKind::CrossesDevices
                    || e.raw_os_error() == Some(18)
                    || (cfg!(windows) && e.raw_os_error() == Some(17))
                {
                    Ok(false)
                } else {
                    Err(PlacerError::move_failed(
                        source.to_path_buf(),
                        destination.to_path_buf(),
                        e,
                    ))
                }
            }
        }
    }

    /// Copies a file with optional checksum calculation.
    async fn copy_file(
        &self,
        source: &Path,
        destination: &Path,
        calculate_checksum: bool,
    ) -> Result<(u64, Option<String>), PlacerError> {
        let copy_err =
            |e| PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e);

        let source_file = File::open(source).await.map_err(copy_err)?;
        let dest_file = File::create(destination).await.map_err(copy_err)?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, dest_file);
        let mut hasher = calculate_checksum.then(Sha256::new);

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; self.config.buffer_size.max(1)];

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(copy_err)?;
            if bytes_read == 0 {
                break;
            }
            if let Some(ref mut h) = hasher {
                h.update(&buffer[..bytes_read]);
            }
            writer
                .write_all(&buffer[..bytes_read])
                .await
                .map_err(copy_err)?;
            total_bytes += bytes_read as u64;
        }

        writer.flush().await.map_err(copy_err)?;

        Ok((total_bytes, hasher.map(|h| format!("{:x}", h.finalize()))))
    }

    /// SHA-256 of a file on disk.
    async fn calculate_checksum(&self, path: &Path) -> Result<String, PlacerError> {
        let file = File::open(path).await?;
        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut buffer = vec![0u8; self.config.buffer_size.max(1)];
        let mut hasher = Sha256::new();
        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_place_renames_and_creates_parents() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("speech.txt");
        std::fs::write(&source, b"hello").unwrap();
        let destination = dir.path().join("converted-text").join("speech.txt");

        let placed = FsPlacer::with_defaults()
            .place(&source, &destination)
            .await
            .unwrap();

        assert!(placed.renamed);
        assert_eq!(placed.size_bytes, 5);
        assert!(!source.exists());
        assert_eq!(std::fs::read(&destination).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_place_copy_with_checksum() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.mp3");
        std::fs::write(&source, vec![7u8; 10_000]).unwrap();
        let destination = dir.path().join("out").join("a.mp3");

        let placer = FsPlacer::new(PlacerConfig {
            buffer_size: 1024,
            prefer_atomic_moves: false,
            verify_checksums: true,
            overwrite: true,
        });
        let placed = placer.place(&source, &destination).await.unwrap();

        assert!(!placed.renamed);
        assert_eq!(placed.size_bytes, 10_000);
        assert_eq!(placed.checksum.as_ref().map(String::len), Some(64));
        assert!(!source.exists());
        assert_eq!(std::fs::read(&destination).unwrap().len(), 10_000);
    }

    #[tokio::test]
    async fn test_place_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("new.mp3");
        let destination = dir.path().join("old.mp3");
        std::fs::write(&source, b"new").unwrap();
        std::fs::write(&destination, b"old contents").unwrap();

        FsPlacer::with_defaults()
            .place(&source, &destination)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&destination).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_place_refuses_overwrite_when_disabled() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("new.mp3");
        let destination = dir.path().join("old.mp3");
        std::fs::write(&source, b"new").unwrap();
        std::fs::write(&destination, b"old").unwrap();

        let placer = FsPlacer::new(PlacerConfig {
            overwrite: false,
            ..Default::default()
        });
        let err = placer.place(&source, &destination).await.unwrap_err();
        assert!(matches!(err, PlacerError::DestinationExists { .. }));
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_place_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = FsPlacer::with_defaults()
            .place(&dir.path().join("missing"), &dir.path().join("dest"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlacerError::SourceNotFound { .. }));
    }
}
