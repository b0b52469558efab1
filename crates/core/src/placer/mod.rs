//! Placer module for moving files to their final destinations.
//!
//! Used to relocate the encoded MP3 out of the scratch directory and to
//! archive the original text file once a job has finished.
//!
//! # Features
//!
//! - Atomic rename when source and destination share a filesystem
//! - Automatic fallback to copy and delete across filesystems
//! - Optional SHA-256 verification of copied files
//! - Automatic parent directory creation
//!
//! # Example
//!
//! ```ignore
//! use txt2mp3_core::placer::FsPlacer;
//!
//! let placer = FsPlacer::with_defaults();
//! let placed = placer
//!     .place(Path::new("/tmp/123/speech.mp3"), Path::new("/in/speech.mp3"))
//!     .await?;
//! println!("Placed {} bytes", placed.size_bytes);
//! ```

mod config;
mod error;
mod fs_placer;

pub use config::PlacerConfig;
pub use error::PlacerError;
pub use fs_placer::{FsPlacer, PlacedFile};
