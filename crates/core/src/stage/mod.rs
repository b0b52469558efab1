//! Stage module for running external media tools.
//!
//! A stage launches an external executable, watches the file it is writing
//! and reports an estimated completion percentage based on how large that
//! file has grown compared to a predicted final size.
//!
//! # Stages
//!
//! - Synthesis: text file to WAV through a balcon-compatible TTS tool
//! - Encode: WAV to MP3 through ffmpeg
//!
//! # Example
//!
//! ```ignore
//! use txt2mp3_core::stage::{BalconSynthesizer, RunnerConfig, StageRunner, SynthesizerConfig};
//!
//! let runner = StageRunner::new(RunnerConfig::default());
//! let synthesizer = BalconSynthesizer::new(SynthesizerConfig::default());
//!
//! let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel(64);
//! tokio::spawn(async move {
//!     while let Some(progress) = progress_rx.recv().await {
//!         println!("{}: {}%", progress.stage, progress.percent);
//!     }
//! });
//!
//! let outcome = runner
//!     .run_tool(
//!         &synthesizer,
//!         Path::new("speech.txt"),
//!         Path::new("/tmp/speech.wav"),
//!         Some(&progress_tx),
//!     )
//!     .await?;
//! println!("Wrote {} bytes", outcome.output_size_bytes);
//! ```

mod config;
mod encode;
mod error;
mod progress;
mod runner;
mod synthesis;
mod traits;
mod types;

pub use config::{EncoderConfig, RetryConfig, RunnerConfig, SynthesizerConfig};
pub use encode::FfmpegEncoder;
pub use error::StageError;
pub use progress::{percent_of, ProgressTracker};
pub use runner::StageRunner;
pub use synthesis::BalconSynthesizer;
pub use traits::Tool;
pub use types::{StageKind, StageOutcome, StageProgress, StageSpec};
