//! Job module: converts one text file at a time into an MP3.
//!
//! Each job walks a fixed sequence:
//! 1. Prepare a private scratch directory
//! 2. Tidy stale outputs from earlier runs
//! 3. Synthesize the text into a WAV in the scratch directory
//! 4. Encode the WAV into an MP3 and move it next to the input
//! 5. Delete the scratch directory (failures are reported, not fatal)
//! 6. Archive the input into `converted-text/`
//!
//! A batch runs its jobs one after another and stops at the first fatal
//! error. Jobs archived before the failure stay archived.
//!
//! # Example
//!
//! ```ignore
//! use txt2mp3_core::{load_default_config, select_jobs, JobOrchestrator};
//!
//! let config = load_default_config()?;
//! let selection = select_jobs("*.txt", &std::env::current_dir()?)?;
//! let orchestrator = JobOrchestrator::from_config(&config);
//!
//! let batch = orchestrator.run_batch(&selection, None).await;
//! println!("{} file(s) converted", batch.completed.len());
//! ```

mod config;
mod error;
mod orchestrator;
mod scratch;
mod types;

pub use config::JobsConfig;
pub use error::JobError;
pub use orchestrator::JobOrchestrator;
pub use scratch::{tidy, ScratchDir};
pub use types::{BatchFailure, BatchResult, Job, JobEvent, JobReport};
