//! Testing utilities standing in for the external tools.
//!
//! The fakes are small `sh` scripts that accept the real balcon and ffmpeg
//! command lines, write their output file in chunks and exit with a chosen
//! status, so orchestration can be tested without either tool installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use txt2mp3_core::testing::{FakeTool, FakeToolBehavior};
//!
//! let tools = tempfile::TempDir::new()?;
//! let synth = FakeTool::synthesizer(tools.path(), FakeToolBehavior::fail(2))?;
//! let encoder = FakeTool::encoder(tools.path(), FakeToolBehavior::succeed())?;
//!
//! let orchestrator = JobOrchestrator::new(jobs, runner, synth.balcon(), encoder.ffmpeg());
//! ```

#[cfg(unix)]
mod fake_tool;

#[cfg(unix)]
pub use fake_tool::{FakeTool, FakeToolBehavior};
