//! Text-to-speech stage backed by balcon.
//!
//! See <http://www.cross-plus-a.com/bconsole.htm> for the command line.

use std::path::Path;
use std::time::Duration;

use super::config::{RetryConfig, SynthesizerConfig};
use super::traits::Tool;
use super::types::StageKind;

/// Balcon based synthesizer producing a WAV file from UTF-8 text.
#[derive(Debug, Clone)]
pub struct BalconSynthesizer {
    config: SynthesizerConfig,
}

impl BalconSynthesizer {
    pub fn new(config: SynthesizerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(SynthesizerConfig::default())
    }

    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }
}

impl Tool for BalconSynthesizer {
    fn kind(&self) -> StageKind {
        StageKind::Synthesis
    }

    fn program(&self) -> &Path {
        &self.config.path
    }

    fn args(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-q".to_string(),
            "-sb".to_string(),
            self.config.queue_size.to_string(),
            "-f".to_string(),
            input.to_string_lossy().to_string(),
            "--encoding".to_string(),
            "utf8".to_string(),
            "-w".to_string(),
            output.to_string_lossy().to_string(),
            "-n".to_string(),
            self.config.voice.clone(),
        ]
    }

    fn predict_size(&self, input_bytes: u64) -> u64 {
        input_bytes.saturating_mul(self.config.bytes_per_char)
    }

    fn timeout(&self) -> Option<Duration> {
        self.config.timeout_secs.map(Duration::from_secs)
    }

    fn retry(&self) -> RetryConfig {
        self.config.retry.clone()
    }
}
