use serde::{Deserialize, Serialize};

use crate::job::JobsConfig;
use crate::placer::PlacerConfig;
use crate::stage::{EncoderConfig, RunnerConfig, SynthesizerConfig};

/// Root configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub synthesizer: SynthesizerConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
    #[serde(default)]
    pub placer: PlacerConfig,
}
