pub mod config;
pub mod job;
pub mod placer;
pub mod selector;
pub mod stage;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_default_config, validate_config, Config, ConfigError,
};
pub use job::{
    BatchFailure, BatchResult, Job, JobError, JobEvent, JobOrchestrator, JobReport, JobsConfig,
    ScratchDir,
};
pub use placer::{FsPlacer, PlacerConfig, PlacerError};
pub use selector::{select_jobs, JobSelection, SelectorError};
pub use stage::{
    BalconSynthesizer, EncoderConfig, FfmpegEncoder, RetryConfig, RunnerConfig, StageError,
    StageKind, StageProgress, StageRunner, SynthesizerConfig, Tool,
};
