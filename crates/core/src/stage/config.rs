//! Configuration for the stage module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the text-to-speech tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizerConfig {
    /// Path to the balcon executable.
    #[serde(default = "default_balcon_path")]
    pub path: PathBuf,

    /// Installed voice used for synthesis.
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Sentence queue size passed as `-sb`.
    #[serde(default = "default_queue_size")]
    pub queue_size: u32,

    /// WAV bytes produced per input text byte, used to predict the output size.
    #[serde(default = "default_bytes_per_char")]
    pub bytes_per_char: u64,

    /// Kill the tool after this many seconds. No limit when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Retry policy for failed runs.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Configuration for the ffmpeg encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Path to the ffmpeg executable.
    #[serde(default = "default_ffmpeg_path")]
    pub path: PathBuf,

    /// Audio bitrate in bits per second.
    #[serde(default = "default_bitrate")]
    pub bitrate: u32,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Expected WAV to MP3 size ratio, used to predict the output size.
    #[serde(default = "default_compression_ratio")]
    pub compression_ratio: f64,

    /// Kill the encoder after this many seconds. No limit when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Retry policy for failed runs.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Retry configuration for a stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts in seconds.
    #[serde(default = "default_retry_delay")]
    pub delay_secs: u64,
}

/// Timing of the progress poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Time given to the tool to start writing before the first poll.
    #[serde(default = "default_startup_delay")]
    pub startup_delay_ms: u64,

    /// Interval between output size checks.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_balcon_path() -> PathBuf {
    PathBuf::from("balcon")
}

fn default_voice() -> String {
    "Microsoft David Desktop".to_string()
}

fn default_queue_size() -> u32 {
    5000
}

fn default_bytes_per_char() -> u64 {
    3200
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_bitrate() -> u32 {
    192_000
}

fn default_log_level() -> String {
    "warning".to_string()
}

fn default_compression_ratio() -> f64 {
    1.6
}

fn default_max_attempts() -> u32 {
    1
}

fn default_retry_delay() -> u64 {
    5
}

fn default_startup_delay() -> u64 {
    2000
}

fn default_poll_interval() -> u64 {
    100
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            path: default_balcon_path(),
            voice: default_voice(),
            queue_size: default_queue_size(),
            bytes_per_char: default_bytes_per_char(),
            timeout_secs: None,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            path: default_ffmpeg_path(),
            bitrate: default_bitrate(),
            log_level: default_log_level(),
            compression_ratio: default_compression_ratio(),
            timeout_secs: None,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_retry_delay(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            startup_delay_ms: default_startup_delay(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl SynthesizerConfig {
    /// Creates a config pointing at a specific balcon binary.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Sets the voice.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

impl EncoderConfig {
    /// Creates a config pointing at a specific ffmpeg binary.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Sets the bitrate in bits per second.
    pub fn with_bitrate(mut self, bitrate: u32) -> Self {
        self.bitrate = bitrate;
        self
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

impl RetryConfig {
    /// Delay between attempts.
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl RunnerConfig {
    /// Creates a config with the given timings in milliseconds.
    pub fn with_timings(startup_delay_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            startup_delay_ms,
            poll_interval_ms,
        }
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    /// Interval between polls. Never zero.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
