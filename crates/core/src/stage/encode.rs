//! MP3 encoding stage backed by ffmpeg.

use std::path::Path;
use std::time::Duration;

use super::config::{EncoderConfig, RetryConfig};
use super::traits::Tool;
use super::types::StageKind;

/// FFmpeg based encoder producing an MP3 without a video stream.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    config: EncoderConfig,
}

impl FfmpegEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(EncoderConfig::default())
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

impl Tool for FfmpegEncoder {
    fn kind(&self) -> StageKind {
        StageKind::Encode
    }

    fn program(&self) -> &Path {
        &self.config.path
    }

    fn args(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-y".to_string(),
            "-loglevel".to_string(),
            self.config.log_level.clone(),
            "-stats".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-f".to_string(),
            "mp3".to_string(),
            "-ab".to_string(),
            self.config.bitrate.to_string(),
            "-vn".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    fn predict_size(&self, input_bytes: u64) -> u64 {
        if self.config.compression_ratio <= 0.0 {
            return 0;
        }
        (input_bytes as f64 / self.config.compression_ratio) as u64
    }

    fn timeout(&self) -> Option<Duration> {
        self.config.timeout_secs.map(Duration::from_secs)
    }

    fn retry(&self) -> RetryConfig {
        self.config.retry.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let encoder = FfmpegEncoder::with_defaults();
        let args = encoder.args(Path::new("/tmp/42/speech.wav"), Path::new("/tmp/42/speech.mp3"));

        assert_eq!(args.first().map(String::as_str), Some("-hide_banner"));
        assert!(args.contains(&"-y".to_string()));
        assert!(args.contains(&"-vn".to_string()));
        assert!(args.windows(2).any(|w| w == ["-loglevel", "warning"]));
        assert!(args.windows(2).any(|w| w == ["-i", "/tmp/42/speech.wav"]));
        assert!(args.windows(2).any(|w| w == ["-f", "mp3"]));
        assert!(args.windows(2).any(|w| w == ["-ab", "192000"]));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/42/speech.mp3"));
    }

    #[test]
    fn test_custom_bitrate() {
        let encoder = FfmpegEncoder::new(EncoderConfig::default().with_bitrate(128_000));
        let args = encoder.args(Path::new("a.wav"), Path::new("a.mp3"));
        assert!(args.windows(2).any(|w| w == ["-ab", "128000"]));
    }

    #[test]
    fn test_predict_size() {
        let encoder = FfmpegEncoder::with_defaults();
        assert_eq!(encoder.predict_size(9_600_000), 6_000_000);
        assert_eq!(encoder.predict_size(0), 0);
    }

    #[test]
    fn test_predict_size_with_invalid_ratio() {
        let mut config = EncoderConfig::default();
        config.compression_ratio = 0.0;
        assert_eq!(FfmpegEncoder::new(config).predict_size(1000), 0);
    }
}
