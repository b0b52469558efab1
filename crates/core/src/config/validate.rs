use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Tool paths are set
/// - Size prediction factors are positive
/// - Poll interval is not 0
/// - Retry policies allow at least one attempt
/// - Archive directory is a plain directory name
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.synthesizer.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "synthesizer.path cannot be empty".to_string(),
        ));
    }
    if config.encoder.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "encoder.path cannot be empty".to_string(),
        ));
    }

    if config.synthesizer.bytes_per_char == 0 {
        return Err(ConfigError::ValidationError(
            "synthesizer.bytes_per_char cannot be 0".to_string(),
        ));
    }
    let ratio = config.encoder.compression_ratio;
    if ratio.is_nan() || ratio <= 0.0 {
        return Err(ConfigError::ValidationError(
            "encoder.compression_ratio must be positive".to_string(),
        ));
    }

    if config.runner.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "runner.poll_interval_ms cannot be 0".to_string(),
        ));
    }

    for (section, retry) in [
        ("synthesizer", &config.synthesizer.retry),
        ("encoder", &config.encoder.retry),
    ] {
        if retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{section}.retry.max_attempts cannot be 0"
            )));
        }
    }

    let archive = &config.jobs.archive_dir_name;
    if archive.is_empty() || archive.contains(['/', '\\']) || archive == "." || archive == ".." {
        return Err(ConfigError::ValidationError(format!(
            "jobs.archive_dir_name must be a single directory name, got '{archive}'"
        )));
    }

    Ok(())
}
