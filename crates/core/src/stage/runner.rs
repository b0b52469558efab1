//! Generic process runner with size based progress polling.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::fs;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use super::config::RunnerConfig;
use super::error::StageError;
use super::progress::ProgressTracker;
use super::traits::Tool;
use super::types::{StageKind, StageOutcome, StageProgress, StageSpec};

/// ETXTBSY on Linux.
const TEXT_FILE_BUSY: i32 = 26;
const SPAWN_ATTEMPTS: u32 = 5;

/// Runs external tools while reporting progress from the size of their output.
#[derive(Debug, Clone, Default)]
pub struct StageRunner {
    config: RunnerConfig,
}

impl StageRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs `tool` to turn `input` into `output`, applying the tool's retry policy.
    pub async fn run_tool<T: Tool + ?Sized>(
        &self,
        tool: &T,
        input: &Path,
        output: &Path,
        progress_tx: Option<&mpsc::Sender<StageProgress>>,
    ) -> Result<StageOutcome, StageError> {
        let stage = tool.kind();
        let input_size = fs::metadata(input)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    StageError::InputNotFound {
                        stage,
                        path: input.to_path_buf(),
                    }
                } else {
                    StageError::Io(e)
                }
            })?
            .len();

        let spec = StageSpec {
            stage,
            program: tool.program().to_path_buf(),
            args: tool.args(input, output),
            target: output.to_path_buf(),
            predicted_size: tool.predict_size(input_size),
            timeout: tool.timeout(),
        };
        debug!(
            stage = %stage,
            input_bytes = input_size,
            predicted_bytes = spec.predicted_size,
            "Prepared stage"
        );

        let retry = tool.retry();
        let max_attempts = retry.max_attempts.max(1);
        // Shared across attempts so a retry never reports less than was already shown
        let mut tracker = ProgressTracker::new(spec.predicted_size);
        let mut attempt = 1;
        loop {
            match self.run(&spec, &mut tracker, progress_tx).await {
                Ok(mut outcome) => {
                    outcome.attempts = attempt;
                    return Ok(outcome);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(
                        stage = %stage,
                        attempt,
                        max_attempts,
                        "Stage failed, retrying in {}s: {}",
                        retry.delay_secs,
                        e
                    );
                    time::sleep(retry.delay()).await;
                    if let Err(e) = fs::remove_file(&spec.target).await {
                        if e.kind() != std::io::ErrorKind::NotFound {
                            return Err(StageError::Io(e));
                        }
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Runs a single invocation and polls `spec.target` until the process exits.
    ///
    /// Updates go through `tracker`, so they only ever rise across calls
    /// sharing it. The final 100% update is sent only when the tool succeeded.
    pub async fn run(
        &self,
        spec: &StageSpec,
        tracker: &mut ProgressTracker,
        progress_tx: Option<&mpsc::Sender<StageProgress>>,
    ) -> Result<StageOutcome, StageError> {
        let start = Instant::now();
        let stage = spec.stage;

        info!(stage = %stage, program = %spec.program.display(), "Starting tool");
        let child = self.spawn(spec).await?;
        let mut waiter = tokio::spawn(wait_for_exit(child, stage, spec.timeout));

        let mut ticker = time::interval_at(
            time::Instant::now() + self.config.startup_delay(),
            self.config.poll_interval(),
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let joined = loop {
            tokio::select! {
                joined = &mut waiter => break joined,
                _ = ticker.tick() => {
                    let Ok(meta) = fs::metadata(&spec.target).await else {
                        continue;
                    };
                    if let Some(percent) = tracker.observe(meta.len()) {
                        trace!(stage = %stage, percent, "Progress");
                        if let Some(tx) = progress_tx {
                            // Display only; drop updates if the consumer lags
                            let _ = tx.try_send(StageProgress { stage, percent });
                        }
                    }
                }
            }
        };

        let status = match joined {
            Ok(result) => result?,
            Err(e) => {
                return Err(StageError::TaskFailed {
                    stage,
                    reason: e.to_string(),
                })
            }
        };
        debug!(stage = %stage, ?status, "Tool exited");

        let output_size_bytes = match fs::metadata(&spec.target).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StageError::OutputMissing {
                    stage,
                    path: spec.target.clone(),
                })
            }
            Err(e) => return Err(StageError::Io(e)),
        };

        if let (Some(percent), Some(tx)) = (tracker.finish(), progress_tx) {
            let _ = tx.send(StageProgress { stage, percent }).await;
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            stage = %stage,
            output_bytes = output_size_bytes,
            predicted_bytes = spec.predicted_size,
            duration_ms,
            "Stage complete"
        );

        Ok(StageOutcome {
            stage,
            output_path: spec.target.clone(),
            output_size_bytes,
            predicted_size: spec.predicted_size,
            duration_ms,
            attempts: 1,
        })
    }

    /// Launches the tool with its output discarded.
    async fn spawn(&self, spec: &StageSpec) -> Result<Child, StageError> {
        let mut attempt = 1;
        loop {
            let spawned = Command::new(&spec.program)
                .args(&spec.args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .spawn();

            match spawned {
                Ok(child) => return Ok(child),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(StageError::ToolNotFound {
                        stage: spec.stage,
                        path: spec.program.clone(),
                    })
                }
                // The binary was written moments ago and is still open elsewhere
                Err(e) if e.raw_os_error() == Some(TEXT_FILE_BUSY) && attempt < SPAWN_ATTEMPTS => {
                    attempt += 1;
                    time::sleep(Duration::from_millis(20)).await;
                }
                Err(e) => return Err(StageError::Io(e)),
            }
        }
    }
}

/// Waits for the tool to exit and checks its status.
async fn wait_for_exit(
    mut child: Child,
    stage: StageKind,
    limit: Option<Duration>,
) -> Result<ExitStatus, StageError> {
    let status = match limit {
        Some(limit) => match time::timeout(limit, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                warn!(stage = %stage, "Tool timed out, killing it");
                let _ = child.kill().await;
                return Err(StageError::Timeout {
                    stage,
                    timeout_secs: limit.as_secs(),
                });
            }
        },
        None => child.wait().await?,
    };

    if status.success() {
        Ok(status)
    } else {
        Err(StageError::ToolFailed {
            stage,
            code: status.code(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fast_runner() -> StageRunner {
        StageRunner::new(RunnerConfig::with_timings(0, 10))
    }

    fn sh_spec(script: &str, target: PathBuf, predicted_size: u64) -> StageSpec {
        StageSpec {
            stage: StageKind::Encode,
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".to_string(), script.to_string()],
            target,
            predicted_size,
            timeout: None,
        }
    }

    fn tracker() -> ProgressTracker {
        ProgressTracker::new(10)
    }

    fn drain(rx: &mut mpsc::Receiver<StageProgress>) -> Vec<u8> {
        let mut seen = Vec::new();
        while let Ok(p) = rx.try_recv() {
            seen.push(p.percent);
        }
        seen
    }

    #[tokio::test]
    async fn test_run_reports_growing_output() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.bin");
        let script = format!(
            "for i in 1 2 3 4 5; do head -c 200 /dev/zero >> '{}'; sleep 0.05; done",
            target.display()
        );
        let (tx, mut rx) = mpsc::channel(256);

        let outcome = fast_runner()
            .run(
                &sh_spec(&script, target.clone(), 1000),
                &mut ProgressTracker::new(1000),
                Some(&tx),
            )
            .await
            .unwrap();

        assert_eq!(outcome.output_size_bytes, 1000);
        assert_eq!(outcome.predicted_size, 1000);

        let seen = drain(&mut rx);
        assert_eq!(seen.last(), Some(&100));
        assert_eq!(seen.iter().filter(|p| **p == 100).count(), 1);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_shared_tracker_never_goes_back() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.bin");
        let runner = fast_runner();
        let mut tracker = ProgressTracker::new(1000);
        let (tx, mut rx) = mpsc::channel(256);

        let first = format!(
            "head -c 600 /dev/zero > '{}'; sleep 0.1; exit 1",
            target.display()
        );
        runner
            .run(&sh_spec(&first, target.clone(), 1000), &mut tracker, Some(&tx))
            .await
            .unwrap_err();
        std::fs::remove_file(&target).unwrap();

        let second = format!(
            "for i in 1 2 3 4 5; do head -c 200 /dev/zero >> '{}'; sleep 0.05; done",
            target.display()
        );
        runner
            .run(&sh_spec(&second, target.clone(), 1000), &mut tracker, Some(&tx))
            .await
            .unwrap();

        let seen = drain(&mut rx);
        assert_eq!(seen.first(), Some(&60));
        assert!(seen.windows(2).all(|w| w[0] < w[1]), "{seen:?}");
        assert_eq!(seen.last(), Some(&100));
    }

    #[tokio::test]
    async fn test_run_non_zero_exit() {
        let dir = TempDir::new().unwrap();
        let (tx, mut rx) = mpsc::channel(16);

        let err = fast_runner()
            .run(&sh_spec("exit 2", dir.path().join("x"), 10), &mut tracker(), Some(&tx))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StageError::ToolFailed {
                stage: StageKind::Encode,
                code: Some(2)
            }
        ));
        assert!(!drain(&mut rx).contains(&100));
    }

    #[tokio::test]
    async fn test_run_missing_output() {
        let dir = TempDir::new().unwrap();
        let err = fast_runner()
            .run(&sh_spec("exit 0", dir.path().join("never"), 10), &mut tracker(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::OutputMissing { .. }));
    }

    #[tokio::test]
    async fn test_run_tool_not_found() {
        let dir = TempDir::new().unwrap();
        let mut spec = sh_spec("", dir.path().join("x"), 10);
        spec.program = dir.path().join("no-such-tool");

        let err = fast_runner()
            .run(&spec, &mut tracker(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::ToolNotFound { .. }));
    }

    #[tokio::test]
    async fn test_run_timeout_kills_tool() {
        let dir = TempDir::new().unwrap();
        let mut spec = sh_spec("sleep 30", dir.path().join("x"), 10);
        spec.timeout = Some(Duration::from_millis(200));

        let started = Instant::now();
        let err = fast_runner()
            .run(&spec, &mut tracker(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_startup_delay_does_not_hold_fast_tools() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.bin");
        let script = format!("head -c 10 /dev/zero > '{}'", target.display());
        let runner = StageRunner::new(RunnerConfig::with_timings(5000, 10));

        let started = Instant::now();
        runner
            .run(&sh_spec(&script, target, 10), &mut tracker(), None)
            .await
            .unwrap();
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
