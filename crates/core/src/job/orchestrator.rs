//! Sequential job orchestration.

use std::path::Path;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::placer::FsPlacer;
use crate::selector::JobSelection;
use crate::stage::{BalconSynthesizer, FfmpegEncoder, StageOutcome, StageRunner, Tool};

use super::config::JobsConfig;
use super::error::JobError;
use super::scratch::{tidy, ScratchDir};
use super::types::{BatchFailure, BatchResult, Job, JobEvent, JobReport};

/// Buffer between the stage runner and the job event stream.
const PROGRESS_BUFFER: usize = 128;

/// Converts text files into MP3s with a synthesizer `S` and an encoder `E`.
pub struct JobOrchestrator<S: Tool, E: Tool> {
    config: JobsConfig,
    runner: StageRunner,
    synthesizer: S,
    encoder: E,
    placer: FsPlacer,
}

impl JobOrchestrator<BalconSynthesizer, FfmpegEncoder> {
    /// Builds an orchestrator with balcon and ffmpeg as configured.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jobs.clone(),
            StageRunner::new(config.runner.clone()),
            BalconSynthesizer::new(config.synthesizer.clone()),
            FfmpegEncoder::new(config.encoder.clone()),
        )
        .with_placer(FsPlacer::new(config.placer.clone()))
    }
}

impl<S: Tool, E: Tool> JobOrchestrator<S, E> {
    pub fn new(config: JobsConfig, runner: StageRunner, synthesizer: S, encoder: E) -> Self {
        Self {
            config,
            runner,
            synthesizer,
            encoder,
            placer: FsPlacer::with_defaults(),
        }
    }

    /// Replaces the placer used for relocating and archiving files.
    pub fn with_placer(mut self, placer: FsPlacer) -> Self {
        self.placer = placer;
        self
    }

    pub fn config(&self) -> &JobsConfig {
        &self.config
    }

    /// Runs every selected job in order, stopping at the first failure.
    pub async fn run_batch(
        &self,
        selection: &JobSelection,
        events: Option<mpsc::Sender<JobEvent>>,
    ) -> BatchResult {
        let mut result = BatchResult::default();
        info!(
            "Converting {} file(s) in {}",
            selection.len(),
            selection.source_dir.display()
        );

        for input_file in &selection.files {
            match self
                .run_job(&selection.source_dir, input_file, events.as_ref())
                .await
            {
                Ok(report) => result.completed.push(report),
                Err(error) => {
                    error!("Job {} failed: {}", input_file, error);
                    result.failure = Some(BatchFailure {
                        input_file: input_file.clone(),
                        error,
                    });
                    break;
                }
            }
        }

        result
    }

    /// Converts `source_dir/input_file` and archives it.
    pub async fn run_job(
        &self,
        source_dir: &Path,
        input_file: &str,
        events: Option<&mpsc::Sender<JobEvent>>,
    ) -> Result<JobReport, JobError> {
        let start = Instant::now();
        let input_path = source_dir.join(input_file);
        if !input_path.is_file() {
            return Err(JobError::InputNotFound { path: input_path });
        }

        let scratch = ScratchDir::create(&self.config.temp_root).await?;
        let job = Job::new(source_dir, input_file, scratch.path());

        let result = self.convert(&job, events).await;
        if result.is_err() {
            if let Err(e) = scratch.remove().await {
                warn!(
                    "Failed to remove scratch directory {} after error: {}",
                    scratch.path().display(),
                    e
                );
            }
        }
        let mp3_size_bytes = result?;

        self.finish(&job, &scratch, mp3_size_bytes, start, events).await
    }

    /// Cleanup and archive steps, run once the MP3 is in place.
    async fn finish(
        &self,
        job: &Job,
        scratch: &ScratchDir,
        mp3_size_bytes: u64,
        start: Instant,
        events: Option<&mpsc::Sender<JobEvent>>,
    ) -> Result<JobReport, JobError> {
        // The MP3 is already in place, so a leftover scratch directory is only a warning
        if let Err(e) = scratch.remove().await {
            warn!(
                "Error deleting scratch directory {}: {}",
                scratch.path().display(),
                e
            );
            emit(
                events,
                JobEvent::CleanupFailed {
                    path: scratch.path().to_path_buf(),
                    reason: e.to_string(),
                },
            )
            .await;
        }

        let archived_input = job.archived_input(&self.config.archive_dir_name);
        self.placer.place(&job.input_path(), &archived_input).await?;

        let mp3_path = job.output_mp3();
        info!(
            "Converted {} -> {}, archived input to {}",
            job.input_file,
            mp3_path.display(),
            archived_input.display()
        );
        emit(
            events,
            JobEvent::Archived {
                mp3: mp3_path.clone(),
                archived_input: archived_input.clone(),
            },
        )
        .await;

        Ok(JobReport {
            input_file: job.input_file.clone(),
            mp3_path,
            archived_input,
            mp3_size_bytes,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Tidy, synthesize, encode and relocate. Returns the MP3 size.
    async fn convert(
        &self,
        job: &Job,
        events: Option<&mpsc::Sender<JobEvent>>,
    ) -> Result<u64, JobError> {
        tidy(&job.stale_paths()).await?;

        emit(
            events,
            JobEvent::Started {
                input_file: job.input_file.clone(),
            },
        )
        .await;
        info!("Input: {}", job.input_file);

        self.run_stage(&self.synthesizer, &job.input_path(), &job.scratch_wav(), events)
            .await?;
        self.run_stage(&self.encoder, &job.scratch_wav(), &job.scratch_mp3(), events)
            .await?;

        let placed = self.placer.place(&job.scratch_mp3(), &job.output_mp3()).await?;
        Ok(placed.size_bytes)
    }

    /// Runs one stage, forwarding its progress into the job event stream.
    async fn run_stage<T: Tool>(
        &self,
        tool: &T,
        input: &Path,
        output: &Path,
        events: Option<&mpsc::Sender<JobEvent>>,
    ) -> Result<StageOutcome, JobError> {
        let Some(events) = events else {
            return Ok(self.runner.run_tool(tool, input, output, None).await?);
        };

        let (progress_tx, mut progress_rx) = mpsc::channel(PROGRESS_BUFFER);
        let sink = events.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(progress) = progress_rx.recv().await {
                if sink.send(JobEvent::Stage(progress)).await.is_err() {
                    break;
                }
            }
        });

        let result = self
            .runner
            .run_tool(tool, input, output, Some(&progress_tx))
            .await;
        drop(progress_tx);
        let _ = forwarder.await;

        Ok(result?)
    }
}

async fn emit(events: Option<&mpsc::Sender<JobEvent>>, event: JobEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}
