//! Sequential long-audio transcription.
//!
//! ```text
//! Waveform ─▶ plan_chunks ─▶ for each window:
//!                              decode ─▶ reconcile(prev segment) ─▶ assemble
//!                            ─▶ Transcript
//! ```
//!
//! Windows are decoded strictly in plan order: reconciling window `i` needs
//! the final text of the segment accepted before it.

use crate::audio::Waveform;
use crate::config::{ChunkingConfig, Config};
use crate::error::{LongscribeError, Result};
use crate::pipeline::assembler::{SegmentAssembler, Transcript};
use crate::pipeline::error::{ErrorReporter, LogReporter, StationError};
use crate::pipeline::planner::{ChunkPlan, plan_chunks};
use crate::pipeline::reconciler::OverlapPolicy;
use crate::stt::decoder::ChunkDecoder;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Settings for one pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    pub chunking: ChunkingConfig,
    pub overlap: OverlapPolicy,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            chunking: config.chunking.clone(),
            overlap: config.overlap.clone(),
        }
    }
}

/// Shared stop signal, checked between windows.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counters for one run, logged when it completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub windows: usize,
    pub decode_failures: usize,
    pub silent_windows: usize,
    pub trimmed_windows: usize,
    pub absorbed_windows: usize,
}

/// Turns a waveform into a transcript using an injected decoder.
pub struct TranscriptionPipeline {
    config: PipelineConfig,
    reporter: Arc<dyn ErrorReporter>,
    cancel: CancellationFlag,
    deadline: Option<Instant>,
}

impl std::fmt::Debug for TranscriptionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptionPipeline")
            .field("config", &self.config)
            .field("cancelled", &self.cancel.is_cancelled())
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl TranscriptionPipeline {
    /// Create a pipeline, rejecting invalid configuration up front.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.chunking.validate()?;
        config.overlap.validate()?;
        Ok(Self {
            config,
            reporter: Arc::new(LogReporter),
            cancel: CancellationFlag::new(),
            deadline: None,
        })
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Stop issuing decode calls once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancel
    }

    /// Plan the windows for a waveform without decoding anything.
    pub fn plan(&self, waveform: &Waveform) -> Result<ChunkPlan> {
        plan_chunks(
            waveform.len(),
            waveform.sample_rate(),
            &self.config.chunking,
        )
    }

    fn check_interrupted(&self, completed: usize, total: usize) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(LongscribeError::Cancelled { completed, total });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(LongscribeError::DeadlineExceeded { completed, total });
        }
        Ok(())
    }

    /// Transcribe a whole waveform.
    ///
    /// Decode failures on single windows are reported and treated as
    /// silence. Cancellation and deadlines abort the run and discard any
    /// partial segments.
    pub fn run<D: ChunkDecoder + ?Sized>(
        &self,
        waveform: &Waveform,
        decoder: &D,
    ) -> Result<Transcript> {
        let plan = self.plan(waveform)?;
        let duration = waveform.duration_secs();
        let sample_rate = waveform.sample_rate();

        if plan.is_empty() {
            tracing::debug!("empty waveform, nothing to decode");
            return Ok(Transcript::empty(duration));
        }

        tracing::info!(
            windows = plan.len(),
            duration_s = duration,
            model = decoder.model_name(),
            "starting chunked transcription"
        );

        let mut assembler = SegmentAssembler::new();
        let mut stats = RunStats {
            windows: plan.len(),
            ..RunStats::default()
        };

        for window in plan.iter() {
            self.check_interrupted(window.index, plan.len())?;

            let start_s = window.start_secs(sample_rate);
            let end_s = window.end_secs(sample_rate);

            let samples = waveform.window(window.start..window.end);
            let raw = match decoder.decode(samples, sample_rate) {
                Ok(text) => text,
                Err(e) => {
                    stats.decode_failures += 1;
                    self.reporter.report(
                        "decoder",
                        &StationError::Recoverable(format!(
                            "window {} [{:.3}s, {:.3}s) failed, treating as silence: {}",
                            window.index + 1,
                            start_s,
                            end_s,
                            e
                        )),
                    );
                    String::new()
                }
            };

            let raw = raw.trim();
            if raw.is_empty() {
                stats.silent_windows += 1;
                tracing::debug!(window = window.index + 1, "no speech in window");
                continue;
            }

            let reconciled = match assembler.last_text() {
                Some(prev) if window.start > 0 => {
                    self.config.overlap.reconcile(prev, raw, start_s, end_s)
                }
                _ => self.config.overlap.reconcile("", raw, start_s, end_s),
            };
            if reconciled.was_trimmed() {
                stats.trimmed_windows += 1;
            }

            if assembler
                .push(&reconciled.text, reconciled.start_time, end_s)
                .is_none()
            {
                stats.absorbed_windows += 1;
                tracing::debug!(
                    window = window.index + 1,
                    "window absorbed into previous segment"
                );
            }
        }

        let transcript = assembler.finish(duration);
        tracing::info!(
            segments = transcript.total_segments,
            windows = stats.windows,
            decode_failures = stats.decode_failures,
            silent_windows = stats.silent_windows,
            trimmed_windows = stats.trimmed_windows,
            absorbed_windows = stats.absorbed_windows,
            "transcription complete"
        );
        Ok(transcript)
    }
}

/// Run a pipeline on tokio's blocking pool.
///
/// The waveform is moved into the task and dropped when the run ends,
/// including when it is cancelled through the pipeline's flag.
pub async fn transcribe_blocking_task<D>(
    pipeline: TranscriptionPipeline,
    waveform: Waveform,
    decoder: Arc<D>,
) -> Result<Transcript>
where
    D: ChunkDecoder + ?Sized + 'static,
{
    tokio::task::spawn_blocking(move || pipeline.run(&waveform, decoder.as_ref()))
        .await
        .map_err(|e| LongscribeError::Other(format!("transcription task failed: {}", e)))?
}
