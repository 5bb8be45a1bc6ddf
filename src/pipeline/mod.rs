//! Long-audio transcription pipeline.
//!
//! ```text
//! ┌─────────┐    ┌─────────┐    ┌────────────┐    ┌───────────┐
//! │ Planner │───▶│ Decoder │───▶│ Reconciler │───▶│ Assembler │───▶ Transcript
//! └─────────┘    └─────────┘    └────────────┘    └───────────┘
//!                                      ▲                 │
//!                                      └── last segment ─┘
//! ```

pub mod assembler;
pub mod error;
pub mod orchestrator;
pub mod planner;
pub mod reconciler;
pub mod timestamp;

pub use assembler::{Segment, SegmentAssembler, Transcript};
pub use error::{CollectingReporter, ErrorReporter, LogReporter, StationError};
pub use orchestrator::{
    CancellationFlag, PipelineConfig, RunStats, TranscriptionPipeline, transcribe_blocking_task,
};
pub use planner::{ChunkPlan, ChunkWindow, plan_chunks};
pub use reconciler::{OverlapPolicy, Reconciled};
pub use timestamp::{
    format_srt_range, format_srt_timestamp, parse_srt_range, parse_srt_timestamp, round_millis,
};
