//! Builds the ordered segment list and the final transcript.

use crate::pipeline::timestamp::{format_srt_range, serialize_millis, serialize_millis_pair};
use serde::Serialize;

/// One row of the transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// 1-based, contiguous across the transcript.
    pub index: usize,
    pub text: String,
    #[serde(serialize_with = "serialize_millis")]
    pub start_time: f64,
    #[serde(serialize_with = "serialize_millis")]
    pub end_time: f64,
    #[serde(serialize_with = "serialize_millis_pair")]
    pub timestamp: [f64; 2],
    pub srt_timestamp: String,
}

impl Segment {
    pub fn duration_secs(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// The assembled result of one transcription run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    /// Segment texts joined with single spaces.
    pub text: String,
    /// Waveform length in seconds.
    pub duration: f64,
    pub segments: Vec<Segment>,
    pub total_segments: usize,
}

impl Transcript {
    /// Transcript of a waveform that produced no speech.
    pub fn empty(duration: f64) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Accumulates segments in plan order.
#[derive(Debug, Default)]
pub struct SegmentAssembler {
    segments: Vec<Segment>,
}

impl SegmentAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the last accepted segment, if any.
    pub fn last_text(&self) -> Option<&str> {
        self.segments.last().map(|s| s.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a segment, returning it, or `None` if the text is empty.
    ///
    /// The start is held at or after the previous segment's start so the
    /// list stays ordered even when a trim pushed the previous start past
    /// this window's planned start.
    pub fn push(&mut self, text: &str, start_time: f64, end_time: f64) -> Option<&Segment> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let floor = self.segments.last().map_or(0.0, |s| s.start_time);
        let start_time = start_time.max(floor);
        if end_time <= start_time {
            tracing::warn!(
                start_time,
                end_time,
                "dropping segment with empty time range"
            );
            return None;
        }

        let segment = Segment {
            index: self.segments.len() + 1,
            text: text.to_string(),
            start_time,
            end_time,
            timestamp: [start_time, end_time],
            srt_timestamp: format_srt_range(start_time, end_time),
        };
        self.segments.push(segment);
        self.segments.last()
    }

    /// Consume the assembler and build the transcript.
    pub fn finish(self, duration: f64) -> Transcript {
        let text = self
            .segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        Transcript {
            text,
            duration,
            total_segments: self.segments.len(),
            segments: self.segments,
        }
    }
}
