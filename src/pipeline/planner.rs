//! Splits a waveform into bounded, overlapping decode windows.

use crate::config::ChunkingConfig;
use crate::error::{LongscribeError, Result};

/// Half-open sample range `[start, end)` sent to the decoder as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkWindow {
    /// Position in the plan, 0-based.
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl ChunkWindow {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn start_secs(&self, sample_rate: u32) -> f64 {
        self.start as f64 / f64::from(sample_rate)
    }

    pub fn end_secs(&self, sample_rate: u32) -> f64 {
        self.end as f64 / f64::from(sample_rate)
    }
}

/// Ordered windows covering a whole waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkPlan {
    windows: Vec<ChunkWindow>,
    sample_rate: u32,
    max_chunk_samples: usize,
    overlap_samples: usize,
}

impl ChunkPlan {
    pub fn windows(&self) -> &[ChunkWindow] {
        &self.windows
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChunkWindow> {
        self.windows.iter()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn max_chunk_samples(&self) -> usize {
        self.max_chunk_samples
    }

    pub fn overlap_samples(&self) -> usize {
        self.overlap_samples
    }
}

/// Sample counts derived from a chunking config, validated.
fn window_sizes(sample_rate: u32, config: &ChunkingConfig) -> Result<(usize, usize)> {
    config.validate()?;
    if sample_rate == 0 {
        return Err(LongscribeError::invalid_config(
            "sample_rate",
            "must be positive",
        ));
    }

    let rate = f64::from(sample_rate);
    let max_chunk_samples = (config.max_chunk_seconds * rate) as usize;
    let overlap_samples = (config.overlap_seconds * rate) as usize;

    if max_chunk_samples == 0 {
        return Err(LongscribeError::invalid_config(
            "max_chunk_seconds",
            format!(
                "{}s is shorter than one sample at {} Hz",
                config.max_chunk_seconds, sample_rate
            ),
        ));
    }
    if overlap_samples >= max_chunk_samples {
        return Err(LongscribeError::invalid_config(
            "overlap_seconds",
            format!(
                "{} overlap samples would not advance a {} sample window",
                overlap_samples, max_chunk_samples
            ),
        ));
    }

    Ok((max_chunk_samples, overlap_samples))
}

/// Plan the decode windows for `total_samples` of audio.
///
/// Short audio gets one window. Longer audio gets windows of
/// `max_chunk_samples`, each starting `overlap_samples` before the previous
/// end, until a window reaches the end of the waveform. An empty waveform
/// yields an empty plan.
///
/// # Errors
/// `ConfigInvalidValue` when the durations are non-positive or the overlap
/// is not shorter than the window.
pub fn plan_chunks(
    total_samples: usize,
    sample_rate: u32,
    config: &ChunkingConfig,
) -> Result<ChunkPlan> {
    let (max_chunk_samples, overlap_samples) = window_sizes(sample_rate, config)?;

    let mut windows = Vec::new();

    if total_samples > 0 && total_samples <= max_chunk_samples {
        windows.push(ChunkWindow {
            index: 0,
            start: 0,
            end: total_samples,
        });
    } else if total_samples > max_chunk_samples {
        let mut start = 0usize;
        loop {
            let end = (start + max_chunk_samples).min(total_samples);
            windows.push(ChunkWindow {
                index: windows.len(),
                start,
                end,
            });
            if end >= total_samples {
                break;
            }
            start = end.saturating_sub(overlap_samples);
        }
    }

    Ok(ChunkPlan {
        windows,
        sample_rate,
        max_chunk_samples,
        overlap_samples,
    })
}
