//! In-memory mono PCM buffer handed to the transcription pipeline.

use std::ops::Range;

/// Mono f32 samples in [-1.0, 1.0] at a fixed sample rate.
///
/// Owned by exactly one transcription run and never mutated after
/// construction; windows are borrowed as slices.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Build a waveform from 16-bit PCM, scaling by 1/32768.
    pub fn from_i16(samples: &[i16], sample_rate: u32) -> Self {
        Self::new(
            samples.iter().map(|&s| f32::from(s) / 32768.0).collect(),
            sample_rate,
        )
    }

    /// A zero-filled waveform of the given length in seconds.
    pub fn silence(seconds: f64, sample_rate: u32) -> Self {
        let len = (seconds * f64::from(sample_rate)) as usize;
        Self::new(vec![0.0; len], sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (`len / sample_rate`); zero for an empty buffer.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Borrow a sample range, clamped to the buffer.
    pub fn window(&self, range: Range<usize>) -> &[f32] {
        let end = range.end.min(self.samples.len());
        let start = range.start.min(end);
        &self.samples[start..end]
    }
}
