//! WAV ingestion for already-normalized audio.
//!
//! Upstream conversion (ffmpeg or similar) is expected to produce 16-bit PCM,
//! mono, 16kHz. Anything else is rejected rather than silently resampled, so
//! a misconfigured converter shows up as an error instead of a bad transcript.

use crate::audio::waveform::Waveform;
use crate::defaults::SAMPLE_RATE;
use crate::error::{LongscribeError, Result};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// Parse WAV data from any reader into a [`Waveform`].
pub fn read_wav<R: Read>(reader: R) -> Result<Waveform> {
    let mut wav_reader = hound::WavReader::new(reader).map_err(|e| LongscribeError::AudioRead {
        message: format!("Failed to parse WAV data: {}", e),
    })?;

    let spec = wav_reader.spec();

    if spec.channels != 1 {
        return Err(LongscribeError::AudioFormatMismatch {
            expected: "mono audio".to_string(),
            actual: format!("{} channels", spec.channels),
        });
    }
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(LongscribeError::AudioFormatMismatch {
            expected: "16-bit PCM".to_string(),
            actual: format!("{}-bit {:?}", spec.bits_per_sample, spec.sample_format),
        });
    }
    if spec.sample_rate != SAMPLE_RATE {
        return Err(LongscribeError::AudioFormatMismatch {
            expected: format!("{} Hz", SAMPLE_RATE),
            actual: format!("{} Hz", spec.sample_rate),
        });
    }

    let pcm: Vec<i16> = wav_reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| LongscribeError::AudioRead {
            message: format!("Failed to read WAV samples: {}", e),
        })?;

    Ok(Waveform::from_i16(&pcm, spec.sample_rate))
}

/// Read a WAV file from disk.
pub fn read_wav_file(path: &Path) -> Result<Waveform> {
    let file = File::open(path).map_err(|e| LongscribeError::AudioRead {
        message: format!("Failed to open {}: {}", path.display(), e),
    })?;
    read_wav(BufReader::new(file))
}

/// Read WAV data from stdin.
pub fn read_wav_stdin() -> Result<Waveform> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut buffer)
        .map_err(|e| LongscribeError::AudioRead {
            message: format!("Failed to read from stdin: {}", e),
        })?;
    read_wav(Cursor::new(buffer))
}
