//! Waveform acquisition: normalized mono PCM in memory.

pub mod wav;
pub mod waveform;

pub use wav::{read_wav, read_wav_file, read_wav_stdin};
pub use waveform::Waveform;
