//! Speech-to-text seam: one audio window in, its text out.

pub mod decoder;
pub mod whisper;

pub use decoder::{ChunkDecoder, ScriptedDecoder};
pub use whisper::{WhisperConfig, WhisperDecoder};
