//! Default configuration constants for longscribe.
//!
//! Shared by the config file layer, the CLI and the pipeline so that every
//! entry point starts from the same policy values.

/// Sample rate the decoder expects, in Hz.
///
/// Input audio is normalized to 16kHz mono before it reaches the pipeline.
pub const SAMPLE_RATE: u32 = 16000;

/// Longest window handed to the decoder in one call, in seconds.
///
/// Whisper-family models see at most 30s of audio per pass; 29s leaves
/// headroom for padding.
pub const MAX_CHUNK_SECONDS: f64 = 29.0;

/// Audio shared by two consecutive windows, in seconds.
///
/// Words straddling a window boundary appear in both windows and are
/// removed again by the overlap reconciler.
pub const CHUNK_OVERLAP_SECONDS: f64 = 1.0;

/// Previous segments at or below this many characters are not used as an
/// overlap signal.
pub const OVERLAP_MIN_PREV_CHARS: usize = 50;

/// Number of tokens compared on each side of a window seam.
pub const OVERLAP_BOUNDARY_TOKENS: usize = 10;

/// Shared boundary tokens needed before a seam counts as duplicated
/// (strictly more than this value).
pub const OVERLAP_MIN_SHARED_TOKENS: usize = 3;

/// Leading tokens dropped from a window once a duplicate seam is detected.
pub const OVERLAP_DROP_TOKENS: usize = 5;

/// Default Whisper model name.
pub const DEFAULT_MODEL: &str = "tiny.en";

/// Default language code for transcription.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Language value that triggers automatic language detection.
pub const AUTO_LANGUAGE: &str = "auto";

/// Engine identifier reported by `longscribe info`.
pub const ENGINE_NAME: &str = "whisper.cpp";

/// Report the GPU backend compiled into this build.
///
/// Returns a human-readable name based on the compile-time feature flags.
/// If no GPU backend is enabled, returns "CPU".
pub fn gpu_backend() -> &'static str {
    if cfg!(feature = "cuda") {
        "CUDA"
    } else if cfg!(feature = "vulkan") {
        "Vulkan"
    } else if cfg!(feature = "hipblas") {
        "HipBLAS (AMD)"
    } else if cfg!(feature = "openblas") {
        "OpenBLAS"
    } else {
        "CPU"
    }
}
