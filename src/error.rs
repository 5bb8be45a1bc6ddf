//! Error types for longscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LongscribeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Waveform acquisition errors
    #[error("Audio format mismatch: expected {expected}, got {actual}")]
    AudioFormatMismatch { expected: String, actual: String },

    #[error("Failed to read audio: {message}")]
    AudioRead { message: String },

    // Decoder errors
    #[error("Transcription model not found at {path}")]
    TranscriptionModelNotFound { path: String },

    #[error("Transcription inference failed: {message}")]
    TranscriptionInferenceFailed { message: String },

    #[error("Decode failed: {message}")]
    Decode { message: String },

    // Run control
    #[error("Transcription cancelled after {completed} of {total} windows")]
    Cancelled { completed: usize, total: usize },

    #[error("Transcription deadline exceeded after {completed} of {total} windows")]
    DeadlineExceeded { completed: usize, total: usize },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl LongscribeError {
    /// Shorthand for a configuration validation failure.
    pub fn invalid_config(key: &str, message: impl Into<String>) -> Self {
        Self::ConfigInvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// True for errors raised because the caller stopped the run.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::DeadlineExceeded { .. })
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, LongscribeError>;
