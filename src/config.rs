use crate::defaults;
use crate::error::{LongscribeError, Result};
use crate::output::OutputFormat;
use crate::pipeline::reconciler::OverlapPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub chunking: ChunkingConfig,
    pub overlap: OverlapPolicy,
    pub decoder: DecoderConfig,
    pub output: OutputConfig,
}

/// Window sizing for long audio
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkingConfig {
    pub max_chunk_seconds: f64,
    pub overlap_seconds: f64,
}

/// Speech-to-text model configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecoderConfig {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

/// Output rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Include per-segment chunks in JSON output
    pub timestamps: bool,
    pub format: OutputFormat,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_seconds: defaults::MAX_CHUNK_SECONDS,
            overlap_seconds: defaults::CHUNK_OVERLAP_SECONDS,
        }
    }
}

impl ChunkingConfig {
    /// Reject durations that would stall or break the planner.
    pub fn validate(&self) -> Result<()> {
        if !self.max_chunk_seconds.is_finite() || self.max_chunk_seconds <= 0.0 {
            return Err(LongscribeError::invalid_config(
                "max_chunk_seconds",
                format!("must be a positive number, got {}", self.max_chunk_seconds),
            ));
        }
        if !self.overlap_seconds.is_finite() || self.overlap_seconds <= 0.0 {
            return Err(LongscribeError::invalid_config(
                "overlap_seconds",
                format!("must be a positive number, got {}", self.overlap_seconds),
            ));
        }
        if self.overlap_seconds >= self.max_chunk_seconds {
            return Err(LongscribeError::invalid_config(
                "overlap_seconds",
                format!(
                    "must be smaller than max_chunk_seconds ({} >= {})",
                    self.overlap_seconds, self.max_chunk_seconds
                ),
            ));
        }
        Ok(())
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            model_path: None,
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            threads: None,
        }
    }
}

impl DecoderConfig {
    /// Model file to load: the explicit path, or `models/ggml-<model>.bin`.
    pub fn resolved_model_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("models/ggml-{}.bin", self.model)))
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            timestamps: false,
            format: OutputFormat::Json,
        }
    }
}

/// Parse a float override, keeping the current value when it doesn't parse.
fn env_f64(name: &str, current: f64) -> f64 {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    "Invalid value for {}: {:?}, keeping {}",
                    name,
                    raw,
                    current
                );
                current
            }
        },
        _ => current,
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LongscribeError::ConfigFileNotFound {
                    path: path.display().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults only if the file is missing.
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(LongscribeError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - LONGSCRIBE_MAX_CHUNK_SECONDS → chunking.max_chunk_seconds
    /// - LONGSCRIBE_CHUNK_OVERLAP_SECONDS → chunking.overlap_seconds
    /// - LONGSCRIBE_MODEL → decoder.model
    /// - LONGSCRIBE_MODEL_PATH → decoder.model_path
    /// - LONGSCRIBE_LANGUAGE → decoder.language
    pub fn with_env_overrides(mut self) -> Self {
        self.chunking.max_chunk_seconds =
            env_f64("LONGSCRIBE_MAX_CHUNK_SECONDS", self.chunking.max_chunk_seconds);
        self.chunking.overlap_seconds =
            env_f64("LONGSCRIBE_CHUNK_OVERLAP_SECONDS", self.chunking.overlap_seconds);

        if let Ok(model) = std::env::var("LONGSCRIBE_MODEL")
            && !model.is_empty()
        {
            self.decoder.model = model;
        }

        if let Ok(path) = std::env::var("LONGSCRIBE_MODEL_PATH")
            && !path.is_empty()
        {
            self.decoder.model_path = Some(PathBuf::from(path));
        }

        if let Ok(language) = std::env::var("LONGSCRIBE_LANGUAGE")
            && !language.is_empty()
        {
            self.decoder.language = language;
        }

        self
    }

    /// Check every section that can make a run fail before decoding starts.
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.overlap.validate()
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/longscribe/config.toml on Linux
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("longscribe").join("config.toml"))
            .ok_or_else(|| LongscribeError::Other("Could not determine config directory".into()))
    }
}
