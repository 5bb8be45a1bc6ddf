//! Command-line interface for longscribe
//!
//! Provides argument parsing using clap derive macros.

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Transcribe long recordings in overlapping windows
#[derive(Parser, Debug)]
#[command(
    name = "longscribe",
    version,
    about = "Transcribe long recordings in overlapping windows"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe a 16kHz mono 16-bit WAV file ("-" reads stdin)
    Transcribe(TranscribeArgs),

    /// Print engine and chunking settings as JSON
    Info,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `longscribe transcribe`
#[derive(clap::Args, Debug, Clone)]
pub struct TranscribeArgs {
    /// Input WAV file, or "-" for stdin
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Include per-segment timestamps in JSON output
    #[arg(long)]
    pub timestamps: bool,

    /// Output format (default: from config, json)
    #[arg(long, short = 'f', value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Longest window sent to the decoder, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub max_chunk_seconds: Option<f64>,

    /// Audio shared by consecutive windows, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub overlap_seconds: Option<f64>,

    /// Path to the Whisper ggml model file
    #[arg(long, value_name = "PATH")]
    pub model_path: Option<PathBuf>,

    /// Language code for transcription. Examples: auto, en, de
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Give up after this long. Examples: 90s, 5m, 1h30m
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Write output to a file instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Configuration inspection actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the default configuration file path
    Path,
}

/// Parse a timeout string.
///
/// Bare numbers are seconds; anything else goes through `humantime`
/// (`30s`, `5m`, `1h30m`).
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}
