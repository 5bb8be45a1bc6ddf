//! Composition root: wires config, audio, decoder and pipeline for the CLI.

use crate::audio::{Waveform, read_wav_file, read_wav_stdin};
use crate::cli::{ConfigAction, TranscribeArgs};
use crate::config::Config;
use crate::output::{EngineInfo, render};
use crate::pipeline::{
    CancellationFlag, PipelineConfig, TranscriptionPipeline, transcribe_blocking_task,
};
use crate::stt::whisper::{WhisperConfig, WhisperDecoder};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `-q` logs errors only, no flag logs
/// warnings, `-v` info and `-vv` debug.
pub fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("longscribe={level}")));

    // A subscriber may already be installed (tests, embedding); keep it.
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Load the config file (explicit path or default location) plus env overrides.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => match Config::default_path() {
            Ok(default_path) => Config::load_or_default(&default_path).with_context(|| {
                format!("Failed to load config from {}", default_path.display())
            })?,
            Err(_) => Config::default(),
        },
    };
    Ok(config.with_env_overrides())
}

/// Fold CLI flags into the loaded configuration.
pub fn apply_transcribe_overrides(mut config: Config, args: &TranscribeArgs) -> Config {
    if let Some(max) = args.max_chunk_seconds {
        config.chunking.max_chunk_seconds = max;
    }
    if let Some(overlap) = args.overlap_seconds {
        config.chunking.overlap_seconds = overlap;
    }
    if let Some(path) = &args.model_path {
        config.decoder.model_path = Some(path.clone());
    }
    if let Some(language) = &args.language {
        config.decoder.language = language.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.timestamps {
        config.output.timestamps = true;
    }
    config
}

fn read_input(input: &Path) -> Result<Waveform> {
    let waveform = if input == Path::new("-") {
        read_wav_stdin().context("Failed to read WAV from stdin")?
    } else {
        read_wav_file(input)?
    };
    Ok(waveform)
}

/// Run `longscribe transcribe`.
pub async fn run_transcribe_command(config: Config, args: TranscribeArgs) -> Result<()> {
    let config = apply_transcribe_overrides(config, &args);
    config.validate()?;

    let waveform = read_input(&args.input)?;
    tracing::info!(
        samples = waveform.len(),
        duration_s = waveform.duration_secs(),
        "loaded {}",
        args.input.display()
    );

    let decoder = Arc::new(WhisperDecoder::new(WhisperConfig {
        model_path: config.decoder.resolved_model_path(),
        language: config.decoder.language.clone(),
        threads: config.decoder.threads,
    })?);

    let cancel = CancellationFlag::new();
    let mut pipeline = TranscriptionPipeline::new(PipelineConfig::from(&config))?
        .with_cancellation(cancel.clone());
    if let Some(timeout) = args.timeout {
        pipeline = pipeline.with_timeout(timeout);
    }

    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after the current window");
            cancel.cancel();
        }
    });

    let result = transcribe_blocking_task(pipeline, waveform, decoder).await;
    watcher.abort();
    let transcript = result?;

    let rendered = render(&transcript, config.output.format, config.output.timestamps)?;
    match &args.output {
        Some(path) => std::fs::write(path, rendered + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Run `longscribe info`.
pub fn run_info_command(config: &Config) -> Result<()> {
    let info = EngineInfo::from_config(config);
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

/// Run `longscribe config <action>`.
pub fn run_config_command(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::default_path()?.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use std::path::PathBuf;

    fn args(input: &str) -> TranscribeArgs {
        TranscribeArgs {
            input: PathBuf::from(input),
            timestamps: false,
            format: None,
            max_chunk_seconds: None,
            overlap_seconds: None,
            model_path: None,
            language: None,
            timeout: None,
            output: None,
        }
    }

    #[test]
    fn overrides_only_touch_given_flags() {
        let config = apply_transcribe_overrides(Config::default(), &args("in.wav"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut a = args("in.wav");
        a.max_chunk_seconds = Some(10.0);
        a.overlap_seconds = Some(2.0);
        a.model_path = Some(PathBuf::from("/m/ggml-small.bin"));
        a.language = Some("auto".to_string());
        a.format = Some(OutputFormat::Text);
        a.timestamps = true;

        let config = apply_transcribe_overrides(Config::default(), &a);

        assert_eq!(config.chunking.max_chunk_seconds, 10.0);
        assert_eq!(config.chunking.overlap_seconds, 2.0);
        assert_eq!(
            config.decoder.resolved_model_path(),
            PathBuf::from("/m/ggml-small.bin")
        );
        assert_eq!(config.decoder.language, "auto");
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.output.timestamps);
    }

    #[test]
    fn load_config_with_missing_explicit_path_fails() {
        assert!(load_config(Some(Path::new("/nonexistent/longscribe.toml"))).is_err());
    }

    #[tokio::test]
    async fn transcribe_rejects_bad_chunking_before_reading_audio() {
        let mut a = args("/nonexistent/input.wav");
        a.max_chunk_seconds = Some(1.0);
        a.overlap_seconds = Some(1.0);

        let err = run_transcribe_command(Config::default(), a).await.unwrap_err();
        assert!(err.to_string().contains("overlap_seconds"));
    }
}
