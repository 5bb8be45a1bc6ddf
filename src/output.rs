//! Rendering transcripts for callers: JSON response, plain text, SRT.

use crate::config::Config;
use crate::defaults;
use crate::error::Result;
use crate::pipeline::assembler::{Segment, Transcript};
use crate::pipeline::timestamp::serialize_millis;
use serde::{Deserialize, Serialize};

/// Output formats supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON response document
    #[default]
    Json,
    /// Joined transcript text only
    Text,
    /// SubRip subtitle file
    Srt,
}

/// Response document handed to an API layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: f64,
    pub total_segments: usize,
    /// Present only when timestamps were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<Segment>>,
}

impl TranscriptionResponse {
    pub fn from_transcript(transcript: &Transcript, include_chunks: bool) -> Self {
        Self {
            text: transcript.text.clone(),
            duration: transcript.duration,
            total_segments: transcript.total_segments,
            chunks: include_chunks.then(|| transcript.segments.clone()),
        }
    }
}

/// Static description of the engine, for health checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineInfo {
    pub ok: bool,
    pub engine: String,
    pub variant: String,
    pub backend: String,
    pub max_chunk_seconds: f64,
    pub chunk_overlap_seconds: f64,
    pub supports_long_audio: bool,
    pub version: String,
}

impl EngineInfo {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ok: true,
            engine: defaults::ENGINE_NAME.to_string(),
            variant: config.decoder.model.clone(),
            backend: defaults::gpu_backend().to_string(),
            max_chunk_seconds: config.chunking.max_chunk_seconds,
            chunk_overlap_seconds: config.chunking.overlap_seconds,
            supports_long_audio: true,
            version: crate::version_string(),
        }
    }
}

/// Render a transcript as a SubRip document.
pub fn render_srt(transcript: &Transcript) -> String {
    let mut out = String::new();
    for segment in &transcript.segments {
        out.push_str(&format!(
            "{}\n{}\n{}\n\n",
            segment.index, segment.srt_timestamp, segment.text
        ));
    }
    out
}

/// Render a transcript in the requested format.
pub fn render(transcript: &Transcript, format: OutputFormat, timestamps: bool) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let response = TranscriptionResponse::from_transcript(transcript, timestamps);
            Ok(serde_json::to_string_pretty(&response)?)
        }
        OutputFormat::Text => Ok(transcript.text.clone()),
        OutputFormat::Srt => Ok(render_srt(transcript)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::assembler::SegmentAssembler;
    use crate::pipeline::timestamp::parse_srt_range;
    use serde_json::json;

    fn sample_transcript() -> Transcript {
        let mut assembler = SegmentAssembler::new();
        assembler.push("hello world", 0.0, 29.0);
        assembler.push("away into the forest", 40.083333333, 57.0);
        assembler.finish(60.0004)
    }

    #[test]
    fn response_without_timestamps_omits_chunks() {
        let response = TranscriptionResponse::from_transcript(&sample_transcript(), false);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({
                "text": "hello world away into the forest",
                "duration": 60.0,
                "total_segments": 2
            })
        );
    }

    #[test]
    fn response_with_timestamps_includes_rounded_chunks() {
        let response = TranscriptionResponse::from_transcript(&sample_transcript(), true);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["chunks"][1]["index"], 2);
        assert_eq!(value["chunks"][1]["start_time"], 40.083);
        assert_eq!(value["chunks"][1]["timestamp"], json!([40.083, 57.0]));
        assert_eq!(
            value["chunks"][1]["srt_timestamp"],
            "00:00:40,083 --> 00:00:57,000"
        );
    }

    #[test]
    fn empty_transcript_response() {
        let response = TranscriptionResponse::from_transcript(&Transcript::empty(12.0), true);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["text"], "");
        assert_eq!(value["total_segments"], 0);
        assert_eq!(value["chunks"], json!([]));
    }

    #[test]
    fn srt_document_has_numbered_blocks() {
        let srt = render_srt(&sample_transcript());
        let blocks: Vec<&str> = srt.trim_end().split("\n\n").collect();
        assert_eq!(blocks.len(), 2);

        let lines: Vec<&str> = blocks[1].lines().collect();
        assert_eq!(lines[0], "2");
        let (start, end) = parse_srt_range(lines[1]).unwrap();
        assert_eq!((start, end), (40.083, 57.0));
        assert_eq!(lines[2], "away into the forest");
    }

    #[test]
    fn render_text_format() {
        let text = render(&sample_transcript(), OutputFormat::Text, false).unwrap();
        assert_eq!(text, "hello world away into the forest");
    }

    #[test]
    fn render_json_format_is_parseable() {
        let rendered = render(&sample_transcript(), OutputFormat::Json, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["total_segments"], 2);
        assert!(value["chunks"].is_array());
    }

    #[test]
    fn engine_info_reflects_config() {
        let info = EngineInfo::from_config(&Config::default());
        assert!(info.ok);
        assert!(info.supports_long_audio);
        assert_eq!(info.variant, "tiny.en");
        assert_eq!(info.max_chunk_seconds, 29.0);
        assert_eq!(info.chunk_overlap_seconds, 1.0);
    }

    #[test]
    fn output_format_parses_from_toml_names() {
        #[derive(Deserialize)]
        struct Holder {
            format: OutputFormat,
        }
        let holder: Holder = toml::from_str("format = \"srt\"").unwrap();
        assert_eq!(holder.format, OutputFormat::Srt);
    }
}
