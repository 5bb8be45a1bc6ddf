use longscribe::audio::read_wav_file;
use longscribe::pipeline::{
    CancellationFlag, PipelineConfig, TranscriptionPipeline, parse_srt_range, plan_chunks,
    transcribe_blocking_task,
};
use longscribe::{
    ChunkDecoder, ChunkingConfig, LongscribeError, OutputFormat, ScriptedDecoder, Waveform,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const RATE: u32 = 16000;

const FIRST: &str = "Yesterday afternoon I watched as the quick brown fox jumps over the lazy dog";
const SECOND: &str = "over the lazy dog runs away into the forest and disappears quickly";
const THIRD: &str = "and disappears quickly behind the old barn near the river bank today";

/// Write `seconds` of a quiet sine tone as 16kHz mono 16-bit PCM.
fn write_fixture(dir: &Path, name: &str, seconds: f64) -> std::path::PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    let total = (seconds * f64::from(RATE)) as usize;
    for i in 0..total {
        let t = i as f64 / f64::from(RATE);
        let sample = (t * 440.0 * std::f64::consts::TAU).sin() * 1000.0;
        writer.write_sample(sample as i16).unwrap();
    }
    writer.finalize().unwrap();
    path
}

fn pipeline() -> TranscriptionPipeline {
    TranscriptionPipeline::new(PipelineConfig::default()).unwrap()
}

#[test]
fn ten_second_file_is_a_single_segment() {
    let dir = TempDir::new().unwrap();
    let wave = read_wav_file(&write_fixture(dir.path(), "short.wav", 10.0)).unwrap();
    let decoder = ScriptedDecoder::new(["a short recording of someone speaking"]);

    let transcript = pipeline().run(&wave, &decoder).unwrap();

    assert_eq!(transcript.total_segments, 1);
    let segment = &transcript.segments[0];
    assert_eq!(segment.index, 1);
    assert_eq!(segment.start_time, 0.0);
    assert_eq!(segment.end_time, 10.0);
    assert_eq!(segment.srt_timestamp, "00:00:00,000 --> 00:00:10,000");
    assert_eq!(transcript.duration, 10.0);
}

#[test]
fn sixty_second_file_is_reconciled_across_three_windows() {
    let dir = TempDir::new().unwrap();
    let wave = read_wav_file(&write_fixture(dir.path(), "long.wav", 60.0)).unwrap();
    let decoder = ScriptedDecoder::new([FIRST, SECOND, THIRD]);

    let transcript = pipeline().run(&wave, &decoder).unwrap();

    assert_eq!(decoder.call_count(), 3);
    assert_eq!(transcript.total_segments, 3);
    assert_eq!(
        transcript.text,
        format!(
            "{} {} {}",
            FIRST, "away into the forest and disappears quickly", THIRD
        )
    );

    let indices: Vec<usize> = transcript.segments.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);

    for pair in transcript.segments.windows(2) {
        assert!(pair[1].start_time >= pair[0].start_time);
    }
    for segment in &transcript.segments {
        assert!(segment.end_time > segment.start_time);
        let (start, end) = parse_srt_range(&segment.srt_timestamp).unwrap();
        assert!((start - segment.start_time).abs() <= 0.0005 + 1e-9);
        assert!((end - segment.end_time).abs() <= 0.0005 + 1e-9);
    }

    // Window 2 is trimmed and starts late. The trimmed segment is too short
    // to compare against, so window 3 keeps its planned start.
    assert!(transcript.segments[1].start_time > 28.0);
    assert_eq!(transcript.segments[1].end_time, 57.0);
    assert_eq!(transcript.segments[2].start_time, 56.0);
    assert_eq!(transcript.segments[2].end_time, 60.0);
}

#[test]
fn silent_recording_gives_empty_transcript() {
    let dir = TempDir::new().unwrap();
    let wave = read_wav_file(&write_fixture(dir.path(), "silence.wav", 60.0)).unwrap();
    let decoder = ScriptedDecoder::new(["", "", ""]);

    let transcript = pipeline().run(&wave, &decoder).unwrap();

    assert_eq!(transcript.text, "");
    assert_eq!(transcript.total_segments, 0);
    assert_eq!(transcript.duration, wave.len() as f64 / f64::from(RATE));
}

#[test]
fn failing_window_does_not_abort_the_run() {
    let wave = Waveform::silence(60.0, RATE);
    let decoder = ScriptedDecoder::new(["first part", "lost", "last part"]).with_failure_at(1);

    let transcript = pipeline().run(&wave, &decoder).unwrap();

    assert_eq!(transcript.text, "first part last part");
    let indices: Vec<usize> = transcript.segments.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![1, 2]);
}

#[test]
fn plan_matches_decoder_calls() {
    let wave = Waveform::silence(95.5, RATE);
    let chunking = ChunkingConfig {
        max_chunk_seconds: 20.0,
        overlap_seconds: 2.0,
    };
    let plan = plan_chunks(wave.len(), RATE, &chunking).unwrap();
    let decoder = ScriptedDecoder::new(Vec::<String>::new());

    let pipeline = TranscriptionPipeline::new(PipelineConfig {
        chunking,
        ..PipelineConfig::default()
    })
    .unwrap();
    pipeline.run(&wave, &decoder).unwrap();

    let expected: Vec<usize> = plan.iter().map(|w| w.len()).collect();
    assert_eq!(decoder.window_lengths(), expected);
}

#[test]
fn overlap_not_shorter_than_window_is_rejected() {
    let err = TranscriptionPipeline::new(PipelineConfig {
        chunking: ChunkingConfig {
            max_chunk_seconds: 5.0,
            overlap_seconds: 6.0,
        },
        ..PipelineConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, LongscribeError::ConfigInvalidValue { .. }));
}

#[test]
fn closure_decoder_sees_sample_rate_and_window() {
    let wave = Waveform::silence(30.0, RATE);
    let decoder = |window: &[f32], rate: u32| -> longscribe::Result<String> {
        Ok(format!("{:.0} seconds", window.len() as f64 / f64::from(rate)))
    };

    let transcript = pipeline().run(&wave, &decoder).unwrap();
    assert_eq!(transcript.text, "29 seconds 2 seconds");
}

#[test]
fn json_response_matches_the_documented_shape() {
    let wave = Waveform::silence(60.0, RATE);
    let decoder = ScriptedDecoder::new([FIRST, SECOND, THIRD]);
    let transcript = pipeline().run(&wave, &decoder).unwrap();

    let rendered = longscribe::output::render(&transcript, OutputFormat::Json, true).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    assert_eq!(value["duration"], 60.0);
    assert_eq!(value["total_segments"], 3);
    let chunk = &value["chunks"][1];
    for key in ["index", "text", "start_time", "end_time", "timestamp", "srt_timestamp"] {
        assert!(chunk.get(key).is_some(), "missing {key}");
    }
    assert_eq!(chunk["start_time"], 40.083);

    let without = longscribe::output::render(&transcript, OutputFormat::Json, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&without).unwrap();
    assert!(value.get("chunks").is_none());
}

#[tokio::test]
async fn concurrent_runs_share_one_decoder() {
    let decoder: Arc<dyn ChunkDecoder> = Arc::new(
        |window: &[f32], _rate: u32| -> longscribe::Result<String> {
            Ok(format!("{} samples", window.len()))
        },
    );

    let a = transcribe_blocking_task(pipeline(), Waveform::silence(5.0, RATE), decoder.clone());
    let b = transcribe_blocking_task(pipeline(), Waveform::silence(7.0, RATE), decoder.clone());
    let (a, b) = tokio::join!(a, b);

    assert_eq!(a.unwrap().text, "80000 samples");
    assert_eq!(b.unwrap().text, "112000 samples");
}

#[tokio::test]
async fn cancelled_task_returns_no_partial_transcript() {
    let cancel = CancellationFlag::new();
    cancel.cancel();
    let decoder = Arc::new(ScriptedDecoder::new(["never"]));

    let result = transcribe_blocking_task(
        pipeline().with_cancellation(cancel),
        Waveform::silence(60.0, RATE),
        decoder.clone(),
    )
    .await;

    assert!(matches!(result, Err(LongscribeError::Cancelled { completed: 0, .. })));
    assert_eq!(decoder.call_count(), 0);
}
