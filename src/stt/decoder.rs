use crate::error::{LongscribeError, Result};
use std::collections::HashSet;
use std::sync::Mutex;

/// Speech-to-text for a single audio window.
///
/// Implementations see one window at a time and return only its text; no
/// timing comes back. Loaded model state is built once and shared read-only,
/// so `decode` takes `&self`.
pub trait ChunkDecoder: Send + Sync {
    /// Decode mono f32 samples at `sample_rate` into text.
    ///
    /// An empty string means the window held no speech.
    fn decode(&self, window: &[f32], sample_rate: u32) -> Result<String>;

    /// Name of the model behind this decoder.
    fn model_name(&self) -> &str {
        "custom"
    }
}

/// Any plain function or closure with the decode signature is a decoder.
impl<F> ChunkDecoder for F
where
    F: Fn(&[f32], u32) -> Result<String> + Send + Sync,
{
    fn decode(&self, window: &[f32], sample_rate: u32) -> Result<String> {
        self(window, sample_rate)
    }
}

/// Deterministic decoder for tests: returns scripted text per call.
///
/// Call `n` (0-based) returns `responses[n]`, or an empty string once the
/// script runs out. Calls listed in `failures` return a decode error instead.
#[derive(Debug)]
pub struct ScriptedDecoder {
    model_name: String,
    responses: Vec<String>,
    failures: HashSet<usize>,
    calls: Mutex<Vec<usize>>,
}

impl ScriptedDecoder {
    /// Create a scripted decoder with one response per expected window.
    pub fn new<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        Self {
            model_name: "scripted".to_string(),
            responses: responses.into_iter().map(Into::into).collect(),
            failures: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make the given call (0-based) fail with a decode error.
    pub fn with_failure_at(mut self, call: usize) -> Self {
        self.failures.insert(call);
        self
    }

    /// Override the reported model name.
    pub fn with_model_name(mut self, name: &str) -> Self {
        self.model_name = name.to_string();
        self
    }

    /// Number of decode calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Length in samples of each window decoded so far, in call order.
    pub fn window_lengths(&self) -> Vec<usize> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ChunkDecoder for ScriptedDecoder {
    fn decode(&self, window: &[f32], _sample_rate: u32) -> Result<String> {
        let call = {
            let mut calls = self.calls.lock().map_err(|e| LongscribeError::Decode {
                message: format!("scripted decoder lock poisoned: {}", e),
            })?;
            calls.push(window.len());
            calls.len() - 1
        };

        if self.failures.contains(&call) {
            return Err(LongscribeError::Decode {
                message: format!("scripted failure on call {}", call),
            });
        }

        Ok(self.responses.get(call).cloned().unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn scripted_decoder_returns_responses_in_order() {
        let decoder = ScriptedDecoder::new(["first", "second"]);
        let window = vec![0.0f32; 100];

        assert_eq!(decoder.decode(&window, 16000).unwrap(), "first");
        assert_eq!(decoder.decode(&window, 16000).unwrap(), "second");
        assert_eq!(decoder.decode(&window, 16000).unwrap(), "");
        assert_eq!(decoder.call_count(), 3);
    }

    #[test]
    fn scripted_decoder_injects_failures() {
        let decoder = ScriptedDecoder::new(["a", "b", "c"]).with_failure_at(1);
        let window = vec![0.0f32; 10];

        assert!(decoder.decode(&window, 16000).is_ok());
        match decoder.decode(&window, 16000) {
            Err(LongscribeError::Decode { message }) => {
                assert_eq!(message, "scripted failure on call 1")
            }
            other => panic!("Expected Decode error, got {other:?}"),
        }
        assert_eq!(decoder.decode(&window, 16000).unwrap(), "c");
    }

    #[test]
    fn scripted_decoder_records_window_lengths() {
        let decoder = ScriptedDecoder::new(Vec::<String>::new());
        decoder.decode(&[0.0; 5], 16000).unwrap();
        decoder.decode(&[0.0; 3], 16000).unwrap();
        assert_eq!(decoder.window_lengths(), vec![5, 3]);
    }

    #[test]
    fn closures_are_decoders() {
        let decoder = |window: &[f32], rate: u32| -> Result<String> {
            Ok(format!("{} samples at {}", window.len(), rate))
        };
        assert_eq!(
            decoder.decode(&[0.0; 4], 16000).unwrap(),
            "4 samples at 16000"
        );
        assert_eq!(ChunkDecoder::model_name(&decoder), "custom");
    }

    #[test]
    fn decoder_trait_is_object_safe() {
        let decoder: Box<dyn ChunkDecoder> =
            Box::new(ScriptedDecoder::new(["boxed"]).with_model_name("tiny.en"));
        assert_eq!(decoder.model_name(), "tiny.en");
        assert_eq!(decoder.decode(&[], 16000).unwrap(), "boxed");
    }

    #[test]
    fn shared_decoder_is_usable_through_arc() {
        let decoder = Arc::new(ScriptedDecoder::new(["shared"]));
        let handle = Arc::clone(&decoder);
        assert_eq!(handle.decode(&[0.0], 16000).unwrap(), "shared");
        assert_eq!(decoder.call_count(), 1);
    }
}
