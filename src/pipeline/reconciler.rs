//! Removes text duplicated across overlapping windows.
//!
//! Consecutive windows share `overlap_seconds` of audio and are decoded
//! independently, so the words spoken in the shared span tend to show up at
//! the end of one segment and again at the start of the next. Without word
//! timings the only signal is textual: compare the tokens on both sides of
//! the seam and, when enough of them match, drop a fixed-size prefix from the
//! newer window and move its start time forward in proportion.

use crate::defaults;
use crate::error::{LongscribeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Thresholds for seam deduplication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OverlapPolicy {
    /// Previous segments with at most this many characters are ignored.
    pub min_prev_chars: usize,
    /// Tokens compared on each side of the seam. A window must also have
    /// more than this many tokens before anything is dropped from it.
    pub boundary_tokens: usize,
    /// Shared boundary tokens must exceed this count to trigger a trim.
    pub min_shared_tokens: usize,
    /// Leading tokens removed from the newer window on a trim.
    pub drop_tokens: usize,
}

impl Default for OverlapPolicy {
    fn default() -> Self {
        Self {
            min_prev_chars: defaults::OVERLAP_MIN_PREV_CHARS,
            boundary_tokens: defaults::OVERLAP_BOUNDARY_TOKENS,
            min_shared_tokens: defaults::OVERLAP_MIN_SHARED_TOKENS,
            drop_tokens: defaults::OVERLAP_DROP_TOKENS,
        }
    }
}

/// Outcome of reconciling one window against the previous segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// Window text after trimming; empty when the window was fully absorbed.
    pub text: String,
    /// Effective start of the window in seconds, never before the planned start.
    pub start_time: f64,
    /// Number of leading tokens removed.
    pub trimmed_tokens: usize,
}

impl Reconciled {
    fn unchanged(text: &str, start_time: f64) -> Self {
        Self {
            text: text.to_string(),
            start_time,
            trimmed_tokens: 0,
        }
    }

    pub fn was_trimmed(&self) -> bool {
        self.trimmed_tokens > 0
    }
}

impl OverlapPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.boundary_tokens == 0 {
            return Err(LongscribeError::invalid_config(
                "boundary_tokens",
                "must be at least 1",
            ));
        }
        if self.drop_tokens == 0 || self.drop_tokens > self.boundary_tokens {
            return Err(LongscribeError::invalid_config(
                "drop_tokens",
                format!(
                    "must be between 1 and boundary_tokens ({}), got {}",
                    self.boundary_tokens, self.drop_tokens
                ),
            ));
        }
        Ok(())
    }

    /// Distinct tokens shared by the tail of `prev_text` and the head of `curr_text`.
    pub fn shared_boundary_tokens(&self, prev_text: &str, curr_text: &str) -> usize {
        let prev: Vec<&str> = prev_text.split_whitespace().collect();
        let tail: HashSet<&str> = prev[prev.len().saturating_sub(self.boundary_tokens)..]
            .iter()
            .copied()
            .collect();
        let head: HashSet<&str> = curr_text
            .split_whitespace()
            .take(self.boundary_tokens)
            .collect();
        tail.intersection(&head).count()
    }

    /// Reconcile a freshly decoded window against the last accepted segment.
    ///
    /// `window_start_s` and `window_end_s` are the planned (untrimmed) window
    /// bounds. Only a prefix of `curr_text` is ever removed and the start time
    /// only ever moves forward.
    pub fn reconcile(
        &self,
        prev_text: &str,
        curr_text: &str,
        window_start_s: f64,
        window_end_s: f64,
    ) -> Reconciled {
        if prev_text.is_empty() || prev_text.chars().count() <= self.min_prev_chars {
            return Reconciled::unchanged(curr_text, window_start_s);
        }

        let shared = self.shared_boundary_tokens(prev_text, curr_text);
        if shared <= self.min_shared_tokens {
            return Reconciled::unchanged(curr_text, window_start_s);
        }

        let tokens: Vec<&str> = curr_text.split_whitespace().collect();
        if tokens.len() <= self.boundary_tokens {
            return Reconciled::unchanged(curr_text, window_start_s);
        }

        let drop = self.drop_tokens.min(tokens.len());
        let span = (window_end_s - window_start_s).max(0.0);
        let advance = drop as f64 * span / tokens.len() as f64;

        tracing::debug!(
            shared,
            dropped = drop,
            advance_s = advance,
            "trimmed duplicated window prefix"
        );

        Reconciled {
            text: tokens[drop..].join(" "),
            start_time: window_start_s + advance,
            trimmed_tokens: drop,
        }
    }
}
