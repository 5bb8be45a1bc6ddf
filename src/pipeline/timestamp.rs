//! SRT timestamp formatting and millisecond rounding.
//!
//! Times stay full-precision `f64` seconds inside the pipeline; rounding to
//! milliseconds happens only here, when values are rendered or serialized.

use crate::error::{LongscribeError, Result};
use serde::Serializer;

const RANGE_SEPARATOR: &str = " --> ";

/// Round seconds to 3 decimal places.
pub fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

fn to_millis(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0).round() as u64
}

/// Render seconds as `HH:MM:SS,mmm`.
///
/// Negative and non-finite inputs render as zero. Hours are not wrapped.
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total_ms = to_millis(seconds);
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Render a segment range as `HH:MM:SS,mmm --> HH:MM:SS,mmm`.
pub fn format_srt_range(start: f64, end: f64) -> String {
    format!(
        "{}{}{}",
        format_srt_timestamp(start),
        RANGE_SEPARATOR,
        format_srt_timestamp(end)
    )
}

fn invalid_timestamp(raw: &str) -> LongscribeError {
    LongscribeError::Other(format!("Invalid SRT timestamp: {:?}", raw))
}

/// Parse `HH:MM:SS,mmm` back into seconds.
pub fn parse_srt_timestamp(raw: &str) -> Result<f64> {
    let raw = raw.trim();
    let (clock, millis) = raw.split_once(',').ok_or_else(|| invalid_timestamp(raw))?;
    let mut parts = clock.split(':');
    let (Some(h), Some(m), Some(s), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid_timestamp(raw));
    };

    let field = |value: &str| value.parse::<u64>().map_err(|_| invalid_timestamp(raw));
    let (hours, minutes, secs, millis) = (field(h)?, field(m)?, field(s)?, field(millis)?);
    if minutes >= 60 || secs >= 60 || millis >= 1000 || millis_digits(raw) != 3 {
        return Err(invalid_timestamp(raw));
    }

    let total_ms = ((hours * 60 + minutes) * 60 + secs) * 1000 + millis;
    Ok(total_ms as f64 / 1000.0)
}

fn millis_digits(raw: &str) -> usize {
    raw.rsplit_once(',').map(|(_, ms)| ms.len()).unwrap_or(0)
}

/// Parse `HH:MM:SS,mmm --> HH:MM:SS,mmm` into `(start, end)` seconds.
pub fn parse_srt_range(raw: &str) -> Result<(f64, f64)> {
    let (start, end) = raw
        .split_once(RANGE_SEPARATOR.trim())
        .ok_or_else(|| invalid_timestamp(raw))?;
    Ok((parse_srt_timestamp(start)?, parse_srt_timestamp(end)?))
}

/// serde `serialize_with` helper: seconds rounded to milliseconds.
pub fn serialize_millis<S: Serializer>(
    seconds: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_millis(*seconds))
}

/// serde `serialize_with` helper for `[start, end]` pairs.
pub fn serialize_millis_pair<S: Serializer>(
    pair: &[f64; 2],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    use serde::ser::SerializeTuple;
    let mut tuple = serializer.serialize_tuple(2)?;
    tuple.serialize_element(&round_millis(pair[0]))?;
    tuple.serialize_element(&round_millis(pair[1]))?;
    tuple.end()
}
