/*!
 * Subtitle time codes.
 *
 * Seconds are encoded as `H:MM:SS.cc`: hours unpadded, minutes and seconds two
 * digits, centiseconds two digits, truncated rather than rounded. Decoding an
 * encoded value lands within one centisecond of the original.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TimecodeError;

static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})\.(\d{2})$").unwrap()
});

/// Absorbs binary representation error, e.g. 0.29 * 100 = 28.999999999999996
const CENTISECOND_EPSILON: f64 = 1e-6;

/// Truncate seconds to whole centiseconds; negative and non-finite input become zero
fn to_centiseconds(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 100.0 + CENTISECOND_EPSILON).floor() as u64
}

/// Encode seconds as `H:MM:SS.cc`
pub fn format_timecode(seconds: f64) -> String {
    let total = to_centiseconds(seconds);
    let hours = total / 360_000;
    let minutes = (total % 360_000) / 6_000;
    let secs = (total % 6_000) / 100;
    let centis = total % 100;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centis)
}

/// Decode `H:MM:SS.cc` into seconds
pub fn parse_timecode(timecode: &str) -> Result<f64, TimecodeError> {
    let caps = TIMECODE_REGEX
        .captures(timecode.trim())
        .ok_or_else(|| TimecodeError::InvalidFormat(timecode.to_string()))?;

    let component = |i: usize| -> Result<u64, TimecodeError> {
        caps[i]
            .parse()
            .map_err(|_| TimecodeError::InvalidFormat(timecode.to_string()))
    };

    let hours = component(1)?;
    let minutes = component(2)?;
    let seconds = component(3)?;
    let centis = component(4)?;

    if minutes >= 60 {
        return Err(TimecodeError::ComponentOutOfRange {
            component: "minutes",
            value: minutes,
        });
    }
    if seconds >= 60 {
        return Err(TimecodeError::ComponentOutOfRange {
            component: "seconds",
            value: seconds,
        });
    }

    let total = hours * 360_000 + minutes * 6_000 + seconds * 100 + centis;
    Ok(total as f64 / 100.0)
}
