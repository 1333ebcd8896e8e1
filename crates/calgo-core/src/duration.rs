//! Duration strings such as `45m`, `1h20m` or `1h 30m`.
//!
//! Used for the focus time settings on the command line and in the config
//! file. Supported units are `h`, `m` and `s`; fractions are allowed
//! (`1.5h`). A bare `0` is accepted as zero.

use chrono::Duration;
use thiserror::Error;

/// Error type for duration parsing
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DurationParseError {
    #[error("Invalid duration format: {0}")]
    InvalidFormat(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Empty duration string")]
    EmptyString,
}

/// Parse a duration string into a `chrono::Duration`.
pub fn parse_duration(s: &str) -> Result<Duration, DurationParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DurationParseError::EmptyString);
    }
    if s == "0" {
        return Ok(Duration::zero());
    }

    let mut total_secs = 0f64;
    let mut current_number = String::new();

    for ch in s.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            current_number.push(ch);
        } else if ch.is_whitespace() {
            continue;
        } else {
            if current_number.is_empty() {
                return Err(DurationParseError::InvalidFormat(
                    "Expected number before unit".to_string(),
                ));
            }

            let value: f64 = current_number
                .parse()
                .map_err(|_| DurationParseError::InvalidNumber(current_number.clone()))?;

            total_secs += match ch {
                's' => value,
                'm' => value * 60.0,
                'h' => value * 3600.0,
                _ => return Err(DurationParseError::UnknownUnit(ch.to_string())),
            };
            current_number.clear();
        }
    }

    if !current_number.is_empty() {
        return Err(DurationParseError::InvalidFormat(
            "Missing unit after number".to_string(),
        ));
    }

    if !total_secs.is_finite() || total_secs > i32::MAX as f64 {
        return Err(DurationParseError::InvalidNumber(s.to_string()));
    }

    Ok(Duration::seconds(total_secs.round() as i64))
}

/// Render a duration the way it is written in flags, e.g. `1h20m`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds();
    if total == 0 {
        return "0s".to_string();
    }

    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    let mut out = String::from(sign);
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 {
        out.push_str(&format!("{seconds}s"));
    }
    out
}
