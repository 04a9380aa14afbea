//! Human-friendly interval strings ("1h", "30m", "60s", "60").

use super::MAX_HEARTBEAT_INTERVAL_SECS;
use crate::error::{AgnoError, Result};

/// Parse interval string like "1h", "30m", "15m", "60s" into seconds.
///
/// A bare number is taken as seconds. Zero is rejected since a heartbeat
/// that never sleeps would spin the runtime; anything above one year is
/// rejected too.
pub fn parse_interval(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();
    let (digits, scale, unit) = if let Some(hours) = s.strip_suffix('h') {
        (hours, 3600, "hours")
    } else if let Some(mins) = s.strip_suffix('m') {
        (mins, 60, "minutes")
    } else if let Some(secs) = s.strip_suffix('s') {
        (secs, 1, "seconds")
    } else {
        (s.as_str(), 1, "seconds")
    };

    let n: u64 = digits.trim().parse().map_err(|_| {
        AgnoError::Config(format!(
            "Invalid {} value in interval '{}'. Use formats like 1h, 30m, or 60s",
            unit, s
        ))
    })?;

    let secs = n
        .checked_mul(scale)
        .ok_or_else(|| AgnoError::Config(format!("Interval '{}' is too large", s)))?;
    if secs == 0 {
        return Err(AgnoError::Config(
            "Heartbeat interval must be greater than zero".to_string(),
        ));
    }
    if secs > MAX_HEARTBEAT_INTERVAL_SECS {
        return Err(AgnoError::Config(format!(
            "Heartbeat interval '{}' exceeds the maximum of {}s",
            s, MAX_HEARTBEAT_INTERVAL_SECS
        )));
    }
    Ok(secs)
}
