//! Duration parsing utilities.

use anyhow::Context;
use std::time::Duration;

/// Parse a publish delay like "0.1", "250ms", "2s" or "1m".
///
/// Plain numbers are seconds and may be fractional. Negative values are
/// rejected.
pub fn parse_delay(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("Empty duration string");
    }

    // "ms" must be checked before "m" and "s"
    if let Some(num_str) = s.strip_suffix("ms") {
        let millis: u64 = num_str
            .trim()
            .parse()
            .with_context(|| format!("Invalid milliseconds value: {num_str}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(num_str) = s.strip_suffix('m') {
        return secs_value(num_str, 60.0).with_context(|| format!("Invalid minutes value: {num_str}"));
    }
    if let Some(num_str) = s.strip_suffix('s') {
        return secs_value(num_str, 1.0).with_context(|| format!("Invalid seconds value: {num_str}"));
    }

    // No suffix - treat as seconds
    secs_value(s, 1.0).with_context(|| format!("Invalid duration value: {s}"))
}

fn secs_value(num_str: &str, scale: f64) -> anyhow::Result<Duration> {
    let value: f64 = num_str.trim().parse()?;
    Ok(Duration::try_from_secs_f64(value * scale)?)
}
