use std::time::Duration;

use pulse_core::DelayUnit;

/// Parse a duration like "5s", "500ms", "1.5m" or "2 minutes".
///
/// The unit names are the ones retry delays accept. A bare number is read
/// as seconds. Negative, non-finite and out-of-range values are rejected.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let split = s.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(s.len());
    let (value, unit) = s.split_at(split);

    let value: f64 = value.trim_end().parse().ok()?;
    let unit = if unit.is_empty() {
        DelayUnit::Seconds
    } else {
        DelayUnit::parse(unit)?
    };

    let nanos = value * unit.nanos_per_unit();
    if !nanos.is_finite() || nanos < 0.0 || nanos >= u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(nanos.round() as u64))
}
