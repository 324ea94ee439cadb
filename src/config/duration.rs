// src/config/duration.rs

use std::time::Duration;

/// Parse a duration such as `"250ms"`, `"5s"`, `"1m"` or `"2h"`.
///
/// The unit is required and case-insensitive. Values too large to represent
/// are rejected instead of wrapping.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let text = input.trim();
    if text.is_empty() {
        return Err("empty duration".to_string());
    }

    let split = text
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("'{text}' needs a unit (ms, s, m or h)"))?;
    let (digits, unit) = text.split_at(split);

    if digits.is_empty() {
        return Err(format!("'{text}' does not start with a number"));
    }
    let value: u64 = digits
        .parse()
        .map_err(|_| format!("'{digits}' is too large"))?;

    let millis_per_unit: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        other => return Err(format!("unknown unit '{other}' in '{text}'; use ms, s, m or h")),
    };

    value
        .checked_mul(millis_per_unit)
        .map(Duration::from_millis)
        .ok_or_else(|| format!("'{text}' is too large"))
}
