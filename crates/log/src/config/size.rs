//! Size strings (`"10MB"`, `"512k"`, `"1g"`)

use crate::core::{LogError, LogResult};

/// Parse a size string into bytes
///
/// Accepts a positive integer with an optional unit: `b`, `k`/`kb`,
/// `m`/`mb`, `g`/`gb` (case-insensitive, powers of 1024).
pub fn parse_size(raw: &str) -> LogResult<u64> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let number: u64 = digits
        .parse()
        .map_err(|_| LogError::InvalidSize(raw.to_string()))?;

    let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" => 1024,
        "m" | "mb" => 1024 * 1024,
        "g" | "gb" => 1024 * 1024 * 1024,
        _ => return Err(LogError::InvalidSize(raw.to_string())),
    };

    match number.checked_mul(multiplier) {
        Some(0) | None => Err(LogError::InvalidSize(raw.to_string())),
        Some(bytes) => Ok(bytes),
    }
}
