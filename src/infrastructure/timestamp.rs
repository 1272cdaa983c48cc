// Timestamp parsing shared by the CSV loader and the HTTP query layer
use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

// 1973-03-03 to 3000-01-01; smaller numbers are years or compact dates
const MIN_EPOCH_SECONDS: f64 = 100_000_000.0;
const MAX_EPOCH_SECONDS: f64 = 32_503_680_000.0;

/// Parse a timestamp into epoch milliseconds (UTC).
///
/// Accepts RFC 3339 (`2024-07-01T00:00:10.000Z`), naive date-times as written
/// by pandas and plotly (`2024-07-01 00:00:10.123`), plain dates (`2024-07-01`
/// or `20240701`), and epoch seconds as a number (`1719792000.5`). Numbers
/// outside 1973..3000 in epoch seconds are rejected. Naive values are taken
/// as UTC.
pub fn parse_timestamp_ms(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("empty timestamp");
    }

    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y%m%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(midnight.and_utc().timestamp_millis());
        }
    }

    if let Ok(seconds) = raw.parse::<f64>() {
        if !(MIN_EPOCH_SECONDS..=MAX_EPOCH_SECONDS).contains(&seconds) {
            bail!("timestamp '{}' is outside the supported epoch seconds range", raw);
        }
        return Ok((seconds * 1000.0).round() as i64);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp_millis());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().timestamp_millis());
        }
    }

    bail!("unrecognised timestamp '{}'", raw)
}

/// RFC 3339 with millisecond precision, e.g. `2024-07-01T00:00:00.000Z`
pub fn format_timestamp_ms(time_ms: i64) -> String {
    match DateTime::from_timestamp_millis(time_ms) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => time_ms.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JULY_FIRST_MS: i64 = 1_719_792_000_000;

    #[test]
    fn test_parse_formats() {
        assert_eq!(parse_timestamp_ms("2024-07-01 00:00:00").unwrap(), JULY_FIRST_MS);
        assert_eq!(
            parse_timestamp_ms("2024-07-01 00:00:10.001").unwrap(),
            JULY_FIRST_MS + 10_001
        );
        assert_eq!(
            parse_timestamp_ms("2024-07-01T00:00:15.000").unwrap(),
            JULY_FIRST_MS + 15_000
        );
        assert_eq!(
            parse_timestamp_ms("2024-07-01T00:00:15.000Z").unwrap(),
            JULY_FIRST_MS + 15_000
        );
        assert_eq!(
            parse_timestamp_ms("2024-07-01T02:00:00+02:00").unwrap(),
            JULY_FIRST_MS
        );
        assert_eq!(parse_timestamp_ms("2024-07-01 00:05").unwrap(), JULY_FIRST_MS + 300_000);
        assert_eq!(parse_timestamp_ms("2023-01-01").unwrap(), 1_672_531_200_000);
    }

    #[test]
    fn test_parse_plotly_relayout_precision() {
        // Relayout events carry sub-millisecond digits
        assert_eq!(
            parse_timestamp_ms("2024-07-01 00:00:10.0004").unwrap(),
            JULY_FIRST_MS + 10_000
        );
    }

    #[test]
    fn test_parse_epoch_seconds() {
        assert_eq!(parse_timestamp_ms("1719792000").unwrap(), JULY_FIRST_MS);
        assert_eq!(parse_timestamp_ms(" 1719792000.25 ").unwrap(), JULY_FIRST_MS + 250);
    }

    #[test]
    fn test_parse_numbers_outside_epoch_range() {
        assert_eq!(parse_timestamp_ms("20240701").unwrap(), JULY_FIRST_MS);
        assert!(parse_timestamp_ms("2024").is_err());
        assert!(parse_timestamp_ms("0").is_err());
        assert!(parse_timestamp_ms("-1719792000").is_err());
        assert!(parse_timestamp_ms("1e300").is_err());
        assert!(parse_timestamp_ms("inf").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp_ms("").is_err());
        assert!(parse_timestamp_ms("yesterday").is_err());
        assert!(parse_timestamp_ms("NaN").is_err());
        assert!(parse_timestamp_ms("2024-13-01").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_timestamp_ms(JULY_FIRST_MS + 599_999), "2024-07-01T00:09:59.999Z");
    }
}
