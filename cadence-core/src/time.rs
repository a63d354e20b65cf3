//! Time utilities: parse caller-supplied deadlines into UTC.

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse().map_err(|_| anyhow!("invalid timezone: {tz}"))
}

/// Parse a deadline.
///
/// RFC 3339 input carries its own offset. Naive input such as
/// "2024-01-15T09:00:00" or "2024-01-15 09:00" is read as local time in `tz`.
pub fn parse_deadline(raw: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    let ndt = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| anyhow!("invalid deadline '{raw}': expected RFC 3339 or YYYY-MM-DD[T ]HH:MM[:SS]"))?;

    let local_dt = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow!("ambiguous or invalid local time (DST?): {raw} {tz}"))?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Helper: format a UTC time into RFC3339.
pub fn to_rfc3339_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chicago_deadline() {
        // Feb is CST (UTC-6)
        let tz = parse_timezone("America/Chicago").unwrap();
        let utc = parse_deadline("2026-02-20 23:59", tz).unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-02-21T05:59:00+00:00");
    }

    #[test]
    fn test_parse_naive_iso_in_utc() {
        let utc = parse_deadline("2024-01-15T09:00:00", Tz::UTC).unwrap();
        assert_eq!(to_rfc3339_utc(utc), "2024-01-15T09:00:00+00:00");
    }

    #[test]
    fn test_rfc3339_keeps_its_offset() {
        let tz = parse_timezone("Asia/Tokyo").unwrap();
        let utc = parse_deadline("2024-01-15T09:00:00-05:00", tz).unwrap();
        assert_eq!(to_rfc3339_utc(utc), "2024-01-15T14:00:00+00:00");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_deadline("next tuesday", Tz::UTC).is_err());
        assert!(parse_timezone("Mars/Olympus").is_err());
    }
}
