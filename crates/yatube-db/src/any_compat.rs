//! AnyPool row-extraction helpers.
//!
//! `sqlx::AnyPool` only natively decodes primitive types (i16/i32/i64,
//! f32/f64, bool, String, bytes). UUID and timestamp columns are stored as
//! text and converted here, in both directions.
//!
//! All decoders return `sqlx::Error` so repository row mappers can use `?`.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{any::AnyRow, Row};
use uuid::Uuid;

// ── Uuid ─────────────────────────────────────────────────────────────────────

pub fn get_uuid(row: &AnyRow, col: &str) -> Result<Uuid, sqlx::Error> {
    let s: String = row.try_get(col)?;
    Uuid::parse_str(&s).map_err(|e| sqlx::Error::Decode(Box::new(e) as _))
}

pub fn get_opt_uuid(row: &AnyRow, col: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let s: Option<String> = row.try_get(col)?;
    s.map(|v| Uuid::parse_str(&v).map_err(|e| sqlx::Error::Decode(Box::new(e) as _)))
        .transpose()
}

// ── DateTime<Utc> ─────────────────────────────────────────────────────────────

/// Encode a timestamp as fixed-width RFC 3339 text (`2024-01-15T10:30:00.000000Z`).
///
/// Every stored timestamp uses this form so `ORDER BY` on the text column is
/// chronological.
pub fn encode_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn get_datetime(row: &AnyRow, col: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    let s: String = row.try_get(col)?;
    parse_datetime(&s).map_err(sqlx::Error::Decode)
}

fn parse_datetime(
    s: &str,
) -> Result<DateTime<Utc>, Box<dyn std::error::Error + Send + Sync + 'static>> {
    // What encode_datetime writes
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    // SQLite CURRENT_TIMESTAMP format: "2024-01-15 10:30:00", for rows written by hand
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt.and_utc());
    }
    Err(format!("cannot parse timestamp: {s}").into())
}

// ── Counts ────────────────────────────────────────────────────────────────────

/// Convert a `COUNT(*)` result to `usize`.
pub fn count_to_usize(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

/// Convert a page offset/limit to the `i64` the driver binds.
pub fn usize_to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_encoded_datetimes_sort_chronologically() {
        let early = Utc.with_ymd_and_hms(2024, 1, 15, 9, 59, 59).unwrap();
        let late = early + chrono::Duration::microseconds(1);
        assert!(encode_datetime(early) < encode_datetime(late));
        assert_eq!(encode_datetime(early), "2024-01-15T09:59:59.000000Z");
    }

    #[test]
    fn test_parse_round_trips_encoded_form() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
            + chrono::Duration::microseconds(123_456);
        assert_eq!(parse_datetime(&encode_datetime(dt)).unwrap(), dt);
        assert!(parse_datetime("2024-01-15 10:30:00").is_ok());
        assert!(parse_datetime("yesterday").is_err());
    }
}
