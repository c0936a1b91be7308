use crate::error::{AdflowError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
/// Timestamps are reduced to their UTC date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| AdflowError::InvalidDate(s.to_string()))
}

/// Parse an instant from an RFC 3339 timestamp or a bare date (midnight UTC).
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let d = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AdflowError::InvalidDate(s.to_string()))?;
    Ok(d.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Whole days from the UTC date of `now` to `date`. Negative when `date` is past.
pub fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    (date - now.date_naive()).num_days()
}

/// `Oct 22, 2026`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn plural_days(n: i64) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}

/// Serde helper for optional timeline dates. Anything that does not parse is
/// treated as absent rather than failing the whole snapshot.
pub fn lenient<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<RawDate>::deserialize(deserializer)? {
        Some(RawDate::Text(s)) => parse_date(&s).ok(),
        Some(RawDate::Other(_)) | None => None,
    })
}
