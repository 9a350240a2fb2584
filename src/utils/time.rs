//! Timestamp utilities: storage encoding, parsing of CLI bounds, hour formatting.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Local, NaiveDate, SecondsFormat, SubsecRound, TimeZone, Utc};

/// Storage precision. Timestamps are stored as fixed-width RFC 3339 UTC
/// strings so that text order equals chronological order.
pub fn truncate(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(3)
}

pub fn to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn from_db(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a CLI bound: either a full RFC 3339 timestamp or a `YYYY-MM-DD`
/// date, which means local midnight of that day.
pub fn parse_bound(s: &str) -> AppResult<DateTime<Utc>> {
    if let Some(ts) = from_db(s) {
        return Ok(ts);
    }

    let day = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(s.to_string()))?;
    local_midnight(day).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// Inclusive upper bound for a `YYYY-MM-DD` "to" date: the last stored
/// millisecond before the following local midnight.
pub fn parse_upper_bound(s: &str) -> AppResult<DateTime<Utc>> {
    if let Some(ts) = from_db(s) {
        return Ok(ts);
    }

    let day = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(s.to_string()))?;
    day.succ_opt()
        .and_then(local_midnight)
        .map(|next| next - Duration::milliseconds(1))
        .ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

fn local_midnight(day: NaiveDate) -> Option<DateTime<Utc>> {
    let naive = day.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render a local timestamp for tables, or `--` when absent.
pub fn format_local(ts: Option<&DateTime<Utc>>) -> String {
    match ts {
        Some(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "--".to_string(),
    }
}

/// 7.25 → "07h 15m"
pub fn hours2readable(hours: f64) -> String {
    let mins = (hours * 60.0).round() as i64;
    format!("{:02}h {:02}m", mins / 60, mins % 60)
}
