use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::coerce::Parsed;

/// Parses an availability date: `yyyy-MM-dd…`, `yyyy/MM/dd…` (prefix match)
/// or `d.m.yyyy`. Missing input is "no constraint"; other formats degrade to it.
pub fn parse_available_from(raw: Option<&str>) -> Parsed<Option<NaiveDate>> {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Parsed::Ok(None);
    };
    match parse_date_formats(s) {
        Some(date) => Parsed::Ok(Some(date)),
        None => Parsed::Degraded {
            value: None,
            reason: format!("unrecognized date {s:?}"),
        },
    }
}

fn parse_date_formats(s: &str) -> Option<NaiveDate> {
    if let Some(prefix) = s.get(..10).filter(|p| p.is_ascii()) {
        let bytes = prefix.as_bytes();
        for sep in [b'-', b'/'] {
            if bytes[4] == sep && bytes[7] == sep {
                let y = prefix[..4].parse().ok()?;
                let m = prefix[5..7].parse().ok()?;
                let d = prefix[8..10].parse().ok()?;
                return NaiveDate::from_ymd_opt(y, m, d);
            }
        }
    }

    let parts: Vec<&str> = s.split('.').collect();
    if let [d, m, y] = parts.as_slice()
        && (1..=2).contains(&d.len())
        && (1..=2).contains(&m.len())
        && y.len() == 4
    {
        return NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?);
    }
    None
}

/// Unix seconds to a UTC date; zero, negative or unparsable input is `None`.
pub fn parse_unix_date(raw: Option<&str>) -> Option<NaiveDate> {
    let secs = raw?.trim().parse::<i64>().ok().filter(|s| *s > 0)?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

/// Parses a modification timestamp: `%Y-%m-%d %H:%M:%S` (UTC) or RFC 3339.
pub fn parse_modified(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
