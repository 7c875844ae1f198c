//! VIPS datetime strings.
//!
//! VIPS sends and expects datetimes laid out as `2019-01-02 17:30:00 -08:00`:
//! a space between date and time and a space before the offset. The layout is
//! read by fixed offsets, so anything that does not match it exactly is
//! rejected rather than sliced into garbage.

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::error::DateTimeError;

/// Byte length of a well-formed VIPS datetime.
const VIPS_DATETIME_LEN: usize = 26;

/// Parse a VIPS datetime string.
pub fn to_datetime(vips_datetime: &str) -> Result<DateTime<FixedOffset>, DateTimeError> {
    check_layout(vips_datetime)?;

    let date = &vips_datetime[0..10];
    let time = &vips_datetime[11..19];
    let offset_hour = &vips_datetime[20..23];
    let offset_minute = &vips_datetime[24..26];
    let iso8601 = format!("{date}T{time}{offset_hour}:{offset_minute}");

    DateTime::parse_from_rfc3339(&iso8601).map_err(|source| DateTimeError::Parse {
        value: vips_datetime.to_string(),
        source,
    })
}

/// Format a datetime the way VIPS expects it.
pub fn from_datetime<Tz>(date_time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    // e.g. "2019-01-02 17:30:00 -0800"
    let formatted = date_time.format("%Y-%m-%d %H:%M:%S %z").to_string();
    format!("{}:{}", &formatted[0..23], &formatted[23..25])
}

fn check_layout(value: &str) -> Result<(), DateTimeError> {
    let malformed = |reason: &str| DateTimeError::Malformed {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if !value.is_ascii() {
        return Err(malformed("contains non-ASCII characters"));
    }
    if value.len() != VIPS_DATETIME_LEN {
        return Err(malformed("expected the layout YYYY-MM-DD HH:MM:SS +HH:MM"));
    }

    let bytes = value.as_bytes();
    if bytes[10] != b' ' || bytes[19] != b' ' {
        return Err(malformed("expected single spaces after the date and the time"));
    }
    if bytes[20] != b'+' && bytes[20] != b'-' {
        return Err(malformed("offset must start with + or -"));
    }
    if bytes[23] != b':' {
        return Err(malformed("offset must be written as HH:MM"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, Timelike};

    use super::*;

    #[test]
    fn parses_vips_layout() {
        let dt = to_datetime("2019-01-02 17:30:00 -08:00").unwrap();
        assert_eq!(dt.year(), 2019);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 2);
        assert_eq!(dt.hour(), 17);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.offset().local_minus_utc(), -8 * 3600);
    }

    #[test]
    fn round_trips_sample() {
        let sample = "2019-01-02 17:30:00 -08:00";
        assert_eq!(from_datetime(&to_datetime(sample).unwrap()), sample);
    }

    #[test]
    fn round_trips_positive_offset_with_minutes() {
        let sample = "2020-07-15 09:05:59 +05:30";
        assert_eq!(from_datetime(&to_datetime(sample).unwrap()), sample);
    }

    #[test]
    fn formats_utc_with_colon_offset() {
        let dt = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap()
            .and_utc();
        assert_eq!(from_datetime(&dt), "2021-03-04 05:06:07 +00:00");
    }

    #[test]
    fn rejects_single_digit_offset() {
        let err = to_datetime("2019-01-02 17:30:00 -8:00").unwrap_err();
        assert!(matches!(err, DateTimeError::Malformed { .. }));
    }

    #[test]
    fn rejects_iso_separator() {
        let err = to_datetime("2019-01-02T17:30:00 -08:00").unwrap_err();
        assert!(matches!(err, DateTimeError::Malformed { .. }));
    }

    #[test]
    fn rejects_missing_offset_sign() {
        let err = to_datetime("2019-01-02 17:30:00  08:00").unwrap_err();
        assert!(matches!(err, DateTimeError::Malformed { .. }));
    }

    #[test]
    fn rejects_non_ascii_without_panicking() {
        let err = to_datetime("2019-01-02 17:30:00 -08:0é").unwrap_err();
        assert!(matches!(err, DateTimeError::Malformed { .. }));
    }

    #[test]
    fn reports_impossible_dates() {
        let err = to_datetime("2019-13-02 17:30:00 -08:00").unwrap_err();
        assert!(matches!(err, DateTimeError::Parse { .. }));
    }
}
