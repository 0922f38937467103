use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crumbscope_types::parse_timestamp;

/// Placeholder for the time part of date-only timestamps
const NO_TIME: &str = "\u{2014}";

/// Formatted time column of a breadcrumb row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeCell {
    /// e.g. `Sep 1, 2021`
    pub date: String,
    /// e.g. `12:30:00.123`, or an em-dash for date-only timestamps
    pub time: String,
    /// What the row shows: absolute `HH:MM:SS` or offset from the event
    pub display: String,
}

/// Format the time column for a row.
///
/// Returns `None` (an empty cell) unless both the row's timestamp and the
/// event's reference time are present and readable.
pub fn format_time_cell(
    timestamp: Option<&str>,
    reference: Option<&str>,
    display_relative: bool,
) -> Option<TimeCell> {
    let reference = parse_timestamp(reference?)?;
    let timestamp = timestamp?;

    if let Some(ts) = parse_timestamp(timestamp) {
        let display = if display_relative {
            format_offset(ts - reference)
        } else {
            ts.format("%H:%M:%S").to_string()
        };
        return Some(TimeCell {
            date: format_date(&ts),
            time: ts.format("%H:%M:%S%.3f").to_string(),
            display,
        });
    }

    let day = NaiveDate::parse_from_str(timestamp, "%Y-%m-%d").ok()?;
    let date = day.format("%b %-d, %Y").to_string();
    Some(TimeCell {
        display: date.clone(),
        date,
        time: NO_TIME.to_string(),
    })
}

fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y").to_string()
}

/// Compact signed offset like `-1m 05s`
fn format_offset(delta: TimeDelta) -> String {
    let total = delta.num_seconds();
    if total == 0 {
        return "0s".to_string();
    }

    let sign = if total < 0 { "-" } else { "+" };
    let secs = total.unsigned_abs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    if h > 0 {
        format!("{}{}h {:02}m {:02}s", sign, h, m, s)
    } else if m > 0 {
        format!("{}{}m {:02}s", sign, m, s)
    } else {
        format!("{}{}s", sign, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT_TIME: &str = "2021-09-01T12:30:00Z";

    #[test]
    fn test_missing_fields_yield_empty_cell() {
        assert!(format_time_cell(None, Some(EVENT_TIME), false).is_none());
        assert!(format_time_cell(Some(EVENT_TIME), None, false).is_none());
        assert!(format_time_cell(Some("not a time"), Some(EVENT_TIME), false).is_none());
    }

    #[test]
    fn test_absolute_display() {
        let cell = format_time_cell(Some("2021-09-01T12:28:55.250Z"), Some(EVENT_TIME), false).unwrap();
        assert_eq!(cell.display, "12:28:55");
        assert_eq!(cell.time, "12:28:55.250");
        assert_eq!(cell.date, "Sep 1, 2021");
    }

    #[test]
    fn test_relative_display() {
        let cell = format_time_cell(Some("2021-09-01T12:28:55Z"), Some(EVENT_TIME), true).unwrap();
        assert_eq!(cell.display, "-1m 05s");

        let cell = format_time_cell(Some("2021-09-01T11:27:55Z"), Some(EVENT_TIME), true).unwrap();
        assert_eq!(cell.display, "-1h 02m 05s");

        let cell = format_time_cell(Some(EVENT_TIME), Some(EVENT_TIME), true).unwrap();
        assert_eq!(cell.display, "0s");
    }

    #[test]
    fn test_date_only_timestamp() {
        let cell = format_time_cell(Some("2021-09-01"), Some(EVENT_TIME), false).unwrap();
        assert_eq!(cell.time, NO_TIME);
        assert_eq!(cell.display, "Sep 1, 2021");
    }
}
