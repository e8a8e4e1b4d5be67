use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::trace;

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)h\s+(\d+)m").expect("regex is valid"));

// ── DurationParser ────────────────────────────────────────────────────────────

/// Extracts worked hours from the free-text "Hours Worked" column.
pub struct DurationParser;

impl DurationParser {
    /// Parse `"<H>h <M>m"` anywhere in `text` into fractional hours.
    ///
    /// Text around the match (such as a trailing `"(13:00:00 - 18:00:00)"`)
    /// is ignored. Empty or non-matching input yields `0.0`.
    pub fn parse_hours(text: &str) -> f64 {
        let Some(caps) = DURATION_RE.captures(text) else {
            if !text.is_empty() {
                trace!("Unrecognised duration text {:?}, counting 0h", text);
            }
            return 0.0;
        };

        let hours: f64 = caps[1].parse().unwrap_or(0.0);
        let minutes: f64 = caps[2].parse().unwrap_or(0.0);
        hours + minutes / 60.0
    }
}

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses the "Date" column into a calendar date.
pub struct DateParser;

impl DateParser {
    /// Parse `text` into a [`NaiveDate`].
    ///
    /// Unambiguous formats are tried first (ISO dates and date-times, and
    /// textual month names). When none match, the text is split on `/`, `.`
    /// or `-` and read as day/month/year, promoting two-digit years into the
    /// 2000s. Returns `None` when no strategy produces a real calendar date.
    pub fn parse(text: &str) -> Option<NaiveDate> {
        let s = text.trim();
        if s.is_empty() {
            return None;
        }
        Self::parse_standard(s).or_else(|| Self::parse_day_month_year(s))
    }

    fn parse_standard(s: &str) -> Option<NaiveDate> {
        if starts_with_year(s) {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.date_naive());
            }

            const DATETIME_FORMATS: &[&str] = &[
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%dT%H:%M",
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%d %H:%M",
            ];
            for fmt in DATETIME_FORMATS {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Some(naive.date());
                }
            }

            for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
                if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                    return Some(date);
                }
            }
            return None;
        }

        const TEXTUAL_FORMATS: &[&str] = &[
            "%d %b %Y",
            "%d %B %Y",
            "%b %d, %Y",
            "%B %d, %Y",
            "%b %d %Y",
        ];
        TEXTUAL_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    }

    fn parse_day_month_year(s: &str) -> Option<NaiveDate> {
        let parts: Vec<&str> = s.split(['/', '.', '-']).collect();
        let [day, month, year] = parts.as_slice() else {
            return None;
        };
        let day = leading_int(day)?;
        let month = leading_int(month)?;
        let year = promote_year(leading_int(year)?);
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Derive the `YYYY-MM` month key used for month filtering.
    ///
    /// Dates in a standard format (ISO, `YYYY/MM/DD`, textual months) use
    /// their parsed month. Other slash-separated dates are read as
    /// `DD/MM/YYYY`, and remaining parseable dates use their parsed month.
    /// Otherwise the first seven characters of the raw text are the key.
    /// Empty text has no key.
    pub fn month_key(text: &str) -> Option<String> {
        let s = text.trim();
        if s.is_empty() {
            return None;
        }

        if let Some(date) = Self::parse_standard(s) {
            return Some(date.format("%Y-%m").to_string());
        }

        let parts: Vec<&str> = s.split('/').collect();
        if let (false, [_, month, year]) = (starts_with_year(s), parts.as_slice()) {
            let month = leading_int::<u32>(month);
            let year = leading_int::<i32>(year);
            if let (Some(month), Some(year)) = (month, year) {
                return Some(format!("{:04}-{:02}", promote_year(year), month));
            }
        }

        if let Some(date) = Self::parse(s) {
            return Some(date.format("%Y-%m").to_string());
        }

        Some(s.chars().take(7).collect())
    }
}

/// Whether `s` begins with a four-digit year followed by a separator.
fn starts_with_year(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() > 4
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && matches!(bytes[4], b'-' | b'/')
}

/// Integer value of the leading digits of `s`, ignoring surrounding spaces.
fn leading_int<T: std::str::FromStr>(s: &str) -> Option<T> {
    let trimmed = s.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

fn promote_year(year: i32) -> i32 {
    if year < 100 {
        year + 2000
    } else {
        year
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── DurationParser ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_hours_with_time_range_suffix() {
        let hours = DurationParser::parse_hours("5h 00m (13:00:00 - 18:00:00 )");
        assert_eq!(hours, 5.0);
    }

    #[test]
    fn test_parse_hours_with_minutes() {
        assert_eq!(DurationParser::parse_hours("1h 30m"), 1.5);
        assert_eq!(DurationParser::parse_hours("0h 45m"), 0.75);
    }

    #[test]
    fn test_parse_hours_allows_multiple_spaces() {
        assert_eq!(DurationParser::parse_hours("2h   15m"), 2.25);
    }

    #[test]
    fn test_parse_hours_empty_is_zero() {
        assert_eq!(DurationParser::parse_hours(""), 0.0);
    }

    #[test]
    fn test_parse_hours_unmatched_is_zero() {
        assert_eq!(DurationParser::parse_hours("eight hours"), 0.0);
        assert_eq!(DurationParser::parse_hours("8h"), 0.0);
        assert_eq!(DurationParser::parse_hours("8h00m"), 0.0);
        assert_eq!(DurationParser::parse_hours("8:00"), 0.0);
    }

    // ── DateParser::parse ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(DateParser::parse("2024-01-15"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_parse_iso_datetime() {
        assert_eq!(
            DateParser::parse("2024-01-15T10:30:00Z"),
            Some(date(2024, 1, 15))
        );
        assert_eq!(
            DateParser::parse("2024-01-15 10:30:00"),
            Some(date(2024, 1, 15))
        );
    }

    #[test]
    fn test_parse_textual_month() {
        assert_eq!(DateParser::parse("15 Jan 2024"), Some(date(2024, 1, 15)));
        assert_eq!(DateParser::parse("Jan 15, 2024"), Some(date(2024, 1, 15)));
        assert_eq!(DateParser::parse("January 15, 2024"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_parse_day_month_year_fallback() {
        assert_eq!(DateParser::parse("13/01/2024"), Some(date(2024, 1, 13)));
        assert_eq!(DateParser::parse("01/02/2024"), Some(date(2024, 2, 1)));
        assert_eq!(DateParser::parse("13.01.2024"), Some(date(2024, 1, 13)));
        assert_eq!(DateParser::parse("13-01-2024"), Some(date(2024, 1, 13)));
    }

    #[test]
    fn test_parse_two_digit_year_is_promoted() {
        assert_eq!(DateParser::parse("05/03/24"), Some(date(2024, 3, 5)));
        assert_eq!(DateParser::parse("15-01-24"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_parse_trailing_time_is_ignored() {
        assert_eq!(DateParser::parse("05/03/2024 08:00"), Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_parse_invalid_returns_none() {
        assert_eq!(DateParser::parse(""), None);
        assert_eq!(DateParser::parse("   "), None);
        assert_eq!(DateParser::parse("not a date"), None);
        assert_eq!(DateParser::parse("32/01/2024"), None);
        assert_eq!(DateParser::parse("10/13/2024"), None);
        assert_eq!(DateParser::parse("2024-02-30"), None);
        assert_eq!(DateParser::parse("1/2"), None);
    }

    // ── DateParser::month_key ─────────────────────────────────────────────────

    #[test]
    fn test_month_key_slash_date() {
        assert_eq!(DateParser::month_key("15/01/2024"), Some("2024-01".to_string()));
        assert_eq!(DateParser::month_key("5/3/2024"), Some("2024-03".to_string()));
        assert_eq!(DateParser::month_key("5/3/24"), Some("2024-03".to_string()));
    }

    #[test]
    fn test_month_key_year_first_slash_date() {
        assert_eq!(DateParser::month_key("2024/01/15"), Some("2024-01".to_string()));
        assert_eq!(DateParser::month_key("2024/12/31"), Some("2024-12".to_string()));
        // Agrees with the date the ranges are built from.
        let date = DateParser::parse("2024/01/15").unwrap();
        assert_eq!(date.format("%Y-%m").to_string(), "2024-01");
    }

    #[test]
    fn test_month_key_invalid_year_first_slash_uses_prefix() {
        assert_eq!(DateParser::month_key("2024/13/99"), Some("2024/13".to_string()));
    }

    #[test]
    fn test_month_key_iso_date() {
        assert_eq!(DateParser::month_key("2024-01-15"), Some("2024-01".to_string()));
    }

    #[test]
    fn test_month_key_dotted_date_uses_parsed_date() {
        assert_eq!(DateParser::month_key("15.01.2024"), Some("2024-01".to_string()));
    }

    #[test]
    fn test_month_key_unparseable_uses_prefix() {
        assert_eq!(DateParser::month_key("2024-13-99"), Some("2024-13".to_string()));
    }

    #[test]
    fn test_month_key_empty_is_none() {
        assert_eq!(DateParser::month_key(""), None);
    }
}
