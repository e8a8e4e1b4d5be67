//! Display helpers shared by the table, timeline and dashboard views.

use chrono::NaiveDate;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use summary_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so exact binary midpoints round up. From
    // 2^52 upwards every scaled f64 is integral and is left untouched.
    let factor = 10_f64.powi(decimals as i32);
    let scaled = abs_value * factor;
    let rounded = if scaled < 4_503_599_627_370_496.0 {
        (scaled + f64::EPSILON * scaled).round() / factor
    } else {
        abs_value
    };

    // Group the integer digits of the fixed-point text.
    let fixed = format!("{:.prec$}", rounded, prec = decimals as usize);
    let result = match fixed.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{}", group_thousands(int_part), frac_part),
        None => group_thousands(&fixed),
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Hours with two decimals, as shown in every summary column.
///
/// ```
/// use summary_core::formatting::format_hours;
///
/// assert_eq!(format_hours(12.5), "12.50");
/// assert_eq!(format_hours(1234.0), "1,234.00");
/// ```
pub fn format_hours(hours: f64) -> String {
    format_number(hours, 2)
}

/// Mandays with two decimals.
pub fn format_mandays(mandays: f64) -> String {
    format_number(mandays, 2)
}

/// Short calendar date such as `"15 Jan 24"`, or `"-"` when absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d %b %y").to_string(),
        None => "-".to_string(),
    }
}

/// `"15 Jan 24 – 02 Feb 24"`, or an empty string unless both ends are known.
pub fn format_period(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(_), Some(_)) => format!("{} – {}", format_date(start), format_date(end)),
        _ => String::new(),
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
