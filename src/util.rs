// Utility helpers for parsing and display formatting.
//
// The raw export is loose about numbers and dates, so all of that cleanup
// lives here and the processor only sees typed values.
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use num_format::{Locale, ToFormattedString};

use crate::error::ProcessError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%b %d, %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

const MONTHS: [(&str, &str); 12] = [
    ("Jan", "January"),
    ("Feb", "February"),
    ("Mar", "March"),
    ("Apr", "April"),
    ("May", "May"),
    ("Jun", "June"),
    ("Jul", "July"),
    ("Aug", "August"),
    ("Sep", "September"),
    ("Oct", "October"),
    ("Nov", "November"),
    ("Dec", "December"),
];

/// Parse a numeric cell into `f64`.
///
/// - Trims whitespace.
/// - Strips thousands separators and a trailing `%`.
/// - Returns `None` for empty cells and anything that is not a finite number.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Month cells are only trusted when they name a real month.
pub fn parse_month_safe(s: Option<&str>) -> Option<u32> {
    let s = s?.trim();
    s.parse::<u32>().ok().filter(|m| (1..=12).contains(m))
}

/// Parse a date cell into the calendar day it names. Naive date-times keep
/// their date part; timestamps with an offset are bucketed by their UTC day.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// English name of a month, full (`June`) or abbreviated (`Jun`).
pub fn month_name(month: u32, short: bool) -> Result<&'static str, ProcessError> {
    let idx = month
        .checked_sub(1)
        .filter(|i| *i < 12)
        .ok_or(ProcessError::InvalidMonth { month })?;
    let (abbr, full) = MONTHS[idx as usize];
    Ok(if short { abbr } else { full })
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale thousands separators, e.g. `-1,234.50`.
    if !n.is_finite() {
        return n.to_string();
    }
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    // Past u128 the digits are shown without separators.
    let mut res = match int_part.parse::<u128>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = parts.next() {
        res.push('.');
        res.push_str(frac);
    }
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_loose_numbers() {
        assert_eq!(parse_f64_safe(Some(" 12.5 ")), Some(12.5));
        assert_eq!(parse_f64_safe(Some("-3.2%")), Some(-3.2));
        assert_eq!(parse_f64_safe(Some("1,204.0")), Some(1204.0));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("inf")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn month_cells_must_be_in_range() {
        assert_eq!(parse_month_safe(Some("6")), Some(6));
        assert_eq!(parse_month_safe(Some("13")), None);
        assert_eq!(parse_month_safe(Some("0")), None);
        assert_eq!(parse_month_safe(Some("June")), None);
    }

    #[test]
    fn parses_supported_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2023, 6, 15);
        for raw in [
            "2023-06-15",
            "2023/06/15",
            "06/15/2023",
            "Jun 15, 2023",
            "2023-06-15T18:30:00Z",
            "2023-06-15T10:00:00",
            "2023-06-15 23:59:59",
        ] {
            assert_eq!(parse_date_safe(Some(raw)), expected, "input {raw}");
        }
        assert_eq!(
            parse_date_safe(Some("2023-06-15T23:30:00-05:00")),
            NaiveDate::from_ymd_opt(2023, 6, 16)
        );
        assert_eq!(
            parse_date_safe(Some("2023-06-16T02:00:00+05:30")),
            NaiveDate::from_ymd_opt(2023, 6, 15)
        );
        assert_eq!(parse_date_safe(Some("2023-13-01")), None);
        assert_eq!(parse_date_safe(Some("yesterday")), None);
        assert_eq!(parse_date_safe(Some("  ")), None);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1, false).unwrap(), "January");
        assert_eq!(month_name(9, true).unwrap(), "Sep");
        assert_eq!(month_name(12, false).unwrap(), "December");
        assert_eq!(
            month_name(0, false),
            Err(ProcessError::InvalidMonth { month: 0 })
        );
        assert_eq!(
            month_name(13, true),
            Err(ProcessError::InvalidMonth { month: 13 })
        );
    }

    #[test]
    fn formats_numbers() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-12.5, 1), "-12.5");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_number(7.0, 0), "7");
        assert_eq!(format_int(9855_usize), "9,855");
    }

    #[test]
    fn formats_numbers_beyond_i64() {
        assert_eq!(format_number(1e20, 0), "100,000,000,000,000,000,000");
        assert_eq!(format_number(-2e19, 1), "-20,000,000,000,000,000,000.0");
        let huge = format_number(1e300, 2);
        assert!(huge.starts_with('1'));
        assert!(huge.len() > 300);
    }
}
