//! Display Formatting
//!
//! Dates and money as shown in the deal views.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Human date for a backend timestamp. Unparsable input is shown unchanged.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "-".to_string();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.naive_local().format("%b %-d, %Y %H:%M").to_string();
    }
    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return dt.format("%b %-d, %Y %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%b %-d, %Y").to_string();
    }
    raw.to_string()
}

/// `$1,250,000.50`; whole amounts drop the cents
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if frac == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{frac:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_variants() {
        assert_eq!(format_date("2026-01-05T10:30:00"), "Jan 5, 2026 10:30");
        assert_eq!(format_date("2026-01-05T10:30:00.123"), "Jan 5, 2026 10:30");
        assert_eq!(format_date("2026-01-05T10:30:00Z"), "Jan 5, 2026 10:30");
        assert_eq!(format_date("2026-12-31"), "Dec 31, 2026");
        assert_eq!(format_date("yesterday"), "yesterday");
        assert_eq!(format_date("  "), "-");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0");
        assert_eq!(format_money(999.0), "$999");
        assert_eq!(format_money(1000.0), "$1,000");
        assert_eq!(format_money(1_250_000.5), "$1,250,000.50");
        assert_eq!(format_money(-42.25), "-$42.25");
        assert_eq!(format_money(f64::NAN), "-");
    }
}
