use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::error::{CrmError, CrmResult};

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> CrmResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(CrmError::BlankField {
            field: field.to_string(),
        })
    } else {
        Ok(trimmed)
    }
}

/// Validates that an integer is positive (> 0).
pub fn positive(value: i64, field: &str) -> CrmResult<i64> {
    if value <= 0 {
        Err(CrmError::NonPositive {
            field: field.to_string(),
        })
    } else {
        Ok(value)
    }
}

/// Validates an optional positive integer, falling back to `default` for None.
pub fn positive_or(value: Option<i64>, default: i64, field: &str) -> CrmResult<i64> {
    match value {
        None => Ok(default),
        Some(n) => positive(n, field),
    }
}

/// `at` moved by `minutes`, or `OutOfRange` when the result can't be represented.
pub fn add_minutes(at: DateTime<Utc>, minutes: i64, field: &str) -> CrmResult<DateTime<Utc>> {
    Duration::try_minutes(minutes)
        .and_then(|d| at.checked_add_signed(d))
        .ok_or_else(|| CrmError::OutOfRange {
            field: field.to_string(),
        })
}

/// Normalizes a 24-hour `HH:MM` clock time, so `9:05` becomes `09:05`.
pub fn clock_time(value: &str, field: &str) -> CrmResult<String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| CrmError::BadFormat {
            field: field.to_string(),
            expected: "HH:MM".to_string(),
        })
}

/// Trims an optional string, returning None if blank.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Formats the first ten digits of `value` as a US phone number:
/// `(555)-201-9933`. Partial input is formatted as far as it goes; input
/// without digits yields an empty string.
pub fn format_us_phone(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).take(10).collect();
    match digits.len() {
        0 => String::new(),
        1..=3 => format!("({}", digits),
        4..=6 => format!("({})-{}", &digits[..3], &digits[3..]),
        _ => format!("({})-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn non_blank_accepts_valid_string() {
        assert_eq!(non_blank("Floor Sales", "name").unwrap(), "Floor Sales");
    }

    #[test]
    fn non_blank_trims_whitespace() {
        assert_eq!(non_blank("  Dana K.  ", "name").unwrap(), "Dana K.");
    }

    #[test]
    fn non_blank_rejects_whitespace_only() {
        assert!(non_blank("   ", "name").is_err());
        assert!(non_blank("", "name").is_err());
    }

    #[test]
    fn positive_rejects_zero_and_negative() {
        assert_eq!(positive(45, "duration").unwrap(), 45);
        assert!(positive(0, "duration").is_err());
        assert!(positive(-5, "duration").is_err());
    }

    #[test]
    fn positive_or_uses_default_for_none() {
        assert_eq!(positive_or(None, 30, "duration").unwrap(), 30);
        assert_eq!(positive_or(Some(60), 30, "duration").unwrap(), 60);
        assert!(positive_or(Some(0), 30, "duration").is_err());
    }

    #[test]
    fn add_minutes_rejects_overflow() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(add_minutes(at, 90, "minutes").unwrap(), at + Duration::minutes(90));
        assert_eq!(add_minutes(at, -30, "minutes").unwrap(), at - Duration::minutes(30));
        assert!(matches!(
            add_minutes(at, 9_999_999_999_999, "minutes"),
            Err(CrmError::OutOfRange { .. })
        ));
        assert!(add_minutes(at, i64::MAX, "minutes").is_err());
    }

    #[test]
    fn format_us_phone_groups_digits() {
        assert_eq!(format_us_phone("555 201 9933"), "(555)-201-9933");
        assert_eq!(format_us_phone("+1 (555) 201-99"), "(155)-520-199");
        assert_eq!(format_us_phone("5552"), "(555)-2");
        assert_eq!(format_us_phone("55"), "(55");
        assert_eq!(format_us_phone("n/a"), "");
    }

    #[test]
    fn trim_optional_returns_none_for_blank() {
        assert_eq!(trim_optional(Some("  hi  ")), Some("hi".to_string()));
        assert_eq!(trim_optional(Some("   ")), None);
        assert_eq!(trim_optional(None), None);
    }

    #[test]
    fn clock_time_normalizes_and_rejects() {
        assert_eq!(clock_time("9:05", "start").unwrap(), "09:05");
        assert_eq!(clock_time(" 18:00 ", "end").unwrap(), "18:00");
        assert!(matches!(clock_time("25:00", "end"), Err(CrmError::BadFormat { .. })));
        assert!(clock_time("noon", "start").is_err());
    }
}
