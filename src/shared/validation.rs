use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Hyphenated UUID, any version, case-insensitive
    /// - Valid: "550e8400-e29b-41d4-a716-446655440000"
    /// - Invalid: "550e8400e29b41d4a716446655440000", "not-a-uuid"
    pub static ref UUID_REGEX: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .unwrap();

    /// Calendar date shape "YYYY-MM-DD" (range checked separately)
    pub static ref DATE_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();

    /// 24h clock "HH:MM" or "HH:MM:SS"
    pub static ref TIME_REGEX: Regex =
        Regex::new(r"^([01]\d|2[0-3]):[0-5]\d(:[0-5]\d)?$").unwrap();

    /// Tenant subdomain label: lowercase alphanumeric with inner hyphens, max 63 chars
    /// - Valid: "bistro", "iron-gym", "salon42"
    /// - Invalid: "-bistro", "bistro-", "Bistro", "bistro_cafe", "bistro.cafe"
    pub static ref SUBDOMAIN_REGEX: Regex =
        Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$").unwrap();

    /// "#rgb" or "#rrggbb"
    pub static ref HEX_COLOR_REGEX: Regex =
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();

    /// Loose international phone number: digits with optional +, spaces, dashes, parentheses
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9 ()\-]{6,20}$").unwrap();
}

pub fn is_valid_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}

/// Shape check plus a real calendar date (rejects "2024-02-30")
pub fn is_valid_date(value: &str) -> bool {
    DATE_REGEX.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

pub fn is_valid_time(value: &str) -> bool {
    TIME_REGEX.is_match(value)
}

/// A JSON object (not an array, string, number, bool or null)
pub fn is_plain_object(value: &serde_json::Value) -> bool {
    value.is_object()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE_REGEX.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    if !TIME_REGEX.is_match(value) {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

// =============================================================================
// `validator` custom functions
// =============================================================================

pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    if is_valid_date(value) {
        Ok(())
    } else {
        Err(ValidationError::new("date").with_message("Date must be a valid YYYY-MM-DD".into()))
    }
}

pub fn validate_time(value: &str) -> Result<(), ValidationError> {
    if is_valid_time(value) {
        Ok(())
    } else {
        Err(ValidationError::new("time").with_message("Time must be HH:MM or HH:MM:SS".into()))
    }
}

pub fn validate_plain_object(value: &serde_json::Value) -> Result<(), ValidationError> {
    if is_plain_object(value) {
        Ok(())
    } else {
        Err(ValidationError::new("object").with_message("Value must be a JSON object".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uuid() {
        assert!(is_valid_uuid("550e8400-e29b-41d4-a716-446655440000"));
        assert!(is_valid_uuid("550E8400-E29B-41D4-A716-446655440000"));
        assert!(!is_valid_uuid("550e8400e29b41d4a716446655440000")); // no hyphens
        assert!(!is_valid_uuid("550e8400-e29b-41d4-a716-44665544000g")); // non-hex
        assert!(!is_valid_uuid(""));
    }

    #[test]
    fn test_date() {
        assert!(is_valid_date("2024-02-29")); // leap year
        assert!(!is_valid_date("2024-02-30"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("2024-2-01"));
        assert!(!is_valid_date("01/02/2024"));
        assert_eq!(
            parse_date("2024-12-31"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
    }

    #[test]
    fn test_time() {
        assert!(is_valid_time("00:00"));
        assert!(is_valid_time("23:59:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("9:30"));
        assert!(!is_valid_time("12:60"));
        assert_eq!(parse_time("18:30"), NaiveTime::from_hms_opt(18, 30, 0));
        assert_eq!(parse_time("07:05:09"), NaiveTime::from_hms_opt(7, 5, 9));
    }

    #[test]
    fn test_plain_object() {
        assert!(is_plain_object(&json!({})));
        assert!(is_plain_object(&json!({ "primaryColor": "#ff0000" })));
        assert!(!is_plain_object(&json!([])));
        assert!(!is_plain_object(&json!(null)));
        assert!(!is_plain_object(&json!("text")));
    }

    #[test]
    fn test_subdomain_regex() {
        assert!(SUBDOMAIN_REGEX.is_match("bistro"));
        assert!(SUBDOMAIN_REGEX.is_match("iron-gym"));
        assert!(SUBDOMAIN_REGEX.is_match("a"));
        assert!(!SUBDOMAIN_REGEX.is_match("-bistro"));
        assert!(!SUBDOMAIN_REGEX.is_match("bistro-"));
        assert!(!SUBDOMAIN_REGEX.is_match("Bistro"));
        assert!(!SUBDOMAIN_REGEX.is_match("bistro_cafe"));
        assert!(!SUBDOMAIN_REGEX.is_match("bistro.cafe"));
        assert!(!SUBDOMAIN_REGEX.is_match(&"a".repeat(64)));
    }

    #[test]
    fn test_hex_color_regex() {
        assert!(HEX_COLOR_REGEX.is_match("#fff"));
        assert!(HEX_COLOR_REGEX.is_match("#1A2b3C"));
        assert!(!HEX_COLOR_REGEX.is_match("fff"));
        assert!(!HEX_COLOR_REGEX.is_match("#ffff"));
    }
}
