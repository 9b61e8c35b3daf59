//! CLI input validation functions.
//!
//! Used as clap `value_parser`s so bad input is rejected at parse time.

use chrono::NaiveDate;

/// Maximum length of a contact ID accepted on the command line.
pub const MAX_CONTACT_ID_LENGTH: usize = 128;

/// Maximum depth level accepted by `--levels` and `--focus`.
pub const MAX_LEVEL: usize = 64;

/// Validate a contact ID: non-empty, no whitespace.
pub fn validate_contact_id(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Contact ID cannot be empty".to_string());
    }
    if s.len() > MAX_CONTACT_ID_LENGTH {
        return Err(format!(
            "Contact ID cannot exceed {} characters",
            MAX_CONTACT_ID_LENGTH
        ));
    }
    if s.chars().any(char::is_whitespace) {
        return Err(format!("Invalid contact ID '{}': contains whitespace", s));
    }

    Ok(s.to_string())
}

/// Validate a required text field such as a name or phone number.
pub fn validate_required_text(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("Value cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}

/// Validate a depth level.
pub fn validate_level(s: &str) -> Result<usize, String> {
    let level: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid level '{}': expected a non-negative integer", s))?;
    if level > MAX_LEVEL {
        return Err(format!("Level {} is out of range (0-{})", level, MAX_LEVEL));
    }
    Ok(level)
}

/// Validate a birth date in `YYYY-MM-DD` form.
pub fn validate_birth_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ana", "ana")]
    #[case("  c-17  ", "c-17")]
    #[case("7f3a9", "7f3a9")]
    fn valid_contact_ids(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate_contact_id(input).unwrap(), expected);
    }

    #[rstest]
    #[case("", "cannot be empty")]
    #[case("   ", "cannot be empty")]
    #[case("ana souza", "contains whitespace")]
    fn invalid_contact_ids(#[case] input: &str, #[case] message: &str) {
        let err = validate_contact_id(input).unwrap_err();
        assert!(err.contains(message), "got: {err}");
    }

    #[test]
    fn overlong_contact_id() {
        let id = "x".repeat(MAX_CONTACT_ID_LENGTH + 1);
        assert!(validate_contact_id(&id).is_err());
    }

    #[test]
    fn required_text_is_trimmed() {
        assert_eq!(validate_required_text("  Ana ").unwrap(), "Ana");
        assert!(validate_required_text(" \t ").is_err());
    }

    #[rstest]
    #[case("0", Ok(0))]
    #[case(" 3 ", Ok(3))]
    #[case("64", Ok(64))]
    fn valid_levels(#[case] input: &str, #[case] expected: Result<usize, String>) {
        assert_eq!(validate_level(input), expected);
    }

    #[rstest]
    #[case("-1")]
    #[case("two")]
    #[case("65")]
    fn invalid_levels(#[case] input: &str) {
        assert!(validate_level(input).is_err());
    }

    #[test]
    fn birth_date_parses_iso_form() {
        assert_eq!(
            validate_birth_date(" 1990-04-12 ").unwrap(),
            NaiveDate::from_ymd_opt(1990, 4, 12).unwrap()
        );
    }

    #[rstest]
    #[case("12/04/1990")]
    #[case("1990-13-01")]
    #[case("")]
    fn invalid_birth_dates(#[case] input: &str) {
        assert!(validate_birth_date(input).is_err());
    }
}
