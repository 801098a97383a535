//! Input validation utilities.
//!
//! Field-level checks applied at ingress, before any database work. Each
//! helper reports the failing field so the HTTP layer can return a 400 body
//! pinpointing it.

use chrono::{NaiveDate, Utc};

use crate::{RecordsError, RecordsResult};

/// Validates a mandatory text field against a length window.
pub fn require_text(field: &'static str, value: &str, min: usize, max: usize) -> RecordsResult<()> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(RecordsError::validation(
            field,
            format!("must be between {min} and {max} characters"),
        ));
    }
    Ok(())
}

/// Validates an optional text field against a maximum length.
pub fn optional_text(field: &'static str, value: Option<&str>, max: usize) -> RecordsResult<()> {
    if let Some(value) = value {
        if value.chars().count() > max {
            return Err(RecordsError::validation(
                field,
                format!("cannot exceed {max} characters"),
            ));
        }
    }
    Ok(())
}

/// Validates an optional integer measurement against an inclusive range.
pub fn range_i32(field: &'static str, value: Option<i32>, min: i32, max: i32) -> RecordsResult<()> {
    if let Some(value) = value {
        if value < min || value > max {
            return Err(RecordsError::validation(
                field,
                format!("must be between {min} and {max}"),
            ));
        }
    }
    Ok(())
}

/// Validates an optional floating-point measurement against an inclusive range.
pub fn range_f64(field: &'static str, value: Option<f64>, min: f64, max: f64) -> RecordsResult<()> {
    if let Some(value) = value {
        if !value.is_finite() || value < min || value > max {
            return Err(RecordsError::validation(
                field,
                format!("must be between {min} and {max}"),
            ));
        }
    }
    Ok(())
}

/// Validates an optional measurement that must be strictly positive.
pub fn positive_f64(field: &'static str, value: Option<f64>) -> RecordsResult<()> {
    if let Some(value) = value {
        if !value.is_finite() || value <= 0.0 {
            return Err(RecordsError::validation(field, "must be positive"));
        }
    }
    Ok(())
}

/// Validates that a date lies strictly in the past (UTC today excluded).
pub fn past_date(field: &'static str, value: NaiveDate) -> RecordsResult<()> {
    if value >= Utc::now().date_naive() {
        return Err(RecordsError::validation(field, "must be in the past"));
    }
    Ok(())
}

/// Validates an optional E.164-like phone number: optional `+`, a leading
/// digit 1-9, then up to 14 further digits.
pub fn phone(field: &'static str, value: Option<&str>) -> RecordsResult<()> {
    let Some(value) = value else { return Ok(()) };
    let digits = value.strip_prefix('+').unwrap_or(value);
    let ok = (2..=15).contains(&digits.len())
        && digits.as_bytes()[0].is_ascii_digit()
        && digits.as_bytes()[0] != b'0'
        && digits.bytes().all(|b| b.is_ascii_digit());
    if !ok {
        return Err(RecordsError::validation(field, "invalid phone number format"));
    }
    Ok(())
}

/// Validates and normalises an optional email address: trimmed, lowercased.
pub fn normalize_email(field: &'static str, value: Option<String>) -> RecordsResult<Option<String>> {
    let Some(value) = value else { return Ok(None) };
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return Ok(None);
    }
    let mut parts = normalized.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    let ok = !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !normalized.contains(char::is_whitespace)
        && normalized.chars().count() <= 100;
    if !ok {
        return Err(RecordsError::validation(field, "invalid email format"));
    }
    Ok(Some(normalized))
}

/// Validates that, when both ends are present, the end date is not before
/// the start date.
pub fn end_not_before_start(
    field: &'static str,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> RecordsResult<()> {
    if let Some(end) = end {
        if end < start {
            return Err(RecordsError::validation(
                field,
                "end date cannot be before start date",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_window_is_inclusive() {
        assert!(require_text("firstName", "Jo", 2, 50).is_ok());
        assert!(require_text("firstName", "J", 2, 50).is_err());
        assert!(require_text("firstName", &"x".repeat(51), 2, 50).is_err());
    }

    #[test]
    fn optional_text_skips_absent_values() {
        assert!(optional_text("notes", None, 10).is_ok());
        assert!(optional_text("notes", Some("short"), 10).is_ok());
        assert!(optional_text("notes", Some("far too long"), 10).is_err());
    }

    #[test]
    fn phone_accepts_e164_like_numbers() {
        assert!(phone("phone", Some("+33612345678")).is_ok());
        assert!(phone("phone", Some("33612345678")).is_ok());
        assert!(phone("phone", Some("+0612345678")).is_err());
        assert!(phone("phone", Some("+33 6 12")).is_err());
        assert!(phone("phone", Some("+1234567890123456")).is_err());
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let email = normalize_email("email", Some("  Jane.Smith@Example.COM ".into()))
            .unwrap()
            .unwrap();
        assert_eq!(email, "jane.smith@example.com");
        assert!(normalize_email("email", Some("not-an-email".into())).is_err());
        assert_eq!(normalize_email("email", Some("   ".into())).unwrap(), None);
    }

    #[test]
    fn date_of_birth_must_be_past() {
        assert!(past_date("dateOfBirth", NaiveDate::from_ymd_opt(1990, 8, 22).unwrap()).is_ok());
        assert!(past_date("dateOfBirth", Utc::now().date_naive()).is_err());
    }

    #[test]
    fn treatment_window_order() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert!(end_not_before_start("endDate", start, None).is_ok());
        assert!(end_not_before_start("endDate", start, start.succ_opt()).is_ok());
        assert!(end_not_before_start("endDate", start, start.pred_opt()).is_err());
    }

    #[test]
    fn ranges_reject_out_of_bounds() {
        assert!(range_i32("systolicBp", Some(50), 50, 250).is_ok());
        assert!(range_i32("systolicBp", Some(49), 50, 250).is_err());
        assert!(range_f64("temperature", Some(36.6), 30.0, 45.0).is_ok());
        assert!(range_f64("temperature", Some(46.0), 30.0, 45.0).is_err());
        assert!(positive_f64("weight", Some(0.0)).is_err());
        assert!(positive_f64("weight", None).is_ok());
    }
}
