// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field-level input checks. Each returns the normalized value or a
//! `Validation` error naming the field.

use dialdesk_core::DialdeskError;

/// Trimmed, non-empty, at most `max_len` characters.
pub fn required_text(field: &str, value: &str, max_len: usize) -> Result<String, DialdeskError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DialdeskError::validation(field, "is required"));
    }
    bounded(field, trimmed, max_len)?;
    Ok(trimmed.to_string())
}

/// Like [`required_text`] but absent or blank input becomes `None`.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Result<Option<String>, DialdeskError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            bounded(field, trimmed, max_len)?;
            Ok(Some(trimmed.to_string()))
        }
    }
}

fn bounded(field: &str, value: &str, max_len: usize) -> Result<(), DialdeskError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(DialdeskError::validation(
            field,
            format!("is {len} characters long; the limit is {max_len}"),
        ));
    }
    Ok(())
}

/// `local@domain.tld` with no whitespace.
pub fn email(field: &str, value: &str) -> Result<String, DialdeskError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DialdeskError::validation(field, "is required"));
    }

    let invalid = || DialdeskError::validation(field, format!("`{trimmed}` is not an email address"));
    if trimmed.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = trimmed.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}

/// Digits plus `+ - ( ) .` and spaces, with at least one digit.
pub fn phone(field: &str, value: &str) -> Result<String, DialdeskError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DialdeskError::validation(field, "is required"));
    }
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.');
    if !trimmed.chars().all(allowed) || !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return Err(DialdeskError::validation(
            field,
            format!("`{trimmed}` is not a phone number"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Unwrap a field the caller must supply.
pub fn present<T>(field: &str, value: Option<T>) -> Result<T, DialdeskError> {
    value.ok_or_else(|| DialdeskError::validation(field, "is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("name", "  Acme  ", 50).unwrap(), "Acme");
        assert!(required_text("name", "   ", 50).is_err());
        assert!(required_text("name", "abcdef", 5).is_err());
    }

    #[test]
    fn optional_text_treats_blank_as_absent() {
        assert_eq!(optional_text("notes", Some("  "), 10).unwrap(), None);
        assert_eq!(optional_text("notes", None, 10).unwrap(), None);
        assert_eq!(
            optional_text("notes", Some(" ok "), 10).unwrap().as_deref(),
            Some("ok")
        );
    }

    #[test]
    fn email_shapes() {
        assert!(email("email", "contact@acme.com").is_ok());
        assert!(email("email", "ceo@wayne.co.uk").is_ok());
        for bad in ["", "acme.com", "@acme.com", "a@acme", "a@b@c.com", "a b@c.com", "a@.com"] {
            assert!(email("email", bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn phone_shapes() {
        assert!(phone("phone", "+1 (555) 123-4567").is_ok());
        assert!(phone("phone", "555.0100").is_ok());
        assert!(phone("phone", "call me").is_err());
        assert!(phone("phone", "()-").is_err());
    }

    #[test]
    fn errors_name_the_field() {
        match email("email", "nope").unwrap_err() {
            DialdeskError::Validation { field, .. } => assert_eq!(field, "email"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
