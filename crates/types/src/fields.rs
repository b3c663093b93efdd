//! Field validation rules for complainant and complaint data.
//!
//! These rules gate step transitions in the client workflow and are
//! re-checked by the creation services on the server. Inputs are trimmed
//! before checking; optional fields (`phone`, `address_line2`) are never
//! validated.

use crate::model::ComplainantInput;

/// Minimum complainant name length.
pub const NAME_MIN_CHARS: usize = 2;
/// Minimum first address line length.
pub const ADDRESS_LINE1_MIN_CHARS: usize = 5;
/// Minimum city length.
pub const CITY_MIN_CHARS: usize = 2;
/// Minimum postcode length.
pub const POSTCODE_MIN_CHARS: usize = 3;
/// Minimum complaint description length.
pub const DESCRIPTION_MIN_CHARS: usize = 20;
/// Maximum complaint description length.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// A validation failure scoped to a single field.
///
/// The field name matches the wire name of the offending field, so the
/// error can be surfaced inline at the form control that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn required(field: &'static str, label: &str) -> Self {
        Self {
            field,
            message: format!("{label} is required"),
        }
    }

    fn too_short(field: &'static str, label: &str, min: usize) -> Self {
        Self {
            field,
            message: format!("{label} must be at least {min} characters"),
        }
    }
}

fn check_min(
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
) -> Result<(), FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::required(field, label));
    }
    if trimmed.chars().count() < min {
        return Err(FieldError::too_short(field, label, min));
    }
    Ok(())
}

/// Validates the complainant name (≥ 2 characters).
pub fn validate_name(value: &str) -> Result<(), FieldError> {
    check_min("name", "Name", value, NAME_MIN_CHARS)
}

/// Validates the complainant email address.
///
/// The format check is deliberately conservative: one `@`, a non-empty
/// local part, a dotted domain, and no whitespace. Anything stricter
/// rejects legitimate addresses.
pub fn validate_email(value: &str) -> Result<(), FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::required("email", "Email"));
    }
    if !email_format_ok(trimmed) {
        return Err(FieldError {
            field: "email",
            message: "Email address is invalid".into(),
        });
    }
    Ok(())
}

fn email_format_ok(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let Some(domain) = parts.next() else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Validates the first address line (≥ 5 characters).
pub fn validate_address_line1(value: &str) -> Result<(), FieldError> {
    check_min(
        "address_line1",
        "Address line 1",
        value,
        ADDRESS_LINE1_MIN_CHARS,
    )
}

/// Validates the city (≥ 2 characters).
pub fn validate_city(value: &str) -> Result<(), FieldError> {
    check_min("city", "City", value, CITY_MIN_CHARS)
}

/// Validates the postcode (≥ 3 characters).
pub fn validate_postcode(value: &str) -> Result<(), FieldError> {
    check_min("postcode", "Postcode", value, POSTCODE_MIN_CHARS)
}

/// Validates the complaint description (20–1000 characters after trimming).
pub fn validate_description(value: &str) -> Result<(), FieldError> {
    let len = value.trim().chars().count();
    if !(DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&len) {
        return Err(FieldError {
            field: "description",
            message: format!(
                "Description must be between {DESCRIPTION_MIN_CHARS} and {DESCRIPTION_MAX_CHARS} characters"
            ),
        });
    }
    Ok(())
}

/// Runs all complainant field checks and collects every failure.
///
/// The client surfaces the full list inline; the server rejects with the
/// first failing field.
pub fn validate_complainant(input: &ComplainantInput) -> Vec<FieldError> {
    let checks = [
        validate_name(&input.name),
        validate_email(&input.email),
        validate_address_line1(&input.address_line1),
        validate_city(&input.city),
        validate_postcode(&input.postcode),
    ];
    checks.into_iter().filter_map(Result::err).collect()
}
