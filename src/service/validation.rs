//! Request validation for user input.

use crate::error::AppError;
use crate::model::{CreateUserInput, UserChanges};
use crate::password::MAX_PASSWORD_BYTES;
use regex::Regex;
use std::sync::OnceLock;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_NAME_LENGTH: usize = 100;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap_or_else(|e| panic!("email pattern: {e}"))
    })
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body. All fields are checked.
    pub fn validate_create(input: &CreateUserInput) -> Result<(), AppError> {
        validate_email("email", &input.email)?;
        validate_password("password", &input.password)?;
        if let Some(name) = &input.name {
            validate_name("name", name)?;
        }
        Ok(())
    }

    /// Validate only the fields that are being changed (PUT and PATCH).
    pub fn validate_partial(changes: &UserChanges) -> Result<(), AppError> {
        if let Some(email) = &changes.email {
            validate_email("email", email)?;
        }
        if let Some(Some(name)) = &changes.name {
            validate_name("name", name)?;
        }
        Ok(())
    }
}

fn validate_email(col: &str, v: &str) -> Result<(), AppError> {
    if v.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", col)));
    }
    if v.len() > MAX_EMAIL_LENGTH {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            col, MAX_EMAIL_LENGTH
        )));
    }
    if !email_regex().is_match(v) {
        return Err(AppError::Validation(format!("{} must be a valid email", col)));
    }
    Ok(())
}

fn validate_password(col: &str, v: &str) -> Result<(), AppError> {
    if v.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "{} must be at least {} characters",
            col, MIN_PASSWORD_LENGTH
        )));
    }
    if v.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::Validation(format!(
            "{} must be at most {} bytes",
            col, MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

fn validate_name(col: &str, v: &str) -> Result<(), AppError> {
    if v.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            col, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str, password: &str) -> CreateUserInput {
        CreateUserInput {
            email: email.into(),
            password: password.into(),
            name: None,
        }
    }

    #[test]
    fn accepts_well_formed_input() {
        assert!(RequestValidator::validate_create(&input("kim@example.com", "longenough")).is_ok());
    }

    #[test]
    fn rejects_bad_email_and_short_password() {
        for email in ["", "no-at-sign", "a@b", "two@@example.com"] {
            assert!(
                RequestValidator::validate_create(&input(email, "longenough")).is_err(),
                "{email:?}"
            );
        }
        let err = RequestValidator::validate_create(&input("kim@example.com", "short")).unwrap_err();
        assert_eq!(err.to_string(), "validation: password must be at least 8 characters");
        let err = RequestValidator::validate_create(&input("kim@example.com", &"p".repeat(73))).unwrap_err();
        assert_eq!(err.to_string(), "validation: password must be at most 72 bytes");
    }

    #[test]
    fn partial_only_checks_present_fields() {
        assert!(RequestValidator::validate_partial(&UserChanges::default()).is_ok());
        let clear_name = UserChanges {
            email: None,
            name: Some(None),
        };
        assert!(RequestValidator::validate_partial(&clear_name).is_ok());
        let long_name = UserChanges {
            email: None,
            name: Some(Some("x".repeat(MAX_NAME_LENGTH + 1))),
        };
        assert!(RequestValidator::validate_partial(&long_name).is_err());
    }
}
