use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

pub const QUESTION_MIN_LENGTH: usize = 5;
pub const QUESTION_MAX_LENGTH: usize = 500;
pub const FACT_MAX_LENGTH: usize = 1000;
pub const USERNAME_MIN_LENGTH: usize = 2;
pub const USERNAME_MAX_LENGTH: usize = 50;
pub const PASSWORD_MIN_LENGTH: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

static USERNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_\s]+$").expect("username pattern is a valid regex")
});

/// A local input rule violation. The display text is shown to the user as-is.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Question must be at least {} characters long", QUESTION_MIN_LENGTH)]
    QuestionTooShort,
    #[error("Question must be no more than {} characters long", QUESTION_MAX_LENGTH)]
    QuestionTooLong,
    #[error("Fact cannot be empty")]
    FactEmpty,
    #[error("Fact too long. Maximum {} characters allowed.", FACT_MAX_LENGTH)]
    FactTooLong,
    #[error("Fact id is required")]
    FactIdRequired,
    #[error("Username is required")]
    UsernameRequired,
    #[error("Username must be at least {} characters long", USERNAME_MIN_LENGTH)]
    UsernameTooShort,
    #[error("Username must be no more than {} characters long", USERNAME_MAX_LENGTH)]
    UsernameTooLong,
    #[error("Username can only contain letters, numbers, spaces, and underscores")]
    UsernameInvalid,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least {} characters long", PASSWORD_MIN_LENGTH)]
    PasswordTooShort,
    #[error("Please confirm your password")]
    ConfirmationRequired,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    EmailInvalid,
}

/// Trim a chat question and check it against the accepted length range.
pub fn validate_question(raw: &str) -> Result<String, ValidationError> {
    let question = raw.trim();
    let length = question.chars().count();

    if length < QUESTION_MIN_LENGTH {
        return Err(ValidationError::QuestionTooShort);
    }
    if length > QUESTION_MAX_LENGTH {
        return Err(ValidationError::QuestionTooLong);
    }

    Ok(question.to_owned())
}

/// Trim a fact before submission. Blank input never leaves the client.
pub fn validate_fact(raw: &str) -> Result<String, ValidationError> {
    let fact = raw.trim();
    if fact.is_empty() {
        return Err(ValidationError::FactEmpty);
    }
    if fact.chars().count() > FACT_MAX_LENGTH {
        return Err(ValidationError::FactTooLong);
    }

    Ok(fact.to_owned())
}

pub fn validate_fact_id(raw: &str) -> Result<String, ValidationError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ValidationError::FactIdRequired);
    }

    Ok(id.to_owned())
}

pub fn validate_username(raw: &str) -> Result<String, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::UsernameRequired);
    }

    let username = raw.trim();
    let length = username.chars().count();
    if length < USERNAME_MIN_LENGTH {
        return Err(ValidationError::UsernameTooShort);
    }
    if length > USERNAME_MAX_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if !USERNAME_PATTERN.is_match(username) {
        return Err(ValidationError::UsernameInvalid);
    }

    Ok(username.to_owned())
}

/// Presence check used at login; the length rule only applies to new accounts.
pub fn validate_password_present(raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }

    Ok(())
}

pub fn validate_new_password(raw: &str) -> Result<(), ValidationError> {
    validate_password_present(raw)?;
    if raw.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

pub fn validate_password_confirmation(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if confirm.is_empty() {
        return Err(ValidationError::ConfirmationRequired);
    }
    if confirm != password {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(())
}

/// Normalize an email (trimmed, lower-cased) and check its shape.
pub fn validate_email(raw: &str) -> Result<String, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::EmailRequired);
    }

    let email = raw.trim().to_lowercase();
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(ValidationError::EmailInvalid);
    }

    Ok(email)
}
