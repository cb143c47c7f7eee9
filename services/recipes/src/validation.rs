//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err(BLANK.to_string());
    }

    if username.chars().count() > 150 {
        return Err("Ensure this field has no more than 150 characters.".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .to_string(),
        );
    }

    Ok(())
}

/// Validate email; an empty address is allowed
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Ok(());
    }

    if email.len() > 254 {
        return Err("Ensure this field has no more than 254 characters.".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Enter a valid email address.".to_string());
    }

    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err(BLANK.to_string());
    }

    if password.chars().count() < 8 {
        return Err("Ensure this field has at least 8 characters.".to_string());
    }

    if password.len() > 128 {
        return Err("Ensure this field has no more than 128 characters.".to_string());
    }

    Ok(())
}

/// Extra rule applied by the registration form on top of [`validate_password`]
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    validate_password(password)?;

    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err("This password is entirely numeric.".to_string());
    }

    Ok(())
}

/// Required, non-blank text of at most `max` characters
pub fn validate_text(value: &str, max: Option<usize>) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(BLANK.to_string());
    }

    validate_max_len(value, max)
}

/// Optional text of at most `max` characters
pub fn validate_max_len(value: &str, max: Option<usize>) -> Result<(), String> {
    match max {
        Some(max) if value.chars().count() > max => Err(format!(
            "Ensure this field has no more than {} characters.",
            max
        )),
        _ => Ok(()),
    }
}

/// Non-negative integer that fits the `INTEGER` columns
pub fn validate_non_negative(value: i64) -> Result<i32, String> {
    if value < 0 {
        return Err("Ensure this value is greater than or equal to 0.".to_string());
    }

    i32::try_from(value)
        .map_err(|_| format!("Ensure this value is less than or equal to {}.", i32::MAX))
}
