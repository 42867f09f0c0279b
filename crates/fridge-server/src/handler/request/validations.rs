//! Request validation utilities.

use validator::ValidationError;

/// Shortest accepted username.
pub const USERNAME_MIN_LENGTH: usize = 2;
/// Longest accepted username.
pub const USERNAME_MAX_LENGTH: usize = 64;
/// Longest accepted password.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Builds a [`ValidationError`] with the given code and a human-readable message.
pub fn validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_string().into());
    error
}

/// Checks that a username has an accepted length and no blank or control characters.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let length = username.chars().count();
    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
        return Err(validation_error(
            "username_length",
            &format!(
                "Username must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters long"
            ),
        ));
    }

    if username.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(validation_error(
            "username_invalid_chars",
            "Username cannot contain spaces or control characters",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_usernames() {
        assert!(validate_username("fridge_owner").is_ok());
        assert!(validate_username("u-1").is_ok());
        assert!(validate_username("ÅsaÖberg").is_ok());
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(validate_username("a").is_err());
        assert!(validate_username("u1").is_ok());
        assert!(validate_username(&"a".repeat(65)).is_err());
        assert!(validate_username(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn rejects_blank_characters() {
        let error = validate_username("fridge owner").err();
        assert_eq!(
            error.map(|e| e.code.into_owned()),
            Some("username_invalid_chars".to_owned())
        );
        assert!(validate_username("tab\tname").is_err());
    }
}
