//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize },

    #[error("Username contains invalid character: '{0}'. Only alphanumeric characters, underscores, and hyphens are allowed")]
    InvalidUsernameCharacter(char),

    #[error("Password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },
}

impl UserValidationError {
    /// Name of the input field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::PasswordLength { .. } => "password",
            _ => "username",
        }
    }
}

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate a username: 3-50 characters of `[A-Za-z0-9_-]`
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    let len = username.chars().count();

    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(UserValidationError::UsernameLength {
            min: MIN_USERNAME_LENGTH,
            max: MAX_USERNAME_LENGTH,
        });
    }

    if let Some(c) = username
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '-')
    {
        return Err(UserValidationError::InvalidUsernameCharacter(c));
    }

    Ok(())
}

/// Validate a password length (8-128 bytes)
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&password.len()) {
        return Err(UserValidationError::PasswordLength {
            min: MIN_PASSWORD_LENGTH,
            max: MAX_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("boris").is_ok());
        assert!(validate_username("ivan_petrov").is_ok());
        assert!(validate_username("user-42").is_ok());
    }

    #[test]
    fn test_empty_username() {
        assert_eq!(validate_username(""), Err(UserValidationError::EmptyUsername));
    }

    #[test]
    fn test_username_length_bounds() {
        assert!(matches!(
            validate_username("ab"),
            Err(UserValidationError::UsernameLength { min: 3, max: 50 })
        ));
        assert!(validate_username(&"a".repeat(51)).is_err());
        assert!(validate_username(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn test_username_invalid_character() {
        let err = validate_username("boris@home").unwrap_err();
        assert_eq!(err, UserValidationError::InvalidUsernameCharacter('@'));
        assert_eq!(err.field(), "username");
    }

    #[test]
    fn test_password_bounds() {
        assert!(validate_password("boris_password").is_ok());

        let err = validate_password("short").unwrap_err();
        assert_eq!(err.field(), "password");
        assert!(validate_password(&"a".repeat(129)).is_err());
    }
}
