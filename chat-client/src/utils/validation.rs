/// Validation utilities for user input

pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Validate email format
pub fn validate_email(email: &str) -> ValidationResult {
    if email.is_empty() {
        return ValidationResult::err("Email is required");
    }

    if !email.contains('@') {
        return ValidationResult::err("Invalid email format");
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return ValidationResult::err("Invalid email format");
    }

    if parts[0].is_empty() {
        return ValidationResult::err("Email username cannot be empty");
    }

    if parts[1].is_empty() || !parts[1].contains('.') {
        return ValidationResult::err("Invalid email domain");
    }

    ValidationResult::ok()
}

/// Validate a one-time passcode: exactly six digits
pub fn validate_otp(code: &str) -> ValidationResult {
    if code.is_empty() {
        return ValidationResult::err("Verification code is required");
    }

    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        return ValidationResult::err("Verification code must be 6 digits");
    }

    ValidationResult::ok()
}

/// Validate password strength
pub fn validate_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::err("Password is required");
    }

    if password.len() < 8 {
        return ValidationResult::err("Password must be at least 8 characters");
    }

    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("test@example.com").is_valid);
        assert!(validate_email("user@domain.co.uk").is_valid);
        assert!(!validate_email("").is_valid);
        assert!(!validate_email("invalid").is_valid);
        assert!(!validate_email("@example.com").is_valid);
        assert!(!validate_email("test@").is_valid);
    }

    #[test]
    fn test_otp_validation() {
        assert!(validate_otp("123456").is_valid);
        assert!(!validate_otp("").is_valid);
        assert!(!validate_otp("12345").is_valid);
        assert!(!validate_otp("1234567").is_valid);
        assert!(!validate_otp("12a456").is_valid);
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("SecurePass123").is_valid);
        assert!(!validate_password("short").is_valid);
        assert!(!validate_password("").is_valid);
    }
}
