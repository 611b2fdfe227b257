//! Account field rules shared by registration and login.

pub const MIN_USERNAME_LENGTH: u64 = 3;
pub const MAX_USERNAME_LENGTH: u64 = 50;

pub const MAX_EMAIL_LENGTH: u64 = 100;

pub const MIN_PASSWORD_LENGTH: u64 = 6;
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Returned for both unknown emails and wrong passwords so a caller cannot
/// tell which one failed.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Canonical form of an email address: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
