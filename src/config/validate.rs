//! Input validation for operator identity and runtime versions.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{RigupError, Result};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").unwrap());

/// Accepts `local@domain.tld` shaped addresses.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate and normalize an email address.
pub fn validate_email(email: &str) -> Result<String> {
    let email = email.trim();
    if is_valid_email(email) {
        Ok(email.to_string())
    } else {
        Err(RigupError::InvalidEmail {
            email: email.to_string(),
        })
    }
}

/// Validate and normalize a display name.
pub fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        Err(RigupError::InvalidName)
    } else {
        Ok(name.to_string())
    }
}

/// Validate a `X.Y.Z` Python version.
pub fn validate_python_version(version: &str) -> Result<String> {
    let version = version.trim();
    if VERSION_REGEX.is_match(version) {
        Ok(version.to_string())
    } else {
        Err(RigupError::InvalidPythonVersion {
            version: version.to_string(),
        })
    }
}
