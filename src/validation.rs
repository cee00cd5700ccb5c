//! Validation for API profiles loaded from config files and CLI overrides
//!
//! Request inputs (user ids, phrases, audio) are deliberately not checked
//! here; the voice service is the authority on those.

use thiserror::Error;
use url::Url;

/// Smallest accepted request timeout
pub const TIMEOUT_MS_MIN: u64 = 1;
/// Largest accepted request timeout (10 minutes)
pub const TIMEOUT_MS_MAX: u64 = 600_000;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Validate a profile base URL (absolute http/https URL with a host)
pub fn validate_base_url(base_url: &str) -> Result<Url, ValidationError> {
    if base_url.trim().is_empty() {
        return Err(ValidationError::InvalidFormat(
            "Base URL cannot be empty".to_string(),
        ));
    }

    let parsed = Url::parse(base_url).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
    }

    if parsed.host_str().is_none() {
        return Err(ValidationError::InvalidUrl(format!(
            "'{}' has no host",
            base_url
        )));
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ValidationError::InvalidFormat(
            "Base URL must not carry a query or fragment".to_string(),
        ));
    }

    Ok(parsed)
}

/// Validate request timeout in milliseconds (1ms to 600000ms)
pub fn validate_timeout_ms(timeout_ms: u64) -> Result<u64, ValidationError> {
    if !(TIMEOUT_MS_MIN..=TIMEOUT_MS_MAX).contains(&timeout_ms) {
        return Err(ValidationError::InvalidRange(format!(
            "Timeout must be between {}ms and {}ms, got {}ms",
            TIMEOUT_MS_MIN, TIMEOUT_MS_MAX, timeout_ms
        )));
    }
    Ok(timeout_ms)
}
