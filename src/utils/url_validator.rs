//! Long-URL validation.
//!
//! Checks a submitted long URL before it is stored. The URL is trimmed but
//! otherwise kept byte-for-byte, since deduplication is an exact match on the
//! stored string.

use url::Url;

/// Upper bound on the stored long URL, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a long URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} bytes")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must contain a host")]
    MissingHost,
}

/// Validates `input` and returns the trimmed URL to store.
///
/// # Errors
///
/// Returns a [`UrlValidationError`] describing the first failed check.
///
/// # Examples
///
/// ```
/// use tinyurl::utils::url_validator::validate_long_url;
///
/// assert_eq!(
///     validate_long_url("  https://example.com/Path?q=1  ").unwrap(),
///     "https://example.com/Path?q=1"
/// );
/// assert!(validate_long_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_long_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
