//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::url_validator::MAX_URL_LENGTH;

/// `MAX_URL_LENGTH` typed as the validator's length bound expects.
const MAX_URL_LENGTH_U64: u64 = MAX_URL_LENGTH as u64;

/// Request to shorten a long URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The URL to shorten. A missing field is reported as a validation error.
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_URL_LENGTH_U64, message = "longUrl must be 1 to 2048 bytes"))]
    #[validate(url(message = "Invalid URL format"))]
    pub long_url: String,
}

/// Short code for the submitted URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
}
