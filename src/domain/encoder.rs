//! Base62 encoding of snowflake identifiers into short codes.
//!
//! Alphabet order is digits, then uppercase, then lowercase. Because the
//! mapping is a plain positional numeral system, distinct non-negative
//! identifiers always produce distinct codes.

use crate::error::AppError;
use serde_json::json;

/// Characters used for short codes, indexed by digit value.
pub const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u64 = BASE62_ALPHABET.len() as u64;

/// Longest code any `i64` can produce (`i64::MAX` encodes to 11 characters).
pub const MAX_CODE_LENGTH: usize = 11;

/// Encodes a non-negative identifier as a base62 short code.
///
/// Identifier `0` encodes to `"0"`, the same as any positional numeral system.
/// A literal division loop would return an empty string, which is not a
/// usable primary key or route segment.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if `id` is negative.
///
/// # Examples
///
/// ```
/// use tinyurl::domain::encoder::encode;
///
/// assert_eq!(encode(653436189499457547).unwrap(), "mGkAYBHPwp");
/// assert_eq!(encode(0).unwrap(), "0");
/// assert!(encode(-1).is_err());
/// ```
pub fn encode(id: i64) -> Result<String, AppError> {
    if id < 0 {
        return Err(AppError::bad_request(
            "Identifier must be non-negative",
            json!({ "id": id }),
        ));
    }

    if id == 0 {
        return Ok("0".to_string());
    }

    let mut value = id as u64;
    let mut digits = Vec::with_capacity(MAX_CODE_LENGTH);
    while value > 0 {
        digits.push(BASE62_ALPHABET[(value % BASE) as usize]);
        value /= BASE;
    }

    Ok(digits.iter().rev().map(|&b| b as char).collect())
}

/// Returns true if `code` could have been produced by [`encode`].
///
/// Used to reject obviously bogus codes before touching the cache or the store.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LENGTH
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
