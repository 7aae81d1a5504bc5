//! Click id generation and validation.
//!
//! Click ids are the join key between click and conversion events, so they
//! must be collision-resistant and safe to carry in URLs and cookies.

use base64::Engine as _;

/// Length of random bytes before base64 encoding (96 bits of entropy).
const CLICK_ID_BYTES: usize = 12;

/// Upper bound for caller-supplied click ids.
pub const MAX_CLICK_ID_LEN: usize = 64;

/// Generates a random click id.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing a 16-character id.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_click_id() -> String {
    let mut buffer = [0u8; CLICK_ID_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Checks a caller-supplied click id.
///
/// Accepts 1 to [`MAX_CLICK_ID_LEN`] characters from the URL-safe alphabet
/// (`A-Z a-z 0-9 - _`).
pub fn is_valid_click_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_CLICK_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
