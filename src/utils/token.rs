//! Random token generation for sessions and CSRF secrets.

use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Length of random bytes before base64 encoding.
const TOKEN_LENGTH_BYTES: usize = 32;

/// Length of an encoded token (URL-safe base64, no padding).
pub const TOKEN_LENGTH: usize = 43;

/// Generates a cryptographically secure random token.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing a 43-character token.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_token() -> String {
    let mut buffer = [0u8; TOKEN_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Returns true if `token` has the shape produced by [`generate_token`].
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LENGTH
        && base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(token)
            .is_ok_and(|bytes| bytes.len() == TOKEN_LENGTH_BYTES)
}

/// Compares two tokens through their SHA-256 digests so the comparison time
/// does not depend on how many leading characters match.
pub fn tokens_match(a: &str, b: &str) -> bool {
    Sha256::digest(a.as_bytes()) == Sha256::digest(b.as_bytes())
}
