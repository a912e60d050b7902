//! Bearer token payload decoding.
//!
//! Tokens are `header.payload.signature`. Only the payload is read and
//! nothing is verified: the claims are a display hint, the server re-checks
//! the token on every call.

use crate::error::{ErrorKind, Result};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Claims {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub role: String,
}

// A `null` claim reads as absent instead of failing the whole payload.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Extracts and base64-decodes the middle segment of a token.
///
/// Accepts the URL-safe alphabet that JWT issuers emit as well as the
/// standard one, with or without padding.
pub fn decode_payload(token: &str) -> Result<Vec<u8>> {
    let segment = token
        .split('.')
        .nth(1)
        .filter(|s| !s.is_empty())
        .ok_or(ErrorKind::ParseError("Token has no payload segment".to_string()))?;

    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    let base64 = base64_simd::STANDARD_NO_PAD;
    Ok(base64.decode_to_vec(normalized)?)
}

pub fn decode_claims(token: &str) -> Result<Claims> {
    let payload = decode_payload(token)?;
    Ok(serde_json::from_slice(&payload)?)
}

#[cfg(test)]
pub(crate) fn encode_for_test(payload: &str) -> String {
    let base64 = base64_simd::URL_SAFE_NO_PAD;
    format!(
        "eyJhbGciOiJIUzI1NiJ9.{}.c2lnbmF0dXJl",
        base64.encode_to_string(payload)
    )
}
