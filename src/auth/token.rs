use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde_json::{Map, Value};

use crate::error::TokenError;

/// Identity claims, in order of preference.
pub const IDENTITY_CLAIMS: [&str; 3] = ["sub", "user_id", "id"];

// Issuers disagree on padding, so accept both forms.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes the payload (middle segment) of a `header.payload.signature` token.
///
/// Only the shape is checked. Signature and expiry are left to the backend.
pub fn decode_payload(token: &str) -> Result<Map<String, Value>, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Malformed);
    }

    // An unsecured token may carry an empty signature.
    let (header, payload, signature) = (segments[0], segments[1], segments[2]);
    if header.is_empty() || payload.is_empty() {
        return Err(TokenError::Malformed);
    }
    if ![header, payload, signature].iter().all(|s| is_base64url(s)) {
        return Err(TokenError::Malformed);
    }

    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .map_err(|_| TokenError::Malformed)?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(claims)) => Ok(claims),
        _ => Err(TokenError::Malformed),
    }
}

/// Extracts the owner id from a token, trying `sub`, `user_id` and `id`.
///
/// Returns `Ok(None)` for a well-formed token that carries none of them.
pub fn owner_id_from_token(token: &str) -> Result<Option<String>, TokenError> {
    let claims = decode_payload(token)?;
    Ok(IDENTITY_CLAIMS
        .iter()
        .find_map(|claim| claims.get(*claim).and_then(identity_value)))
}

fn identity_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// base64url alphabet, with at most two trailing `=`.
fn is_base64url(segment: &str) -> bool {
    let body = segment.trim_end_matches('=');
    segment.len() - body.len() <= 2
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
