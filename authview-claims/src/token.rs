//! Unverified JWT payload decoding, for display only.
//!
//! Nothing in this module checks a signature, an issuer, an audience or an
//! expiry. A decoded payload says what a token *claims*, not what is true,
//! and must never be used to make an authentication or authorization decision.

use base64::alphabet;
use base64::engine::general_purpose::GeneralPurposeConfig;
use base64::engine::{DecodePaddingMode, GeneralPurpose};
use base64::Engine;
use serde_json::{Map, Value};

/// A decoded claims mapping, in the order the token lists them.
pub type Claims = Map<String, Value>;

/// base64url that accepts both padded and unpadded input. Payloads are first
/// passed through [`normalize_payload`], so standard-alphabet input decodes too.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Why a token payload could not be decoded.
#[derive(Debug)]
pub enum DecodeError {
    /// The token has no second `.`-separated segment.
    MissingPayload,
    /// The payload segment is not valid base64url.
    Base64(base64::DecodeError),
    /// The payload is not valid UTF-8 JSON.
    Json(serde_json::Error),
    /// The payload is valid JSON but not an object.
    NotAnObject,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::MissingPayload => write!(f, "token has no payload segment"),
            DecodeError::Base64(e) => write!(f, "payload is not base64url: {e}"),
            DecodeError::Json(e) => write!(f, "payload is not JSON: {e}"),
            DecodeError::NotAnObject => write!(f, "payload is not a JSON object"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Base64(e) => Some(e),
            DecodeError::Json(e) => Some(e),
            DecodeError::MissingPayload | DecodeError::NotAnObject => None,
        }
    }
}

/// Decode the payload (second segment) of a JWT **without verifying it**.
pub fn try_decode_unverified(token: &str) -> Result<Claims, DecodeError> {
    let payload = token.split('.').nth(1).ok_or(DecodeError::MissingPayload)?;
    let bytes = URL_SAFE_LENIENT
        .decode(normalize_payload(payload))
        .map_err(DecodeError::Base64)?;
    match serde_json::from_slice(&bytes).map_err(DecodeError::Json)? {
        Value::Object(claims) => Ok(claims),
        _ => Err(DecodeError::NotAnObject),
    }
}

/// Drop ASCII whitespace and map the standard alphabet onto the URL-safe one,
/// the same leniency browsers give `atob`.
fn normalize_payload(payload: &str) -> String {
    payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

/// Decode the payload of a JWT **without verifying it**, for display.
///
/// Any malformed token yields an empty mapping; the failure is logged at
/// `debug` and never reaches the caller.
pub fn decode_unverified(token: &str) -> Claims {
    try_decode_unverified(token).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "Could not decode token payload for display");
        Claims::new()
    })
}
