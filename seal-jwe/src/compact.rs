//! Helpers for the five-segment compact form.

use base64ct::{Base64UrlUnpadded, Encoding};

use crate::error::{Error, Result};

/// Encode bytes as unpadded base64url.
pub(crate) fn b64_encode(data: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(data)
}

/// Decode unpadded base64url. Padded or non-url-safe input is rejected.
pub(crate) fn b64_decode(data: &str) -> Result<Vec<u8>> {
    Base64UrlUnpadded::decode_vec(data).map_err(|_| Error::InvalidParam("invalid base64url"))
}

/// Remove every ASCII whitespace character (SP, TAB, LF, VT, FF, CR) before
/// splitting a token. Whitespace is tolerated on input, never emitted.
pub(crate) fn strip_whitespace(token: &str) -> String {
    token
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r'))
        .collect()
}

/// Split a cleaned token into exactly five segments.
pub(crate) fn split(token: &str) -> Result<[&str; 5]> {
    let mut parts = token.split('.');
    let out = [
        parts.next().ok_or(Error::InvalidParam("expected five segments"))?,
        parts.next().ok_or(Error::InvalidParam("expected five segments"))?,
        parts.next().ok_or(Error::InvalidParam("expected five segments"))?,
        parts.next().ok_or(Error::InvalidParam("expected five segments"))?,
        parts.next().ok_or(Error::InvalidParam("expected five segments"))?,
    ];
    if parts.next().is_some() {
        return Err(Error::InvalidParam("expected five segments"));
    }
    Ok(out)
}

/// Join the five segments with `.` separators.
pub(crate) fn join(segments: [&str; 5]) -> String {
    segments.join(".")
}
