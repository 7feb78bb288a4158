use thiserror::Error;

/// Errors surfaced by the JWE pipeline.
///
/// Integrity failures of any kind collapse into [`Error::InvalidTag`]: the
/// variant carries no detail on purpose, so a caller (or an attacker reading
/// error strings) cannot tell which check rejected the token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Malformed input, missing required field, or a key of the wrong type or
    /// size for the requested algorithm. The operation did not consume or
    /// change state.
    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),

    /// The protected header could not be understood: not a JSON object, or
    /// an `alg`/`enc` value missing or outside the registry. Structural
    /// failures of the compact form itself (segment count, base64url) are
    /// [`Error::InvalidParam`].
    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),

    /// Authenticated decryption failed: an AEAD tag, HMAC tag, AES-KW
    /// integrity check or RSA decryption did not verify.
    #[error("tag verification failed")]
    InvalidTag,

    /// An underlying cryptographic primitive reported an internal error.
    /// Non-recoverable for this call.
    #[error("crypto backend failure: {0}")]
    Crypto(String),
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;
