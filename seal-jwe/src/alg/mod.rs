//! Key management dispatch: one submodule per `alg` family.
//!
//! Each branch consumes a caller key and either wraps the context CEK into
//! an encrypted-key segment or replaces the CEK outright (direct modes).
//! Branches that emit header fields (`epk`, `iv`, `tag`, `p2s`, `p2c`) only
//! write them once every fallible step has succeeded, so a failed wrap
//! leaves the header as it found it.

pub(crate) mod aesgcmkw;
pub(crate) mod aeskw;
pub(crate) mod dir;
pub(crate) mod ecdh;
pub(crate) mod pbes2;
pub(crate) mod rsa;

use seal_jwk::Jwk;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// What a wrap branch produced.
pub(crate) enum KeyWrapOutcome {
    /// The branch determined the CEK itself (`dir`, `ECDH-ES`); the
    /// encrypted-key segment is empty.
    Direct(Zeroizing<Vec<u8>>),
    /// The context CEK was wrapped into these bytes.
    Wrapped(Vec<u8>),
}

/// Raw symmetric material of an `oct` key, or `InvalidParam`.
pub(crate) fn symmetric(jwk: &Jwk) -> Result<&[u8]> {
    jwk.symmetric_key()
        .ok_or(Error::InvalidParam("symmetric key required"))
}
