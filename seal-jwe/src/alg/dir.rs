//! Direct encryption (`alg: "dir"`): the shared symmetric key is the CEK.

use seal_jwa::EncryptionAlg;
use seal_jwk::Jwk;
use zeroize::Zeroizing;

use super::{symmetric, KeyWrapOutcome};
use crate::error::{Error, Result};

pub(crate) fn wrap(jwk: &Jwk, enc: EncryptionAlg) -> Result<KeyWrapOutcome> {
    Ok(KeyWrapOutcome::Direct(fetch(jwk, enc)?))
}

pub(crate) fn unwrap(jwk: &Jwk, enc: EncryptionAlg) -> Result<Zeroizing<Vec<u8>>> {
    fetch(jwk, enc)
}

fn fetch(jwk: &Jwk, enc: EncryptionAlg) -> Result<Zeroizing<Vec<u8>>> {
    let key = symmetric(jwk)?;
    if key.len() != enc.cek_size() {
        return Err(Error::InvalidParam("direct key length must match enc"));
    }
    Ok(Zeroizing::new(key.to_vec()))
}
