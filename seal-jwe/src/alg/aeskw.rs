//! AES Key Wrap (RFC 3394) for the A128KW/A192KW/A256KW family.
//!
//! The PBES2 and ECDH-ES+AKW branches reuse the `*_with_kek` entry points
//! with a derived KEK.

use aes::{Aes128, Aes192, Aes256};
use aes_kw::Kek;
use seal_jwa::KeyMgmtAlg;
use seal_jwk::Jwk;
use zeroize::Zeroizing;

use super::symmetric;
use crate::error::{Error, Result};

/// Longest encrypted key accepted on unwrap: a 64-byte CEK plus the 8-byte
/// integrity block.
const MAX_WRAPPED: usize = 72;

pub(crate) fn wrap(alg: KeyMgmtAlg, jwk: &Jwk, cek: &[u8]) -> Result<Vec<u8>> {
    wrap_with_kek(expect_kek(alg, jwk)?, cek)
}

pub(crate) fn unwrap(alg: KeyMgmtAlg, jwk: &Jwk, wrapped: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    unwrap_with_kek(expect_kek(alg, jwk)?, wrapped)
}

fn expect_kek<'a>(alg: KeyMgmtAlg, jwk: &'a Jwk) -> Result<&'a [u8]> {
    let kek = symmetric(jwk)?;
    let want = alg
        .kek_size()
        .ok_or(Error::InvalidParam("not a key wrapping algorithm"))?;
    if kek.len() != want {
        return Err(Error::InvalidParam("unexpected key wrap key size"));
    }
    Ok(kek)
}

pub(crate) fn wrap_with_kek(kek: &[u8], cek: &[u8]) -> Result<Vec<u8>> {
    if cek.len() < 16 || cek.len() % 8 != 0 {
        return Err(Error::InvalidParam(
            "key wrap input must be 8-byte aligned and at least 16 bytes",
        ));
    }
    let mut out = vec![0u8; cek.len() + 8];
    let res = match kek.len() {
        16 => Kek::<Aes128>::try_from(kek)
            .map_err(|_| Error::InvalidParam("bad KEK"))?
            .wrap(cek, &mut out),
        24 => Kek::<Aes192>::try_from(kek)
            .map_err(|_| Error::InvalidParam("bad KEK"))?
            .wrap(cek, &mut out),
        32 => Kek::<Aes256>::try_from(kek)
            .map_err(|_| Error::InvalidParam("bad KEK"))?
            .wrap(cek, &mut out),
        _ => return Err(Error::InvalidParam("KEK must be 128, 192 or 256 bits")),
    };
    res.map_err(|e| Error::Crypto(e.to_string()))?;
    Ok(out)
}

pub(crate) fn unwrap_with_kek(kek: &[u8], wrapped: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if wrapped.len() > MAX_WRAPPED {
        return Err(Error::InvalidParam("encrypted key too large"));
    }
    if wrapped.len() < 24 || wrapped.len() % 8 != 0 {
        return Err(Error::InvalidParam("encrypted key length"));
    }
    let mut out = Zeroizing::new(vec![0u8; wrapped.len() - 8]);
    let res = match kek.len() {
        16 => Kek::<Aes128>::try_from(kek)
            .map_err(|_| Error::InvalidParam("bad KEK"))?
            .unwrap(wrapped, &mut out),
        24 => Kek::<Aes192>::try_from(kek)
            .map_err(|_| Error::InvalidParam("bad KEK"))?
            .unwrap(wrapped, &mut out),
        32 => Kek::<Aes256>::try_from(kek)
            .map_err(|_| Error::InvalidParam("bad KEK"))?
            .unwrap(wrapped, &mut out),
        _ => return Err(Error::InvalidParam("KEK must be 128, 192 or 256 bits")),
    };
    // The trailer check failing is indistinguishable from any other
    // integrity failure.
    res.map_err(|_| Error::InvalidTag)?;
    Ok(out)
}
