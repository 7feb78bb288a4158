//! AES-GCM key wrap (A128GCMKW/A192GCMKW/A256GCMKW, RFC 7518 section 4.7).
//!
//! The CEK is sealed with AES-GCM under the shared key; the wrap IV and tag
//! travel as `iv` and `tag` header fields rather than in the compact
//! segments.

use rand_core::{OsRng, RngCore};
use seal_jwa::{EncryptionAlg, KeyMgmtAlg};
use seal_jwk::Jwk;
use zeroize::Zeroizing;

use super::symmetric;
use crate::compact::{b64_decode, b64_encode};
use crate::content::gcm;
use crate::error::{Error, Result};
use crate::header::Header;

const WRAP_IV_SIZE: usize = 12;
const WRAP_TAG_SIZE: usize = 16;

pub(crate) fn wrap(
    alg: KeyMgmtAlg,
    jwk: &Jwk,
    cek: &[u8],
    header: &mut Header,
) -> Result<Vec<u8>> {
    let key = expect_key(alg, jwk)?;

    // A caller may pin the wrap IV through the header; otherwise one is
    // drawn fresh and published there.
    let (iv, generated) = match header.get_str("iv") {
        Some(b64) => {
            let iv = b64_decode(b64)?;
            if iv.len() != WRAP_IV_SIZE {
                return Err(Error::InvalidParam("key wrap IV must be 96 bits"));
            }
            (iv, false)
        }
        None => {
            let mut iv = vec![0u8; WRAP_IV_SIZE];
            OsRng.fill_bytes(&mut iv);
            (iv, true)
        }
    };

    let sealed = gcm::encrypt(equivalent_enc(alg)?, key, &iv, b"", cek)?;

    if generated {
        header.set_str("iv", b64_encode(&iv));
    }
    header.set_str("tag", b64_encode(&sealed.tag));
    Ok(sealed.ciphertext)
}

pub(crate) fn unwrap(
    alg: KeyMgmtAlg,
    jwk: &Jwk,
    wrapped: &[u8],
    header: &Header,
) -> Result<Zeroizing<Vec<u8>>> {
    let key = expect_key(alg, jwk)?;

    let iv = b64_decode(
        header
            .get_str("iv")
            .ok_or(Error::InvalidParam("missing iv header"))?,
    )?;
    if iv.len() != WRAP_IV_SIZE {
        return Err(Error::InvalidParam("key wrap IV must be 96 bits"));
    }
    let tag = b64_decode(
        header
            .get_str("tag")
            .ok_or(Error::InvalidParam("missing tag header"))?,
    )?;
    if tag.len() != WRAP_TAG_SIZE {
        return Err(Error::InvalidParam("key wrap tag must be 128 bits"));
    }

    let cek = gcm::decrypt(equivalent_enc(alg)?, key, &iv, b"", wrapped, &tag)?;
    Ok(Zeroizing::new(cek))
}

fn expect_key<'a>(alg: KeyMgmtAlg, jwk: &'a Jwk) -> Result<&'a [u8]> {
    let key = symmetric(jwk)?;
    let want = alg
        .kek_size()
        .ok_or(Error::InvalidParam("not a key wrapping algorithm"))?;
    if key.len() != want {
        return Err(Error::InvalidParam("unexpected key wrap key size"));
    }
    Ok(key)
}

/// The key wrap runs the same AES-GCM construction as the matching content
/// encryption, with an empty AAD.
fn equivalent_enc(alg: KeyMgmtAlg) -> Result<EncryptionAlg> {
    Ok(match alg {
        KeyMgmtAlg::Aes128GcmKw => EncryptionAlg::Aes128Gcm,
        KeyMgmtAlg::Aes192GcmKw => EncryptionAlg::Aes192Gcm,
        KeyMgmtAlg::Aes256GcmKw => EncryptionAlg::Aes256Gcm,
        _ => return Err(Error::InvalidParam("not a GCM key wrap algorithm")),
    })
}
