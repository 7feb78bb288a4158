//! AES-GCM content encryption (RFC 7518 section 5.3).
//!
//! The whole CEK is the AES key, the tag is the native 16-byte GCM tag, and
//! the AAD is the ASCII form of the encoded protected header. These routines
//! also back the AES-GCM key wrap family, which runs the same construction
//! over the CEK with an empty AAD.

use aes::cipher::generic_array::typenum::U12;
use aes::cipher::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use seal_jwa::EncryptionAlg;

use super::Sealed;
use crate::error::{Error, Result};

/// The crate only aliases the 128 and 256 bit flavors.
type Aes192Gcm = AesGcm<aes::Aes192, U12>;

const GCM_IV_SIZE: usize = 12;
const GCM_TAG_SIZE: usize = 16;

pub(crate) fn encrypt(
    enc: EncryptionAlg,
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Sealed> {
    if iv.len() != GCM_IV_SIZE {
        return Err(Error::InvalidParam("GCM IV must be 96 bits"));
    }
    let mut joined = match enc {
        EncryptionAlg::Aes128Gcm => seal::<Aes128Gcm>(key, iv, aad, plaintext)?,
        EncryptionAlg::Aes192Gcm => seal::<Aes192Gcm>(key, iv, aad, plaintext)?,
        EncryptionAlg::Aes256Gcm => seal::<Aes256Gcm>(key, iv, aad, plaintext)?,
        _ => return Err(Error::InvalidParam("not a GCM algorithm")),
    };
    let tag = joined.split_off(joined.len() - GCM_TAG_SIZE);
    Ok(Sealed {
        ciphertext: joined,
        tag,
    })
}

pub(crate) fn decrypt(
    enc: EncryptionAlg,
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>> {
    if iv.len() != GCM_IV_SIZE {
        return Err(Error::InvalidParam("GCM IV must be 96 bits"));
    }
    if tag.len() != GCM_TAG_SIZE {
        return Err(Error::InvalidTag);
    }
    let mut joined = Vec::with_capacity(ciphertext.len() + tag.len());
    joined.extend_from_slice(ciphertext);
    joined.extend_from_slice(tag);
    match enc {
        EncryptionAlg::Aes128Gcm => open::<Aes128Gcm>(key, iv, aad, &joined),
        EncryptionAlg::Aes192Gcm => open::<Aes192Gcm>(key, iv, aad, &joined),
        EncryptionAlg::Aes256Gcm => open::<Aes256Gcm>(key, iv, aad, &joined),
        _ => Err(Error::InvalidParam("not a GCM algorithm")),
    }
}

fn seal<A>(key: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>
where
    A: Aead + KeyInit + aes_gcm::aead::AeadCore<NonceSize = U12>,
{
    let cipher = A::new_from_slice(key).map_err(|_| Error::InvalidParam("bad AES-GCM key size"))?;
    cipher
        .encrypt(
            GenericArray::from_slice(iv),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| Error::Crypto(e.to_string()))
}

fn open<A>(key: &[u8], iv: &[u8], aad: &[u8], joined: &[u8]) -> Result<Vec<u8>>
where
    A: Aead + KeyInit + aes_gcm::aead::AeadCore<NonceSize = U12>,
{
    let cipher = A::new_from_slice(key).map_err(|_| Error::InvalidParam("bad AES-GCM key size"))?;
    cipher
        .decrypt(GenericArray::from_slice(iv), Payload { msg: joined, aad })
        .map_err(|_| Error::InvalidTag)
}
