//! AES-CBC + HMAC composite content encryption (RFC 7518 section 5.2).
//!
//! The CEK is a double-length key: the leading half keys the HMAC, the
//! trailing half keys AES-CBC. The tag is the leading half of
//! `HMAC(mac_key, AAD || IV || ciphertext || AL)` where AL is the bit length
//! of the AAD as a 64-bit big-endian integer.

use aes::cipher::block_padding::{NoPadding, Pkcs7};
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use seal_jwa::EncryptionAlg;
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use super::Sealed;
use crate::error::{Error, Result};

const BLOCK_SIZE: usize = 16;

pub(crate) fn encrypt(
    enc: EncryptionAlg,
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Sealed> {
    let (mac_key, enc_key) = split_key(enc, key)?;
    check_iv(iv)?;

    let ciphertext = match enc {
        EncryptionAlg::Aes128CbcHs256 => cbc::Encryptor::<Aes128>::new_from_slices(enc_key, iv)
            .map_err(|_| Error::InvalidParam("bad AES-CBC key size"))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        EncryptionAlg::Aes192CbcHs384 => cbc::Encryptor::<Aes192>::new_from_slices(enc_key, iv)
            .map_err(|_| Error::InvalidParam("bad AES-CBC key size"))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        EncryptionAlg::Aes256CbcHs512 => cbc::Encryptor::<Aes256>::new_from_slices(enc_key, iv)
            .map_err(|_| Error::InvalidParam("bad AES-CBC key size"))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        _ => return Err(Error::InvalidParam("not a CBC algorithm")),
    };

    let tag = compute_tag(enc, mac_key, aad, iv, &ciphertext)?;
    Ok(Sealed { ciphertext, tag })
}

pub(crate) fn decrypt(
    enc: EncryptionAlg,
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>> {
    let (mac_key, enc_key) = split_key(enc, key)?;
    check_iv(iv)?;

    // MAC first. Nothing about the padding becomes observable for a token
    // that fails authentication.
    let expected = compute_tag(enc, mac_key, aad, iv, ciphertext)?;
    if !bool::from(expected.ct_eq(tag)) {
        return Err(Error::InvalidTag);
    }

    let mut plaintext = match enc {
        EncryptionAlg::Aes128CbcHs256 => cbc::Decryptor::<Aes128>::new_from_slices(enc_key, iv)
            .map_err(|_| Error::InvalidParam("bad AES-CBC key size"))?
            .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
            .map_err(|_| Error::InvalidParam("ciphertext not block aligned"))?,
        EncryptionAlg::Aes192CbcHs384 => cbc::Decryptor::<Aes192>::new_from_slices(enc_key, iv)
            .map_err(|_| Error::InvalidParam("bad AES-CBC key size"))?
            .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
            .map_err(|_| Error::InvalidParam("ciphertext not block aligned"))?,
        EncryptionAlg::Aes256CbcHs512 => cbc::Decryptor::<Aes256>::new_from_slices(enc_key, iv)
            .map_err(|_| Error::InvalidParam("bad AES-CBC key size"))?
            .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
            .map_err(|_| Error::InvalidParam("ciphertext not block aligned"))?,
        _ => return Err(Error::InvalidParam("not a CBC algorithm")),
    };

    strip_padding(&mut plaintext);
    Ok(plaintext)
}

/// MAC key is the leading half of the CEK, encryption key the trailing half.
fn split_key(enc: EncryptionAlg, key: &[u8]) -> Result<(&[u8], &[u8])> {
    if key.len() != enc.cek_size() {
        return Err(Error::InvalidParam("CEK length does not match enc"));
    }
    Ok(key.split_at(key.len() / 2))
}

fn check_iv(iv: &[u8]) -> Result<()> {
    if iv.len() != BLOCK_SIZE {
        return Err(Error::InvalidParam("CBC IV must be 128 bits"));
    }
    Ok(())
}

/// `HMAC(mac_key, AAD || IV || ciphertext || AL)`, truncated to half the
/// HMAC output.
fn compute_tag(
    enc: EncryptionAlg,
    mac_key: &[u8],
    aad: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let al = ((aad.len() as u64) * 8).to_be_bytes();
    let mut full = match enc {
        EncryptionAlg::Aes128CbcHs256 => {
            let mut mac = <Hmac<Sha256> as KeyInit>::new_from_slice(mac_key)
                .map_err(|e| Error::Crypto(e.to_string()))?;
            mac.update(aad);
            mac.update(iv);
            mac.update(ciphertext);
            mac.update(&al);
            mac.finalize().into_bytes().to_vec()
        }
        EncryptionAlg::Aes192CbcHs384 => {
            let mut mac = <Hmac<Sha384> as KeyInit>::new_from_slice(mac_key)
                .map_err(|e| Error::Crypto(e.to_string()))?;
            mac.update(aad);
            mac.update(iv);
            mac.update(ciphertext);
            mac.update(&al);
            mac.finalize().into_bytes().to_vec()
        }
        EncryptionAlg::Aes256CbcHs512 => {
            let mut mac = <Hmac<Sha512> as KeyInit>::new_from_slice(mac_key)
                .map_err(|e| Error::Crypto(e.to_string()))?;
            mac.update(aad);
            mac.update(iv);
            mac.update(ciphertext);
            mac.update(&al);
            mac.finalize().into_bytes().to_vec()
        }
        _ => return Err(Error::InvalidParam("not a CBC algorithm")),
    };
    full.truncate(enc.tag_size());
    Ok(full)
}

/// Lenient PKCS#7 strip: drop trailing pad bytes when the final byte names a
/// valid pad (1 through 16) and every trailing byte matches it; otherwise
/// leave the buffer untouched. Safe only because the MAC has already been
/// verified at this point.
fn strip_padding(plaintext: &mut Vec<u8>) {
    let Some(&pad) = plaintext.last() else {
        return;
    };
    let pad = pad as usize;
    if pad == 0 || pad > BLOCK_SIZE || pad > plaintext.len() {
        return;
    }
    if plaintext[plaintext.len() - pad..].iter().all(|&b| b == pad as u8) {
        plaintext.truncate(plaintext.len() - pad);
    }
}
