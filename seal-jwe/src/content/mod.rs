//! Content encryption dispatch: one AEAD construction per `enc` family.

pub(crate) mod cbc_hmac;
pub(crate) mod gcm;

use seal_jwa::EncryptionAlg;

use crate::error::Result;

/// Output of an authenticated encryption: ciphertext and detached tag.
pub(crate) struct Sealed {
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

/// Encrypt `plaintext` under `key`/`iv`, authenticating `aad`.
pub(crate) fn encrypt(
    enc: EncryptionAlg,
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Sealed> {
    if enc.is_cbc() {
        cbc_hmac::encrypt(enc, key, iv, aad, plaintext)
    } else {
        gcm::encrypt(enc, key, iv, aad, plaintext)
    }
}

/// Verify `tag` and decrypt `ciphertext`. The tag check runs before any
/// result of the decryption becomes observable.
pub(crate) fn decrypt(
    enc: EncryptionAlg,
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>> {
    if enc.is_cbc() {
        cbc_hmac::decrypt(enc, key, iv, aad, ciphertext, tag)
    } else {
        gcm::decrypt(enc, key, iv, aad, ciphertext, tag)
    }
}

#[cfg(test)]
mod tests {
    use rand_core::{OsRng, RngCore};
    use seal_jwa::EncryptionAlg;

    use super::*;

    const ALL: [EncryptionAlg; 6] = [
        EncryptionAlg::Aes128CbcHs256,
        EncryptionAlg::Aes192CbcHs384,
        EncryptionAlg::Aes256CbcHs512,
        EncryptionAlg::Aes128Gcm,
        EncryptionAlg::Aes192Gcm,
        EncryptionAlg::Aes256Gcm,
    ];

    fn random(len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        OsRng.fill_bytes(&mut buf);
        buf
    }

    #[test]
    fn roundtrip_every_enc() {
        for enc in ALL {
            let key = random(enc.cek_size());
            let iv = random(enc.iv_size());
            let aad = b"eyJhbGciOiJkaXIifQ";
            let sealed = encrypt(enc, &key, &iv, aad, b"attack at dawn").unwrap();
            assert_eq!(sealed.tag.len(), enc.tag_size());
            let opened = decrypt(enc, &key, &iv, aad, &sealed.ciphertext, &sealed.tag).unwrap();
            assert_eq!(opened, b"attack at dawn");
        }
    }

    #[test]
    fn tampered_ciphertext_rejected() {
        for enc in ALL {
            let key = random(enc.cek_size());
            let iv = random(enc.iv_size());
            let mut sealed = encrypt(enc, &key, &iv, b"aad", b"payload").unwrap();
            sealed.ciphertext[0] ^= 1;
            let err = decrypt(enc, &key, &iv, b"aad", &sealed.ciphertext, &sealed.tag);
            assert_eq!(err, Err(crate::Error::InvalidTag), "{enc}");
        }
    }

    #[test]
    fn tampered_aad_rejected() {
        for enc in ALL {
            let key = random(enc.cek_size());
            let iv = random(enc.iv_size());
            let sealed = encrypt(enc, &key, &iv, b"aad", b"payload").unwrap();
            let err = decrypt(enc, &key, &iv, b"daa", &sealed.ciphertext, &sealed.tag);
            assert_eq!(err, Err(crate::Error::InvalidTag), "{enc}");
        }
    }

    #[test]
    fn empty_plaintext() {
        for enc in ALL {
            let key = random(enc.cek_size());
            let iv = random(enc.iv_size());
            let sealed = encrypt(enc, &key, &iv, b"aad", b"").unwrap();
            if enc.is_cbc() {
                // A full padding block is appended at the boundary.
                assert_eq!(sealed.ciphertext.len(), 16);
            } else {
                assert!(sealed.ciphertext.is_empty());
            }
            let opened = decrypt(enc, &key, &iv, b"aad", &sealed.ciphertext, &sealed.tag).unwrap();
            assert!(opened.is_empty());
        }
    }

    #[test]
    fn length_invariants() {
        for enc in ALL {
            let key = random(enc.cek_size());
            let iv = random(enc.iv_size());
            for len in [1usize, 15, 16, 17, 31, 32, 1000] {
                let pt = random(len);
                let sealed = encrypt(enc, &key, &iv, b"", &pt).unwrap();
                if enc.is_cbc() {
                    assert_eq!(sealed.ciphertext.len() % 16, 0);
                    assert!(sealed.ciphertext.len() > pt.len());
                } else {
                    assert_eq!(sealed.ciphertext.len(), pt.len());
                }
            }
        }
    }

    #[test]
    fn wrong_key_size_rejected() {
        let err = encrypt(
            EncryptionAlg::Aes128Gcm,
            &[0u8; 17],
            &[0u8; 12],
            b"",
            b"hi",
        );
        assert!(err.is_err());
        let err = encrypt(
            EncryptionAlg::Aes128CbcHs256,
            &[0u8; 31],
            &[0u8; 16],
            b"",
            b"hi",
        );
        assert!(err.is_err());
    }
}
