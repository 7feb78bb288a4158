//! PBES2 password-based key wrap (RFC 7518 section 4.8).
//!
//! PBKDF2 with the matching HMAC hash derives a fixed-size KEK from the
//! password; the CEK is then wrapped with AES-KW. The salt input is
//! `alg_name || 0x00 || p2s`, which domain-separates derivations across the
//! three algorithm variants.

use pbkdf2::pbkdf2_hmac;
use rand_core::{OsRng, RngCore};
use seal_jwa::KeyMgmtAlg;
use seal_jwk::Jwk;
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use super::{aeskw, symmetric};
use crate::compact::{b64_decode, b64_encode};
use crate::error::{Error, Result};
use crate::header::Header;

/// Iteration count written on wrap when the header carries none.
const DEFAULT_ITERATIONS: u32 = 4096;

/// Fresh salt length on wrap. Unwrap accepts any salt of 8 bytes or more.
const SALT_SIZE: usize = 8;

const MIN_SALT_SIZE: usize = 8;

pub(crate) fn wrap(
    alg: KeyMgmtAlg,
    jwk: &Jwk,
    cek: &[u8],
    header: &mut Header,
) -> Result<Vec<u8>> {
    let password = symmetric(jwk)?;

    let (p2s, generated_salt) = match header.get_str("p2s") {
        Some(b64) => {
            let raw = b64_decode(b64)?;
            if raw.len() < MIN_SALT_SIZE {
                return Err(Error::InvalidParam("p2s salt shorter than 8 bytes"));
            }
            (raw, false)
        }
        None => {
            let mut raw = vec![0u8; SALT_SIZE];
            OsRng.fill_bytes(&mut raw);
            (raw, true)
        }
    };

    let (p2c, generated_count) = match header.get_i64("p2c") {
        Some(count) => (validate_count(count)?, false),
        None => (DEFAULT_ITERATIONS, true),
    };

    let kek = derive_kek(alg, password, &p2s, p2c)?;
    let wrapped = aeskw::wrap_with_kek(&kek, cek)?;

    if generated_salt {
        header.set_str("p2s", b64_encode(&p2s));
    }
    if generated_count {
        header.set_i64("p2c", i64::from(p2c));
    }
    Ok(wrapped)
}

pub(crate) fn unwrap(
    alg: KeyMgmtAlg,
    jwk: &Jwk,
    wrapped: &[u8],
    header: &Header,
) -> Result<Zeroizing<Vec<u8>>> {
    let password = symmetric(jwk)?;

    let p2c = validate_count(
        header
            .get_i64("p2c")
            .ok_or(Error::InvalidParam("missing p2c header"))?,
    )?;
    let p2s = b64_decode(
        header
            .get_str("p2s")
            .ok_or(Error::InvalidParam("missing p2s header"))?,
    )?;
    if p2s.len() < MIN_SALT_SIZE {
        return Err(Error::InvalidParam("p2s salt shorter than 8 bytes"));
    }

    let kek = derive_kek(alg, password, &p2s, p2c)?;
    aeskw::unwrap_with_kek(&kek, wrapped)
}

fn validate_count(count: i64) -> Result<u32> {
    if count < 1 {
        return Err(Error::InvalidParam("p2c must be a positive integer"));
    }
    u32::try_from(count).map_err(|_| Error::InvalidParam("p2c out of range"))
}

fn derive_kek(
    alg: KeyMgmtAlg,
    password: &[u8],
    p2s: &[u8],
    p2c: u32,
) -> Result<Zeroizing<Vec<u8>>> {
    let mut salt = Vec::with_capacity(alg.name().len() + 1 + p2s.len());
    salt.extend_from_slice(alg.name().as_bytes());
    salt.push(0);
    salt.extend_from_slice(p2s);

    let kek_len = alg
        .kek_size()
        .ok_or(Error::InvalidParam("not a PBES2 algorithm"))?;
    let mut kek = Zeroizing::new(vec![0u8; kek_len]);
    match alg {
        KeyMgmtAlg::Pbes2Hs256A128Kw => pbkdf2_hmac::<Sha256>(password, &salt, p2c, &mut kek),
        KeyMgmtAlg::Pbes2Hs384A192Kw => pbkdf2_hmac::<Sha384>(password, &salt, p2c, &mut kek),
        KeyMgmtAlg::Pbes2Hs512A256Kw => pbkdf2_hmac::<Sha512>(password, &salt, p2c, &mut kek),
        _ => return Err(Error::InvalidParam("not a PBES2 algorithm")),
    }
    Ok(kek)
}

#[cfg(test)]
mod tests {
    use seal_jwk::{B64Secret, Oct};

    use super::*;

    fn password() -> Jwk {
        Jwk::new(Oct {
            k: B64Secret::new(b"Thus from my lips, by yours, my sin is purged.".to_vec()),
        })
    }

    #[test]
    fn wrap_emits_salt_and_count() {
        let jwk = password();
        let mut header = Header::new();
        header.set_alg(KeyMgmtAlg::Pbes2Hs256A128Kw);
        let wrapped = wrap(KeyMgmtAlg::Pbes2Hs256A128Kw, &jwk, &[7u8; 32], &mut header).unwrap();
        assert_eq!(header.get_i64("p2c"), Some(4096));
        assert!(header.get_str("p2s").is_some());

        let cek = unwrap(KeyMgmtAlg::Pbes2Hs256A128Kw, &jwk, &wrapped, &header).unwrap();
        assert_eq!(&cek[..], [7u8; 32]);
    }

    #[test]
    fn each_variant_roundtrips() {
        for alg in [
            KeyMgmtAlg::Pbes2Hs256A128Kw,
            KeyMgmtAlg::Pbes2Hs384A192Kw,
            KeyMgmtAlg::Pbes2Hs512A256Kw,
        ] {
            let jwk = password();
            let mut header = Header::new();
            header.set_alg(alg);
            let wrapped = wrap(alg, &jwk, &[3u8; 48], &mut header).unwrap();
            let cek = unwrap(alg, &jwk, &wrapped, &header).unwrap();
            assert_eq!(&cek[..], [3u8; 48], "{alg}");
        }
    }

    #[test]
    fn wrong_password_fails_integrity() {
        let jwk = password();
        let mut header = Header::new();
        header.set_alg(KeyMgmtAlg::Pbes2Hs256A128Kw);
        let wrapped = wrap(KeyMgmtAlg::Pbes2Hs256A128Kw, &jwk, &[7u8; 32], &mut header).unwrap();

        let wrong = Jwk::new(Oct {
            k: B64Secret::new(b"wrong horse battery staple".to_vec()),
        });
        assert_eq!(
            unwrap(KeyMgmtAlg::Pbes2Hs256A128Kw, &wrong, &wrapped, &header),
            Err(Error::InvalidTag)
        );
    }

    #[test]
    fn short_salt_rejected() {
        let jwk = password();
        let mut header = Header::new();
        header.set_alg(KeyMgmtAlg::Pbes2Hs256A128Kw);
        header.set_str("p2s", b64_encode(&[1u8; 7]));
        assert!(matches!(
            wrap(KeyMgmtAlg::Pbes2Hs256A128Kw, &jwk, &[7u8; 32], &mut header),
            Err(Error::InvalidParam(_))
        ));

        let mut header = Header::new();
        header.set_str("p2s", b64_encode(&[1u8; 7]));
        header.set_i64("p2c", 100);
        assert!(matches!(
            unwrap(KeyMgmtAlg::Pbes2Hs256A128Kw, &jwk, &[0u8; 40], &header),
            Err(Error::InvalidParam(_))
        ));
    }

    #[test]
    fn nonpositive_count_rejected() {
        let jwk = password();
        let mut header = Header::new();
        header.set_i64("p2c", 0);
        assert!(matches!(
            wrap(KeyMgmtAlg::Pbes2Hs256A128Kw, &jwk, &[7u8; 32], &mut header),
            Err(Error::InvalidParam(_))
        ));
    }
}
