//! RSA key transport: RSAES-PKCS1-v1_5 and RSAES-OAEP (SHA-1 and SHA-256).
//!
//! RSA1_5 exists for interop with legacy tokens only. On unwrap every
//! failure collapses to `InvalidTag` so padding problems are not
//! distinguishable from any other rejection.

use rand_core::OsRng;
use rsa::{BigUint, Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use seal_jwa::{EncryptionAlg, KeyMgmtAlg};
use seal_jwk::{Jwk, Rsa};
use sha1::Sha1;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

const MIN_MODULUS_BITS: usize = 2048;

pub(crate) fn wrap(alg: KeyMgmtAlg, jwk: &Jwk, cek: &[u8]) -> Result<Vec<u8>> {
    let public = public_from_jwk(jwk)?;
    match alg {
        KeyMgmtAlg::Rsa15 => public
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, cek)
            .map_err(|e| Error::Crypto(e.to_string())),
        KeyMgmtAlg::RsaOaep => public
            .encrypt(&mut OsRng, Oaep::new::<Sha1>(), cek)
            .map_err(|e| Error::Crypto(e.to_string())),
        KeyMgmtAlg::RsaOaep256 => public
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), cek)
            .map_err(|e| Error::Crypto(e.to_string())),
        _ => Err(Error::InvalidParam("not an RSA algorithm")),
    }
}

pub(crate) fn unwrap(
    alg: KeyMgmtAlg,
    jwk: &Jwk,
    wrapped: &[u8],
    enc: Option<EncryptionAlg>,
) -> Result<Zeroizing<Vec<u8>>> {
    let private = private_from_jwk(jwk)?;
    let cek = match alg {
        KeyMgmtAlg::Rsa15 => private
            .decrypt(Pkcs1v15Encrypt, wrapped)
            .map_err(|_| Error::InvalidTag)?,
        KeyMgmtAlg::RsaOaep => private
            .decrypt(Oaep::new::<Sha1>(), wrapped)
            .map_err(|_| Error::InvalidTag)?,
        KeyMgmtAlg::RsaOaep256 => private
            .decrypt(Oaep::new::<Sha256>(), wrapped)
            .map_err(|_| Error::InvalidTag)?,
        _ => return Err(Error::InvalidParam("not an RSA algorithm")),
    };
    // A recovered key of the wrong size is treated exactly like a padding
    // failure; reporting it separately would leak decryption structure.
    if let Some(enc) = enc {
        if cek.len() != enc.cek_size() {
            return Err(Error::InvalidTag);
        }
    }
    Ok(Zeroizing::new(cek))
}

fn check_bits(rsa: &Rsa) -> Result<()> {
    if rsa.bits() < MIN_MODULUS_BITS {
        return Err(Error::InvalidParam("RSA modulus below 2048 bits"));
    }
    Ok(())
}

fn public_from_jwk(jwk: &Jwk) -> Result<RsaPublicKey> {
    let rsa = jwk
        .rsa_public()
        .ok_or(Error::InvalidParam("RSA key required"))?;
    check_bits(rsa)?;
    RsaPublicKey::new(
        BigUint::from_bytes_be(&rsa.n),
        BigUint::from_bytes_be(&rsa.e),
    )
    .map_err(|_| Error::InvalidParam("invalid RSA public key"))
}

fn private_from_jwk(jwk: &Jwk) -> Result<RsaPrivateKey> {
    let (rsa, d) = jwk
        .rsa_private()
        .ok_or(Error::InvalidParam("RSA private key required"))?;
    check_bits(rsa)?;
    // When the JWK carries only n/e/d the primes are recovered from them.
    let primes = match (&rsa.p, &rsa.q) {
        (Some(p), Some(q)) => vec![
            BigUint::from_bytes_be(p),
            BigUint::from_bytes_be(q),
        ],
        _ => Vec::new(),
    };
    RsaPrivateKey::from_components(
        BigUint::from_bytes_be(&rsa.n),
        BigUint::from_bytes_be(&rsa.e),
        BigUint::from_bytes_be(d),
        primes,
    )
    .map_err(|_| Error::InvalidParam("invalid RSA private key"))
}
