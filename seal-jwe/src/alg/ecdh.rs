//! ECDH-ES key agreement (RFC 7518 section 4.6, RFC 8037 section 3.2).
//!
//! An ephemeral key pair on the recipient's curve produces a shared secret
//! `Z`; the Concat KDF turns `Z` into either the CEK itself (`ECDH-ES`) or a
//! KEK for AES-KW (`ECDH-ES+A*KW`). The ephemeral public half travels as the
//! `epk` header field.
//!
//! NIST curves run through the `p256`/`p384`/`p521` arithmetic; X25519 and
//! X448 are straight Montgomery scalar multiplications.

use p256::elliptic_curve::generic_array::GenericArray;
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use rand_core::OsRng;
use seal_jwa::{EncryptionAlg, KeyMgmtAlg};
use seal_jwk::{B64Bytes, Ec, EcCurve, Jwk, Key, Okp, OkpCurve};
use zeroize::Zeroizing;

use super::{aeskw, KeyWrapOutcome};
use crate::compact::b64_decode;
use crate::error::{Error, Result};
use crate::header::Header;
use crate::kdf::concat_kdf;

pub(crate) fn wrap(
    alg: KeyMgmtAlg,
    enc: EncryptionAlg,
    jwk: &Jwk,
    ephemeral: Option<&Jwk>,
    cek: &[u8],
    header: &mut Header,
) -> Result<KeyWrapOutcome> {
    let (z, epk) = if let Some(recipient) = jwk.ec_public() {
        nist_agree(recipient, ephemeral)?
    } else if let Some(recipient) = jwk.okp_public() {
        okp_agree(recipient, ephemeral)?
    } else {
        return Err(Error::InvalidParam("EC or OKP public key required"));
    };

    let derived = derive(alg, enc, header, &z)?;

    let outcome = if alg == KeyMgmtAlg::EcdhEs {
        KeyWrapOutcome::Direct(derived)
    } else {
        KeyWrapOutcome::Wrapped(aeskw::wrap_with_kek(&derived, cek)?)
    };

    // The ephemeral public key is published stripped of any kid.
    let epk_value = serde_json::to_value(&epk).map_err(|e| Error::Crypto(e.to_string()))?;
    header.set_value("epk", epk_value);
    Ok(outcome)
}

pub(crate) fn unwrap(
    alg: KeyMgmtAlg,
    enc: EncryptionAlg,
    jwk: &Jwk,
    wrapped: &[u8],
    header: &Header,
) -> Result<Zeroizing<Vec<u8>>> {
    let epk_value = header
        .get_value("epk")
        .ok_or(Error::InvalidParam("missing epk header"))?;
    let epk: Jwk = serde_json::from_value(epk_value.clone())
        .map_err(|_| Error::InvalidParam("malformed epk header"))?;

    let z = if let Some(theirs) = epk.ec_public() {
        let (mine, _) = jwk
            .ec_private()
            .ok_or(Error::InvalidParam("EC private key required"))?;
        if mine.crv != theirs.crv {
            return Err(Error::InvalidParam("epk curve does not match key"));
        }
        match mine.crv {
            EcCurve::P256 => p256_shared(mine, theirs)?,
            EcCurve::P384 => p384_shared(mine, theirs)?,
            EcCurve::P521 => p521_shared(mine, theirs)?,
            _ => return Err(Error::InvalidParam("unsupported curve")),
        }
    } else if let Some(theirs) = epk.okp_public() {
        let (mine, d) = jwk
            .okp_private()
            .ok_or(Error::InvalidParam("OKP private key required"))?;
        if mine.crv != theirs.crv {
            return Err(Error::InvalidParam("epk curve does not match key"));
        }
        match mine.crv {
            OkpCurve::X25519 => x25519_shared(d, &theirs.x)?,
            OkpCurve::X448 => x448_shared(d, &theirs.x)?,
            _ => return Err(Error::InvalidParam("unsupported curve")),
        }
    } else {
        return Err(Error::InvalidParam("epk key type does not match key"));
    };

    let derived = derive(alg, enc, header, &z)?;

    if alg == KeyMgmtAlg::EcdhEs {
        Ok(derived)
    } else {
        aeskw::unwrap_with_kek(&derived, wrapped)
    }
}

/// Run the Concat KDF over `Z` with the header's PartyInfo fields. The
/// derived length comes from the registry table; the algorithm id is the
/// `enc` name for direct agreement and the `alg` name for the wrapping
/// variants.
fn derive(
    alg: KeyMgmtAlg,
    enc: EncryptionAlg,
    header: &Header,
    z: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let key_len = alg
        .derived_key_size(enc)
        .ok_or(Error::InvalidParam("not an ECDH-ES algorithm"))?;
    let alg_id = if alg == KeyMgmtAlg::EcdhEs {
        enc.name()
    } else {
        alg.name()
    };

    let apu = match header.get_str("apu") {
        Some(b64) => b64_decode(b64)?,
        None => Vec::new(),
    };
    let apv = match header.get_str("apv") {
        Some(b64) => b64_decode(b64)?,
        None => Vec::new(),
    };

    concat_kdf(z, alg_id, &apu, &apv, key_len)
}

fn nist_agree(recipient: &Ec, ephemeral: Option<&Jwk>) -> Result<(Zeroizing<Vec<u8>>, Jwk)> {
    let eph = match ephemeral {
        Some(jwk) => {
            let (ec, _) = jwk
                .ec_private()
                .ok_or(Error::InvalidParam("ephemeral EC private key required"))?;
            if ec.crv != recipient.crv {
                return Err(Error::InvalidParam("ephemeral key curve mismatch"));
            }
            Some(ec)
        }
        None => None,
    };
    match recipient.crv {
        EcCurve::P256 => p256_agree(recipient, eph),
        EcCurve::P384 => p384_agree(recipient, eph),
        EcCurve::P521 => p521_agree(recipient, eph),
        _ => Err(Error::InvalidParam("unsupported curve")),
    }
}

/// One set of curve glue per backing crate: JWK coordinates to a public
/// point, ephemeral generation or import, and the raw agreement.
macro_rules! nist_curve {
    ($curve_crate:ident, $curve:expr, $point:ident, $agree:ident, $shared:ident) => {
        fn $point(ec: &Ec) -> Result<$curve_crate::PublicKey> {
            let size = ec.crv.field_size();
            if ec.x.len() != size || ec.y.len() != size {
                return Err(Error::InvalidParam("EC coordinate length"));
            }
            let encoded = $curve_crate::EncodedPoint::from_affine_coordinates(
                GenericArray::from_slice(&ec.x),
                GenericArray::from_slice(&ec.y),
                false,
            );
            Option::from($curve_crate::PublicKey::from_encoded_point(&encoded))
                .ok_or(Error::InvalidParam("point not on curve"))
        }

        fn $agree(
            recipient: &Ec,
            ephemeral: Option<&Ec>,
        ) -> Result<(Zeroizing<Vec<u8>>, Jwk)> {
            let peer = $point(recipient)?;
            let secret = match ephemeral {
                Some(ec) => {
                    let d = ec
                        .d
                        .as_ref()
                        .ok_or(Error::InvalidParam("ephemeral private key required"))?;
                    $curve_crate::SecretKey::from_slice(d)
                        .map_err(|_| Error::InvalidParam("invalid ephemeral scalar"))?
                }
                None => $curve_crate::SecretKey::random(&mut OsRng),
            };
            let shared =
                $curve_crate::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
            let z = Zeroizing::new(shared.raw_secret_bytes().to_vec());

            let encoded = secret.public_key().to_encoded_point(false);
            let (x, y) = match (encoded.x(), encoded.y()) {
                (Some(x), Some(y)) => (x.to_vec(), y.to_vec()),
                _ => return Err(Error::Crypto("degenerate public point".into())),
            };
            let epk = Jwk::new(Key::Ec(Ec {
                crv: $curve,
                x: B64Bytes::from(x),
                y: B64Bytes::from(y),
                d: None,
            }));
            Ok((z, epk))
        }

        fn $shared(mine: &Ec, theirs: &Ec) -> Result<Zeroizing<Vec<u8>>> {
            let d = mine
                .d
                .as_ref()
                .ok_or(Error::InvalidParam("EC private key required"))?;
            let secret = $curve_crate::SecretKey::from_slice(d)
                .map_err(|_| Error::InvalidParam("invalid EC private scalar"))?;
            let peer = $point(theirs)?;
            let shared =
                $curve_crate::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
            Ok(Zeroizing::new(shared.raw_secret_bytes().to_vec()))
        }
    };
}

nist_curve!(p256, EcCurve::P256, p256_point, p256_agree, p256_shared);
nist_curve!(p384, EcCurve::P384, p384_point, p384_agree, p384_shared);
nist_curve!(p521, EcCurve::P521, p521_point, p521_agree, p521_shared);

fn okp_agree(recipient: &Okp, ephemeral: Option<&Jwk>) -> Result<(Zeroizing<Vec<u8>>, Jwk)> {
    let eph = match ephemeral {
        Some(jwk) => {
            let (okp, _) = jwk
                .okp_private()
                .ok_or(Error::InvalidParam("ephemeral OKP private key required"))?;
            if okp.crv != recipient.crv {
                return Err(Error::InvalidParam("ephemeral key curve mismatch"));
            }
            Some(okp)
        }
        None => None,
    };
    match recipient.crv {
        OkpCurve::X25519 => x25519_agree(recipient, eph),
        OkpCurve::X448 => x448_agree(recipient, eph),
        _ => Err(Error::InvalidParam("unsupported curve")),
    }
}

fn x25519_agree(recipient: &Okp, ephemeral: Option<&Okp>) -> Result<(Zeroizing<Vec<u8>>, Jwk)> {
    let peer = x25519_public(&recipient.x)?;
    let secret = match ephemeral {
        Some(okp) => {
            let d = okp
                .d
                .as_ref()
                .ok_or(Error::InvalidParam("ephemeral private key required"))?;
            x25519_secret(d)?
        }
        None => x25519_dalek::StaticSecret::random_from_rng(OsRng),
    };
    let public = x25519_dalek::PublicKey::from(&secret);
    let z = Zeroizing::new(secret.diffie_hellman(&peer).as_bytes().to_vec());
    let epk = Jwk::new(Key::Okp(Okp {
        crv: OkpCurve::X25519,
        x: B64Bytes::from(public.as_bytes().to_vec()),
        d: None,
    }));
    Ok((z, epk))
}

fn x25519_shared(d: &[u8], x: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let secret = x25519_secret(d)?;
    let peer = x25519_public(x)?;
    Ok(Zeroizing::new(
        secret.diffie_hellman(&peer).as_bytes().to_vec(),
    ))
}

fn x25519_secret(d: &[u8]) -> Result<x25519_dalek::StaticSecret> {
    let bytes: [u8; 32] = d
        .try_into()
        .map_err(|_| Error::InvalidParam("X25519 private key must be 32 bytes"))?;
    Ok(x25519_dalek::StaticSecret::from(bytes))
}

fn x25519_public(x: &[u8]) -> Result<x25519_dalek::PublicKey> {
    let bytes: [u8; 32] = x
        .try_into()
        .map_err(|_| Error::InvalidParam("X25519 public key must be 32 bytes"))?;
    Ok(x25519_dalek::PublicKey::from(bytes))
}

fn x448_agree(recipient: &Okp, ephemeral: Option<&Okp>) -> Result<(Zeroizing<Vec<u8>>, Jwk)> {
    let peer = x448_public(&recipient.x)?;
    let secret = match ephemeral {
        Some(okp) => {
            let d = okp
                .d
                .as_ref()
                .ok_or(Error::InvalidParam("ephemeral private key required"))?;
            x448_secret(d)?
        }
        None => x448::Secret::new(&mut rand_core05::OsRng),
    };
    let public = x448::PublicKey::from(&secret);
    let shared = secret
        .as_diffie_hellman(&peer)
        .ok_or(Error::Crypto("degenerate X448 agreement".into()))?;
    let z = Zeroizing::new(shared.as_bytes().to_vec());
    let epk = Jwk::new(Key::Okp(Okp {
        crv: OkpCurve::X448,
        x: B64Bytes::from(public.as_bytes().to_vec()),
        d: None,
    }));
    Ok((z, epk))
}

fn x448_shared(d: &[u8], x: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let secret = x448_secret(d)?;
    let peer = x448_public(x)?;
    let shared = secret
        .as_diffie_hellman(&peer)
        .ok_or(Error::Crypto("degenerate X448 agreement".into()))?;
    Ok(Zeroizing::new(shared.as_bytes().to_vec()))
}

fn x448_secret(d: &[u8]) -> Result<x448::Secret> {
    x448::Secret::from_bytes(d).ok_or(Error::InvalidParam("X448 private key must be 56 bytes"))
}

fn x448_public(x: &[u8]) -> Result<x448::PublicKey> {
    x448::PublicKey::from_bytes(x).ok_or(Error::InvalidParam("X448 public key must be 56 bytes"))
}
