use serde::{Deserialize, Serialize};

use crate::b64::{B64Bytes, B64Secret};

/// Key material carried by a JWK, discriminated by the `kty` parameter.
///
/// Public and private halves share one struct per key type: the private
/// fields are optional, so the same model round-trips either form. The JWE
/// pipeline inspects which half is populated.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kty")]
pub enum Key {
    /// An elliptic curve key on a NIST curve
    #[serde(rename = "EC")]
    Ec(Ec),

    /// An RSA key
    #[serde(rename = "RSA")]
    Rsa(Rsa),

    /// A symmetric octet key
    #[serde(rename = "oct")]
    Oct(Oct),

    /// An octet key pair on a Montgomery curve (RFC8037)
    #[serde(rename = "OKP")]
    Okp(Okp),
}

/// An elliptic curve key on a NIST curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ec {
    /// DSS curve identifier
    pub crv: EcCurve,

    /// X coordinate of the curve point
    pub x: B64Bytes,

    /// Y coordinate of the curve point
    pub y: B64Bytes,

    /// Private scalar, present only for private keys
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub d: Option<B64Secret>,
}

/// An elliptic curve DSS identifier.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcCurve {
    /// P-256
    #[serde(rename = "P-256")]
    P256,

    /// P-384
    #[serde(rename = "P-384")]
    P384,

    /// P-521
    #[serde(rename = "P-521")]
    P521,
}

impl EcCurve {
    /// Size in bytes of a field element (and of each point coordinate).
    pub const fn field_size(self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }
}

/// An RSA key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rsa {
    /// RSA modulus
    pub n: B64Bytes,

    /// RSA public exponent
    pub e: B64Bytes,

    /// Private exponent
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub d: Option<B64Secret>,

    /// First prime factor
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub p: Option<B64Secret>,

    /// Second prime factor
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub q: Option<B64Secret>,

    /// First factor CRT exponent
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dp: Option<B64Secret>,

    /// Second factor CRT exponent
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dq: Option<B64Secret>,

    /// First CRT coefficient
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub qi: Option<B64Secret>,
}

impl Rsa {
    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.n.len() * 8
    }
}

/// A symmetric octet key. Also carries PBES2 passwords, which are octet keys
/// of arbitrary length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Oct {
    /// The raw key material
    pub k: B64Secret,
}

/// An octet key pair (RFC8037). Only the Diffie-Hellman curves are modeled;
/// the signature curves belong to the JWS side of the house.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Okp {
    /// Curve identifier
    pub crv: OkpCurve,

    /// Public key bytes
    pub x: B64Bytes,

    /// Private key bytes, present only for private keys
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub d: Option<B64Secret>,
}

/// An octet key pair curve identifier.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OkpCurve {
    /// X25519
    X25519,

    /// X448
    X448,
}

impl OkpCurve {
    /// Size in bytes of public and private keys on this curve.
    pub const fn key_size(self) -> usize {
        match self {
            Self::X25519 => 32,
            Self::X448 => 56,
        }
    }
}

impl From<Ec> for Key {
    fn from(key: Ec) -> Self {
        Self::Ec(key)
    }
}

impl From<Rsa> for Key {
    fn from(key: Rsa) -> Self {
        Self::Rsa(key)
    }
}

impl From<Oct> for Key {
    fn from(key: Oct) -> Self {
        Self::Oct(key)
    }
}

impl From<Okp> for Key {
    fn from(key: Okp) -> Self {
        Self::Okp(key)
    }
}
