#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

mod b64;
mod key;

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use seal_jwa::Algorithm;
use serde::{Deserialize, Serialize};

pub use b64::{B64Bytes, B64Secret};
pub use key::{Ec, EcCurve, Key, Oct, Okp, OkpCurve, Rsa};

extern crate alloc;

/// Strongly typed JWK
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Jwk {
    /// The key itself. This field carries the important material; the
    /// remaining top-level fields are metadata.
    #[serde(flatten)]
    pub key: Key,

    /// Metadata parameters attached to the key
    #[serde(flatten)]
    pub params: Parameters,
}

impl Jwk {
    /// Create a new JWK from a key, using default parameters
    pub fn new(key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            params: Default::default(),
        }
    }

    /// The key identifier, if one is attached.
    pub fn kid(&self) -> Option<&str> {
        self.params.kid.as_deref()
    }

    /// Raw symmetric key material, for `oct` keys only.
    pub fn symmetric_key(&self) -> Option<&[u8]> {
        match &self.key {
            Key::Oct(oct) => Some(&oct.k),
            _ => None,
        }
    }

    /// The RSA material, for `RSA` keys. Private keys expose their public
    /// half through this as well.
    pub fn rsa_public(&self) -> Option<&Rsa> {
        match &self.key {
            Key::Rsa(rsa) => Some(rsa),
            _ => None,
        }
    }

    /// The RSA material plus the private exponent bytes, for `RSA` keys
    /// that carry one.
    pub fn rsa_private(&self) -> Option<(&Rsa, &[u8])> {
        match &self.key {
            Key::Rsa(rsa) => rsa.d.as_ref().map(|d| (rsa, &**d)),
            _ => None,
        }
    }

    /// The elliptic curve point, for `EC` keys.
    pub fn ec_public(&self) -> Option<&Ec> {
        match &self.key {
            Key::Ec(ec) => Some(ec),
            _ => None,
        }
    }

    /// The elliptic curve point plus the private scalar bytes, for `EC`
    /// keys that carry one.
    pub fn ec_private(&self) -> Option<(&Ec, &[u8])> {
        match &self.key {
            Key::Ec(ec) => ec.d.as_ref().map(|d| (ec, &**d)),
            _ => None,
        }
    }

    /// The octet key pair, for `OKP` keys.
    pub fn okp_public(&self) -> Option<&Okp> {
        match &self.key {
            Key::Okp(okp) => Some(okp),
            _ => None,
        }
    }

    /// The octet key pair plus the private key bytes, for `OKP` keys that
    /// carry one.
    pub fn okp_private(&self) -> Option<(&Okp, &[u8])> {
        match &self.key {
            Key::Okp(okp) => okp.d.as_ref().map(|d| (okp, &**d)),
            _ => None,
        }
    }
}

/// Metadata parameters of a JWK, defined in RFC7517 section 4.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// The algorithm intended for use with this key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alg: Option<Algorithm>,

    /// Identifier of this key
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kid: Option<String>,

    /// Intended use of this public key (named `use` in the rfc)
    #[serde(rename = "use")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub use_for: Option<UseFor>,

    /// Intended operations for this key; optional
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub key_ops: BTreeSet<Operations>,

    /// URL of an X.509 certificate for this key. Dereferencing is the
    /// caller's concern; the field is carried opaquely.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x5u: Option<String>,

    /// X.509 certificate chain, standard base64 DER. Carried opaquely.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x5c: Option<Vec<String>>,
}

/// Intended use of a key
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum UseFor {
    /// The key should be used for encryption
    #[serde(rename = "enc")]
    Encryption,
    /// The key should be used for signing
    #[serde(rename = "sig")]
    Signing,
}

/// Possible values for `key_ops`, specified in RFC7517 section 4.3.
// NOTE: Keep in lexicographical order for BTreeSet
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operations {
    /// Decrypt content and validate decryption, if applicable
    Decrypt,
    /// Derive bits not to be used as a key
    DeriveBits,
    /// Derive key
    DeriveKey,
    /// Encrypt key
    Encrypt,
    /// Compute digital signature or MAC
    Sign,
    /// Decrypt key and validate decryption, if applicable
    UnwrapKey,
    /// Verify digital signature or MAC
    Verify,
    /// Encrypt content
    WrapKey,
}

/// A set of JSON Web Keys.
///
/// This type is defined in [RFC7517 Section 5].
///
/// [RFC7517 Section 5]: https://datatracker.ietf.org/doc/html/rfc7517#section-5
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JwkSet {
    /// The keys in the set, in insertion order.
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// Look a key up by its `kid`.
    pub fn get(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid() == Some(kid))
    }

    /// The sole key of the set, if it holds exactly one.
    pub fn single(&self) -> Option<&Jwk> {
        match self.keys.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Append a key to the set.
    pub fn push(&mut self, key: Jwk) {
        self.keys.push(key);
    }

    /// Number of keys in the set.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
