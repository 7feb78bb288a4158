// SPDX-License-Identifier: Apache-2.0 OR MIT

#![doc = include_str!("../README.md")]
#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
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

use core::fmt;

use serde::{Deserialize, Serialize};

/// Key management algorithms, as defined in [RFC7518] section 4.1. Used for
/// the JWE `alg` parameter.
///
/// [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyMgmtAlg {
    /// RSAES-PKCS1-v1_5 (Recommended-)
    #[serde(rename = "RSA1_5")]
    Rsa15,

    /// RSAES OAEP using default parameters (Recommended+)
    #[serde(rename = "RSA-OAEP")]
    RsaOaep,

    /// RSAES OAEP using SHA-256 and MGF1 with SHA-256 (Optional)
    #[serde(rename = "RSA-OAEP-256")]
    RsaOaep256,

    /// AES Key Wrap with default initial value using 128-bit key (Recommended)
    #[serde(rename = "A128KW")]
    Aes128Kw,

    /// AES Key Wrap with default initial value using 192-bit key (Optional)
    #[serde(rename = "A192KW")]
    Aes192Kw,

    /// AES Key Wrap with default initial value using 256-bit key (Recommended)
    #[serde(rename = "A256KW")]
    Aes256Kw,

    /// Direct use of a shared symmetric key as the CEK (Recommended)
    #[serde(rename = "dir")]
    Dir,

    /// Elliptic Curve Diffie-Hellman Ephemeral Static key agreement using
    /// Concat KDF (Recommended+)
    #[serde(rename = "ECDH-ES")]
    EcdhEs,

    /// ECDH-ES using Concat KDF and CEK wrapped with "A128KW" (Recommended)
    #[serde(rename = "ECDH-ES+A128KW")]
    EcdhEsA128Kw,

    /// ECDH-ES using Concat KDF and CEK wrapped with "A192KW" (Optional)
    #[serde(rename = "ECDH-ES+A192KW")]
    EcdhEsA192Kw,

    /// ECDH-ES using Concat KDF and CEK wrapped with "A256KW" (Recommended)
    #[serde(rename = "ECDH-ES+A256KW")]
    EcdhEsA256Kw,

    /// Key wrapping with AES GCM using 128-bit key (Optional)
    #[serde(rename = "A128GCMKW")]
    Aes128GcmKw,

    /// Key wrapping with AES GCM using 192-bit key (Optional)
    #[serde(rename = "A192GCMKW")]
    Aes192GcmKw,

    /// Key wrapping with AES GCM using 256-bit key (Optional)
    #[serde(rename = "A256GCMKW")]
    Aes256GcmKw,

    /// PBES2 with HMAC SHA-256 and "A128KW" wrapping (Optional)
    #[serde(rename = "PBES2-HS256+A128KW")]
    Pbes2Hs256A128Kw,

    /// PBES2 with HMAC SHA-384 and "A192KW" wrapping (Optional)
    #[serde(rename = "PBES2-HS384+A192KW")]
    Pbes2Hs384A192Kw,

    /// PBES2 with HMAC SHA-512 and "A256KW" wrapping (Optional)
    #[serde(rename = "PBES2-HS512+A256KW")]
    Pbes2Hs512A256Kw,

    /// Reserved. Never selected automatically and refused by the key
    /// management dispatch in both directions.
    #[serde(rename = "none")]
    None,
}

impl KeyMgmtAlg {
    /// The RFC7518 name of this algorithm, as it appears in the `alg` header.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rsa15 => "RSA1_5",
            Self::RsaOaep => "RSA-OAEP",
            Self::RsaOaep256 => "RSA-OAEP-256",
            Self::Aes128Kw => "A128KW",
            Self::Aes192Kw => "A192KW",
            Self::Aes256Kw => "A256KW",
            Self::Dir => "dir",
            Self::EcdhEs => "ECDH-ES",
            Self::EcdhEsA128Kw => "ECDH-ES+A128KW",
            Self::EcdhEsA192Kw => "ECDH-ES+A192KW",
            Self::EcdhEsA256Kw => "ECDH-ES+A256KW",
            Self::Aes128GcmKw => "A128GCMKW",
            Self::Aes192GcmKw => "A192GCMKW",
            Self::Aes256GcmKw => "A256GCMKW",
            Self::Pbes2Hs256A128Kw => "PBES2-HS256+A128KW",
            Self::Pbes2Hs384A192Kw => "PBES2-HS384+A192KW",
            Self::Pbes2Hs512A256Kw => "PBES2-HS512+A256KW",
            Self::None => "none",
        }
    }

    /// Parse an `alg` header value. Returns `None` for names outside the
    /// registry.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "RSA1_5" => Self::Rsa15,
            "RSA-OAEP" => Self::RsaOaep,
            "RSA-OAEP-256" => Self::RsaOaep256,
            "A128KW" => Self::Aes128Kw,
            "A192KW" => Self::Aes192Kw,
            "A256KW" => Self::Aes256Kw,
            "dir" => Self::Dir,
            "ECDH-ES" => Self::EcdhEs,
            "ECDH-ES+A128KW" => Self::EcdhEsA128Kw,
            "ECDH-ES+A192KW" => Self::EcdhEsA192Kw,
            "ECDH-ES+A256KW" => Self::EcdhEsA256Kw,
            "A128GCMKW" => Self::Aes128GcmKw,
            "A192GCMKW" => Self::Aes192GcmKw,
            "A256GCMKW" => Self::Aes256GcmKw,
            "PBES2-HS256+A128KW" => Self::Pbes2Hs256A128Kw,
            "PBES2-HS384+A192KW" => Self::Pbes2Hs384A192Kw,
            "PBES2-HS512+A256KW" => Self::Pbes2Hs512A256Kw,
            "none" => Self::None,
            _ => return None,
        })
    }

    /// Size in bytes of the key-encryption key consumed by the AES-KW,
    /// AES-GCMKW, PBES2 and ECDH-ES+AKW families. `None` for algorithms that
    /// do not wrap through a fixed-size KEK.
    pub const fn kek_size(self) -> Option<usize> {
        match self {
            Self::Aes128Kw | Self::Aes128GcmKw | Self::Pbes2Hs256A128Kw | Self::EcdhEsA128Kw => {
                Some(16)
            }
            Self::Aes192Kw | Self::Aes192GcmKw | Self::Pbes2Hs384A192Kw | Self::EcdhEsA192Kw => {
                Some(24)
            }
            Self::Aes256Kw | Self::Aes256GcmKw | Self::Pbes2Hs512A256Kw | Self::EcdhEsA256Kw => {
                Some(32)
            }
            _ => None,
        }
    }

    /// Length in bytes of the Concat KDF output for the ECDH-ES family:
    /// the CEK size of `enc` for direct agreement, the wrapping KEK size
    /// for the `+A*KW` variants. `None` outside the family.
    pub const fn derived_key_size(self, enc: EncryptionAlg) -> Option<usize> {
        match self {
            Self::EcdhEs => Some(enc.cek_size()),
            Self::EcdhEsA128Kw | Self::EcdhEsA192Kw | Self::EcdhEsA256Kw => self.kek_size(),
            _ => None,
        }
    }

    /// Whether this algorithm is a member of the ECDH-ES family.
    pub const fn is_ecdh(self) -> bool {
        matches!(
            self,
            Self::EcdhEs | Self::EcdhEsA128Kw | Self::EcdhEsA192Kw | Self::EcdhEsA256Kw
        )
    }
}

impl fmt::Display for KeyMgmtAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Content encryption algorithms, as defined in [RFC7518] section 5.1. Used
/// for the JWE `enc` parameter.
///
/// [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionAlg {
    /// AES_128_CBC_HMAC_SHA_256 authenticated encryption algorithm, as
    /// defined in RFC7518 Section 5.2.3 (Required)
    #[serde(rename = "A128CBC-HS256")]
    Aes128CbcHs256,

    /// AES_192_CBC_HMAC_SHA_384 authenticated encryption algorithm, as
    /// defined in RFC7518 Section 5.2.4 (Optional)
    #[serde(rename = "A192CBC-HS384")]
    Aes192CbcHs384,

    /// AES_256_CBC_HMAC_SHA_512 authenticated encryption algorithm, as
    /// defined in RFC7518 Section 5.2.5 (Required)
    #[serde(rename = "A256CBC-HS512")]
    Aes256CbcHs512,

    /// AES GCM using 128-bit key (Recommended)
    #[serde(rename = "A128GCM")]
    Aes128Gcm,

    /// AES GCM using 192-bit key (Optional)
    #[serde(rename = "A192GCM")]
    Aes192Gcm,

    /// AES GCM using 256-bit key (Recommended)
    #[serde(rename = "A256GCM")]
    Aes256Gcm,
}

impl EncryptionAlg {
    /// The RFC7518 name of this algorithm, as it appears in the `enc` header.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aes128CbcHs256 => "A128CBC-HS256",
            Self::Aes192CbcHs384 => "A192CBC-HS384",
            Self::Aes256CbcHs512 => "A256CBC-HS512",
            Self::Aes128Gcm => "A128GCM",
            Self::Aes192Gcm => "A192GCM",
            Self::Aes256Gcm => "A256GCM",
        }
    }

    /// Parse an `enc` header value. Returns `None` for names outside the
    /// registry.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "A128CBC-HS256" => Self::Aes128CbcHs256,
            "A192CBC-HS384" => Self::Aes192CbcHs384,
            "A256CBC-HS512" => Self::Aes256CbcHs512,
            "A128GCM" => Self::Aes128Gcm,
            "A192GCM" => Self::Aes192Gcm,
            "A256GCM" => Self::Aes256Gcm,
            _ => return None,
        })
    }

    /// Required content encryption key size in bytes. The CBC composites use
    /// a double-length key, MAC half first.
    pub const fn cek_size(self) -> usize {
        match self {
            Self::Aes128Gcm => 16,
            Self::Aes192Gcm => 24,
            Self::Aes128CbcHs256 | Self::Aes256Gcm => 32,
            Self::Aes192CbcHs384 => 48,
            Self::Aes256CbcHs512 => 64,
        }
    }

    /// Required initialization vector size in bytes.
    pub const fn iv_size(self) -> usize {
        if self.is_cbc() {
            16
        } else {
            12
        }
    }

    /// Authentication tag size in bytes. GCM emits a full 16-byte tag; the
    /// CBC composites truncate the HMAC output to half.
    pub const fn tag_size(self) -> usize {
        match self {
            Self::Aes128CbcHs256 => 16,
            Self::Aes192CbcHs384 => 24,
            Self::Aes256CbcHs512 => 32,
            Self::Aes128Gcm | Self::Aes192Gcm | Self::Aes256Gcm => 16,
        }
    }

    /// Whether this algorithm is an AES-CBC + HMAC composite.
    pub const fn is_cbc(self) -> bool {
        matches!(
            self,
            Self::Aes128CbcHs256 | Self::Aes192CbcHs384 | Self::Aes256CbcHs512
        )
    }
}

impl fmt::Display for EncryptionAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Either kind of algorithm identifier. Used for the JWK `alg` parameter,
/// which may carry a value from either registry.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Algorithm {
    /// Algorithms for key management
    KeyManagement(KeyMgmtAlg),
    /// Algorithms for content encryption
    Encryption(EncryptionAlg),
}
