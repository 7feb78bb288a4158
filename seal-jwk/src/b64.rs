//! Base64url byte containers with serde support.
//!
//! JWK fields are raw octet strings carried as unpadded base64url text.
//! [`B64Bytes`] is the plain container; [`B64Secret`] additionally zeroizes
//! its contents on drop and compares in constant time.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Byte string serialized as unpadded base64url.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct B64Bytes(Vec<u8>);

impl B64Bytes {
    /// Wrap raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The base64url text form of the contained bytes.
    pub fn encode(&self) -> String {
        Base64UrlUnpadded::encode_string(&self.0)
    }
}

impl Deref for B64Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for B64Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for B64Bytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Debug for B64Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B64Bytes({})", self.encode())
    }
}

impl Serialize for B64Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for B64Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(deserializer.deserialize_str(B64Visitor)?))
    }
}

/// Secret byte string serialized as unpadded base64url.
///
/// Contents are zeroized on drop. Equality does not short-circuit.
#[derive(Clone, Default)]
pub struct B64Secret(Zeroizing<Vec<u8>>);

impl B64Secret {
    /// Wrap raw secret bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// The base64url text form of the contained bytes.
    pub fn encode(&self) -> String {
        Base64UrlUnpadded::encode_string(&self.0)
    }
}

impl Deref for B64Secret {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for B64Secret {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl PartialEq for B64Secret {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for B64Secret {}

impl fmt::Debug for B64Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B64Secret(...)")
    }
}

impl Serialize for B64Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for B64Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(Zeroizing::new(deserializer.deserialize_str(B64Visitor)?)))
    }
}

struct B64Visitor;

impl Visitor<'_> for B64Visitor {
    type Value = Vec<u8>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an unpadded base64url string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Base64UrlUnpadded::decode_vec(value)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}
