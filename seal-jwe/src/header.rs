//! The mutable protected header and its cached wire encoding.

use seal_jwa::{EncryptionAlg, KeyMgmtAlg};
use serde_json::{Map, Value};

use crate::compact::b64_encode;
use crate::error::{Error, Result};

/// The JWE protected header: a JSON object with typed accessors and a cached
/// base64url encoding of its compact serialization.
///
/// The encoded form is the AAD of the content encryption step, so its exact
/// bytes matter. Every mutation drops the cache; [`Header::encode`]
/// recomputes it on demand, and parsing installs the wire-exact form so a
/// re-encoded token round-trips bit for bit.
#[derive(Clone, Debug, Default)]
pub struct Header {
    map: Map<String, Value>,
    b64: Option<String>,
}

impl Header {
    /// Create an empty header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a header from parsed wire data, keeping the exact base64url
    /// text that produced it.
    pub(crate) fn from_wire(map: Map<String, Value>, b64: String) -> Self {
        Self {
            map,
            b64: Some(b64),
        }
    }

    /// A string field, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(Value::as_str)
    }

    /// An integer field, if present and an integer.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.map.get(key).and_then(Value::as_i64)
    }

    /// Any field as raw JSON.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Set a string field.
    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.b64 = None;
        self.map.insert(key.into(), Value::String(value.into()));
    }

    /// Set an integer field.
    pub fn set_i64(&mut self, key: &str, value: i64) {
        self.b64 = None;
        self.map.insert(key.into(), Value::from(value));
    }

    /// Set a field to an arbitrary JSON value.
    pub fn set_value(&mut self, key: &str, value: Value) {
        self.b64 = None;
        self.map.insert(key.into(), value);
    }

    /// Remove a field, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.b64 = None;
        self.map.remove(key)
    }

    /// The key management algorithm, when the `alg` field holds a registry
    /// name.
    pub fn alg(&self) -> Option<KeyMgmtAlg> {
        self.get_str("alg").and_then(KeyMgmtAlg::from_name)
    }

    /// Set the `alg` field.
    pub fn set_alg(&mut self, alg: KeyMgmtAlg) {
        self.set_str("alg", alg.name());
    }

    /// The content encryption algorithm, when the `enc` field holds a
    /// registry name.
    pub fn enc(&self) -> Option<EncryptionAlg> {
        self.get_str("enc").and_then(EncryptionAlg::from_name)
    }

    /// Set the `enc` field.
    pub fn set_enc(&mut self, enc: EncryptionAlg) {
        self.set_str("enc", enc.name());
    }

    /// Whether the header requests DEFLATE compression (`"zip": "DEF"`).
    pub fn zip_deflate(&self) -> bool {
        self.get_str("zip") == Some("DEF")
    }

    /// The cached encoding, if the header has not been mutated since it was
    /// last computed or parsed.
    pub fn encoded(&self) -> Option<&str> {
        self.b64.as_deref()
    }

    /// Base64url of the compact JSON serialization, computed and cached on
    /// first use after a mutation. Field order is insertion order.
    pub fn encode(&mut self) -> Result<&str> {
        if self.b64.is_none() {
            let json = serde_json::to_string(&self.map)
                .map_err(|e| Error::Crypto(e.to_string()))?;
            self.b64 = Some(b64_encode(json.as_bytes()));
        }
        // The cache was just filled.
        Ok(self.b64.as_deref().unwrap_or_default())
    }
}
