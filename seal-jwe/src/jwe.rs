//! The JWE context: one token's worth of state, from payload to compact
//! form and back.

use rand_core::{OsRng, RngCore};
use seal_jwa::{EncryptionAlg, KeyMgmtAlg};
use seal_jwk::{Jwk, JwkSet};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use crate::alg::{self, KeyWrapOutcome};
use crate::compact::{b64_decode, b64_encode, join, split, strip_whitespace};
use crate::content;
use crate::error::{Error, Result};
use crate::header::Header;
use crate::zip;

/// Resolver injected by the caller to dereference `jku` headers. The library
/// performs no network access of its own.
pub trait JwkSetResolver {
    /// Fetch the key set referenced by a `jku` URL, if available.
    fn resolve(&self, url: &str) -> Option<JwkSet>;
}

/// A JSON Web Encryption context in compact serialization.
///
/// The context is a mutable workbench, mirroring the five wire segments
/// plus the cleartext side: protected header, content encryption key, IV,
/// payload, and the encoded output segments. [`Jwe::serialize`] drives the
/// encrypt pipeline end to end, [`Jwe::parse`] and [`Jwe::decrypt`] the
/// reverse.
///
/// A context is single-token, single-thread state. Distinct contexts are
/// independent; cloning takes a deep snapshot.
#[derive(Clone, Default)]
pub struct Jwe {
    header: Header,
    cek: Option<Zeroizing<Vec<u8>>>,
    iv: Vec<u8>,
    payload: Zeroizing<Vec<u8>>,
    encrypted_key_b64: Option<String>,
    iv_b64: Option<String>,
    ciphertext_b64: Option<String>,
    tag_b64: Option<String>,
    jwks_public: JwkSet,
    jwks_private: JwkSet,
}

impl Jwe {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// The protected header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Mutable access to the protected header. Any change invalidates the
    /// cached wire encoding.
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Set the `alg` header field.
    pub fn set_alg(&mut self, alg: KeyMgmtAlg) {
        self.header.set_alg(alg);
    }

    /// Set the `enc` header field.
    pub fn set_enc(&mut self, enc: EncryptionAlg) {
        self.header.set_enc(enc);
    }

    /// The cleartext payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Set the cleartext payload.
    pub fn set_payload(&mut self, payload: &[u8]) {
        self.payload = Zeroizing::new(payload.to_vec());
    }

    /// The content encryption key, if one is present.
    pub fn cek(&self) -> Option<&[u8]> {
        self.cek.as_deref().map(Vec::as_slice)
    }

    /// Install an explicit content encryption key. When `enc` is already
    /// set, the length must match it.
    pub fn set_cek(&mut self, cek: &[u8]) -> Result<()> {
        if let Some(enc) = self.header.enc() {
            if cek.len() != enc.cek_size() {
                return Err(Error::InvalidParam("CEK length does not match enc"));
            }
        }
        self.cek = Some(Zeroizing::new(cek.to_vec()));
        Ok(())
    }

    /// Draw a fresh random CEK of the size `enc` requires.
    pub fn generate_cek(&mut self) -> Result<()> {
        let enc = self.header.enc().ok_or(Error::InvalidParam("enc not set"))?;
        let mut cek = Zeroizing::new(vec![0u8; enc.cek_size()]);
        OsRng.fill_bytes(&mut cek);
        self.cek = Some(cek);
        Ok(())
    }

    /// The initialization vector, if one is present.
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// Install an explicit IV. When `enc` is already set, the length must
    /// match it.
    pub fn set_iv(&mut self, iv: &[u8]) -> Result<()> {
        if let Some(enc) = self.header.enc() {
            if iv.len() != enc.iv_size() {
                return Err(Error::InvalidParam("IV length does not match enc"));
            }
        }
        self.iv = iv.to_vec();
        Ok(())
    }

    /// Draw a fresh random IV of the size `enc` requires.
    pub fn generate_iv(&mut self) -> Result<()> {
        let enc = self.header.enc().ok_or(Error::InvalidParam("enc not set"))?;
        let mut iv = vec![0u8; enc.iv_size()];
        OsRng.fill_bytes(&mut iv);
        self.iv = iv;
        Ok(())
    }

    /// Attach keys used when no explicit key is passed to the encrypt and
    /// decrypt entry points.
    pub fn add_keys(&mut self, private: Option<&Jwk>, public: Option<&Jwk>) {
        if let Some(jwk) = private {
            self.jwks_private.push(jwk.clone());
        }
        if let Some(jwk) = public {
            self.jwks_public.push(jwk.clone());
        }
    }

    /// Merge whole key sets into the context.
    pub fn add_jwks(&mut self, private: Option<&JwkSet>, public: Option<&JwkSet>) {
        if let Some(set) = private {
            self.jwks_private.keys.extend(set.keys.iter().cloned());
        }
        if let Some(set) = public {
            self.jwks_public.keys.extend(set.keys.iter().cloned());
        }
    }

    /// Wrap (or directly establish) the CEK for the recipient, per the
    /// header's `alg`.
    ///
    /// With no explicit `jwk` the recipient key is looked up in the attached
    /// public set, by the header `kid` or as the set's sole entry. Branches
    /// that emit header fields finalize them here, before the header becomes
    /// AAD.
    pub fn encrypt_key(&mut self, jwk: Option<&Jwk>) -> Result<()> {
        let selected = match jwk {
            Some(jwk) => Some(jwk.clone()),
            None => self.select_key(true),
        };

        // A key that names its algorithm can supply a missing `alg`.
        if self.header.alg().is_none() {
            if let Some(seal_jwa::Algorithm::KeyManagement(alg)) =
                selected.as_ref().and_then(|k| k.params.alg)
            {
                if alg != KeyMgmtAlg::None {
                    self.header.set_alg(alg);
                }
            }
        }
        let alg = self.header.alg().ok_or(Error::InvalidParam("alg not set"))?;
        if alg == KeyMgmtAlg::None {
            return Err(Error::InvalidParam("alg none is not acceptable"));
        }
        let enc = self.header.enc();

        let cek = self
            .cek
            .clone()
            .ok_or(Error::InvalidParam("content encryption key not set"))?;

        if let Some(kid) = selected.as_ref().and_then(|k| k.params.kid.clone()) {
            if self.header.get_str("kid").is_none() {
                self.header.set_str("kid", kid);
            }
        }

        let need_key = || Error::InvalidParam("no key available");
        let outcome = match alg {
            KeyMgmtAlg::Dir => match &selected {
                Some(jwk) => {
                    alg::dir::wrap(jwk, enc.ok_or(Error::InvalidParam("enc not set"))?)?
                }
                // A pre-installed CEK serves as the direct key.
                None => KeyWrapOutcome::Direct(cek.clone()),
            },
            KeyMgmtAlg::Rsa15 | KeyMgmtAlg::RsaOaep | KeyMgmtAlg::RsaOaep256 => {
                let jwk = selected.as_ref().ok_or_else(need_key)?;
                KeyWrapOutcome::Wrapped(alg::rsa::wrap(alg, jwk, &cek)?)
            }
            KeyMgmtAlg::Aes128Kw | KeyMgmtAlg::Aes192Kw | KeyMgmtAlg::Aes256Kw => {
                let jwk = selected.as_ref().ok_or_else(need_key)?;
                KeyWrapOutcome::Wrapped(alg::aeskw::wrap(alg, jwk, &cek)?)
            }
            KeyMgmtAlg::Aes128GcmKw | KeyMgmtAlg::Aes192GcmKw | KeyMgmtAlg::Aes256GcmKw => {
                let jwk = selected.as_ref().ok_or_else(need_key)?;
                KeyWrapOutcome::Wrapped(alg::aesgcmkw::wrap(alg, jwk, &cek, &mut self.header)?)
            }
            KeyMgmtAlg::Pbes2Hs256A128Kw
            | KeyMgmtAlg::Pbes2Hs384A192Kw
            | KeyMgmtAlg::Pbes2Hs512A256Kw => {
                let jwk = selected.as_ref().ok_or_else(need_key)?;
                KeyWrapOutcome::Wrapped(alg::pbes2::wrap(alg, jwk, &cek, &mut self.header)?)
            }
            KeyMgmtAlg::EcdhEs
            | KeyMgmtAlg::EcdhEsA128Kw
            | KeyMgmtAlg::EcdhEsA192Kw
            | KeyMgmtAlg::EcdhEsA256Kw => {
                let jwk = selected.as_ref().ok_or_else(need_key)?;
                let enc = enc.ok_or(Error::InvalidParam("enc not set"))?;
                // A sole private-set entry serves as a caller-pinned
                // ephemeral, which keeps agreement deterministic for tests
                // and re-encryption flows.
                let ephemeral = self.jwks_private.single().cloned();
                alg::ecdh::wrap(alg, enc, jwk, ephemeral.as_ref(), &cek, &mut self.header)?
            }
            _ => return Err(Error::InvalidParam("unsupported alg")),
        };

        match outcome {
            KeyWrapOutcome::Direct(key) => {
                self.cek = Some(key);
                self.encrypted_key_b64 = Some(String::new());
            }
            KeyWrapOutcome::Wrapped(wrapped) => {
                self.encrypted_key_b64 = Some(b64_encode(&wrapped));
            }
        }
        Ok(())
    }

    /// Unwrap (or re-derive) the CEK with the recipient's key, per the
    /// header's `alg`.
    pub fn decrypt_key(&mut self, jwk: Option<&Jwk>) -> Result<()> {
        let selected = match jwk {
            Some(jwk) => Some(jwk.clone()),
            None => self.select_key(false),
        };
        let alg = self.header.alg().ok_or(Error::InvalidParam("alg not set"))?;
        if alg == KeyMgmtAlg::None {
            return Err(Error::InvalidParam("alg none is not acceptable"));
        }
        let enc = self.header.enc();

        let wrapped = match self.encrypted_key_b64.as_deref() {
            Some(segment) => b64_decode(segment)?,
            None => Vec::new(),
        };
        if matches!(alg, KeyMgmtAlg::Dir | KeyMgmtAlg::EcdhEs) && !wrapped.is_empty() {
            return Err(Error::InvalidParam("encrypted key must be empty"));
        }

        let need_key = || Error::InvalidParam("no key available");
        let cek = match alg {
            KeyMgmtAlg::Dir => match &selected {
                Some(jwk) => {
                    alg::dir::unwrap(jwk, enc.ok_or(Error::InvalidParam("enc not set"))?)?
                }
                None => self
                    .cek
                    .clone()
                    .ok_or(Error::InvalidParam("no key available"))?,
            },
            KeyMgmtAlg::Rsa15 | KeyMgmtAlg::RsaOaep | KeyMgmtAlg::RsaOaep256 => {
                let jwk = selected.as_ref().ok_or_else(need_key)?;
                alg::rsa::unwrap(alg, jwk, &wrapped, enc)?
            }
            KeyMgmtAlg::Aes128Kw | KeyMgmtAlg::Aes192Kw | KeyMgmtAlg::Aes256Kw => {
                let jwk = selected.as_ref().ok_or_else(need_key)?;
                alg::aeskw::unwrap(alg, jwk, &wrapped)?
            }
            KeyMgmtAlg::Aes128GcmKw | KeyMgmtAlg::Aes192GcmKw | KeyMgmtAlg::Aes256GcmKw => {
                let jwk = selected.as_ref().ok_or_else(need_key)?;
                alg::aesgcmkw::unwrap(alg, jwk, &wrapped, &self.header)?
            }
            KeyMgmtAlg::Pbes2Hs256A128Kw
            | KeyMgmtAlg::Pbes2Hs384A192Kw
            | KeyMgmtAlg::Pbes2Hs512A256Kw => {
                let jwk = selected.as_ref().ok_or_else(need_key)?;
                alg::pbes2::unwrap(alg, jwk, &wrapped, &self.header)?
            }
            KeyMgmtAlg::EcdhEs
            | KeyMgmtAlg::EcdhEsA128Kw
            | KeyMgmtAlg::EcdhEsA192Kw
            | KeyMgmtAlg::EcdhEsA256Kw => {
                let jwk = selected.as_ref().ok_or_else(need_key)?;
                let enc = enc.ok_or(Error::InvalidParam("enc not set"))?;
                alg::ecdh::unwrap(alg, enc, jwk, &wrapped, &self.header)?
            }
            _ => return Err(Error::InvalidParam("unsupported alg")),
        };

        if let Some(enc) = enc {
            if cek.len() != enc.cek_size() {
                return Err(Error::InvalidParam("unwrapped CEK length does not match enc"));
            }
        }
        self.cek = Some(cek);
        Ok(())
    }

    /// Encrypt the payload with the current CEK and IV, producing the
    /// ciphertext and tag segments.
    ///
    /// The header is finalized and encoded here: its exact byte form is the
    /// AAD and is what [`Jwe::serialize`] writes on the wire.
    pub fn encrypt_payload(&mut self) -> Result<()> {
        let enc = self.header.enc().ok_or(Error::InvalidParam("enc not set"))?;
        let deflate = self.header.zip_deflate();
        let aad = self.header.encode()?.to_owned();

        let cek = self
            .cek
            .as_ref()
            .ok_or(Error::InvalidParam("content encryption key not set"))?;
        if cek.len() != enc.cek_size() {
            return Err(Error::InvalidParam("CEK length does not match enc"));
        }
        if self.iv.len() != enc.iv_size() {
            return Err(Error::InvalidParam("IV length does not match enc"));
        }

        let plaintext = if deflate {
            Zeroizing::new(zip::deflate(&self.payload)?)
        } else {
            self.payload.clone()
        };

        let sealed = content::encrypt(enc, cek, &self.iv, aad.as_bytes(), &plaintext)?;
        self.iv_b64 = Some(b64_encode(&self.iv));
        self.ciphertext_b64 = Some(b64_encode(&sealed.ciphertext));
        self.tag_b64 = Some(b64_encode(&sealed.tag));
        Ok(())
    }

    /// Verify the tag and decrypt the ciphertext segment back into the
    /// payload. Any integrity failure surfaces as [`Error::InvalidTag`]
    /// before a single payload byte is exposed.
    pub fn decrypt_payload(&mut self) -> Result<()> {
        let enc = self.header.enc().ok_or(Error::InvalidParam("enc not set"))?;
        let aad = match self.header.encoded() {
            Some(b64) => b64.to_owned(),
            None => self.header.encode()?.to_owned(),
        };

        let ciphertext = b64_decode(
            self.ciphertext_b64
                .as_deref()
                .ok_or(Error::InvalidParam("no ciphertext to decrypt"))?,
        )?;
        let tag = b64_decode(
            self.tag_b64
                .as_deref()
                .ok_or(Error::InvalidParam("no authentication tag"))?,
        )?;
        let cek = self
            .cek
            .as_ref()
            .ok_or(Error::InvalidParam("content encryption key not set"))?;
        if cek.len() != enc.cek_size() {
            return Err(Error::InvalidParam("CEK length does not match enc"));
        }
        if self.iv.len() != enc.iv_size() {
            return Err(Error::InvalidParam("IV length does not match enc"));
        }

        let plaintext = Zeroizing::new(content::decrypt(
            enc,
            cek,
            &self.iv,
            aad.as_bytes(),
            &ciphertext,
            &tag,
        )?);
        self.payload = if self.header.zip_deflate() {
            Zeroizing::new(zip::inflate(&plaintext)?)
        } else {
            plaintext
        };
        Ok(())
    }

    /// Run the whole encrypt pipeline and emit the compact form.
    ///
    /// Missing CEK and IV are generated, the CEK is wrapped for the
    /// recipient, the payload encrypted, and the five segments joined. The
    /// encrypted-key segment is empty for `dir` and `ECDH-ES`.
    pub fn serialize(&mut self, jwk: Option<&Jwk>) -> Result<String> {
        if self.header.enc().is_none() {
            return Err(Error::InvalidParam("enc not set"));
        }
        if self.cek.is_none() {
            self.generate_cek()?;
        }
        if self.iv.is_empty() {
            self.generate_iv()?;
        }
        self.encrypt_key(jwk)?;
        self.encrypt_payload()?;

        let header = self.header.encode()?.to_owned();
        Ok(join([
            &header,
            self.encrypted_key_b64.as_deref().unwrap_or(""),
            self.iv_b64.as_deref().unwrap_or(""),
            self.ciphertext_b64.as_deref().unwrap_or(""),
            self.tag_b64.as_deref().unwrap_or(""),
        ]))
    }

    /// Parse a compact token into a fresh context.
    ///
    /// ASCII whitespace anywhere in the input is discarded. The five
    /// segments must decode as base64url (the second may be empty) and the
    /// header must be a JSON object naming a known `alg` and `enc`. A `jwk`
    /// header is imported into the context's public set. The payload stays
    /// encrypted until [`Jwe::decrypt`].
    pub fn parse(token: &str) -> Result<Self> {
        Self::parse_inner(token, None)
    }

    /// Like [`Jwe::parse`], with a resolver for `jku` headers.
    pub fn parse_with_resolver(token: &str, resolver: &dyn JwkSetResolver) -> Result<Self> {
        Self::parse_inner(token, Some(resolver))
    }

    fn parse_inner(token: &str, resolver: Option<&dyn JwkSetResolver>) -> Result<Self> {
        let cleaned = strip_whitespace(token);
        let segments = split(&cleaned)?;

        let header_bytes = b64_decode(segments[0])?;
        let map: Map<String, Value> = serde_json::from_slice(&header_bytes)
            .map_err(|_| Error::InvalidHeader("protected header is not a JSON object"))?;

        match map.get("alg").and_then(Value::as_str) {
            Some(name) if KeyMgmtAlg::from_name(name).is_some() => {}
            Some(_) => return Err(Error::InvalidHeader("unknown alg")),
            None => return Err(Error::InvalidHeader("missing alg")),
        }
        let enc = match map.get("enc").and_then(Value::as_str) {
            Some(name) => {
                EncryptionAlg::from_name(name).ok_or(Error::InvalidHeader("unknown enc"))?
            }
            None => return Err(Error::InvalidHeader("missing enc")),
        };

        let iv = b64_decode(segments[2])?;
        if iv.len() != enc.iv_size() {
            return Err(Error::InvalidParam("IV length does not match enc"));
        }
        // Validate the remaining segments eagerly so a malformed token is
        // rejected at the door.
        b64_decode(segments[1])?;
        b64_decode(segments[3])?;
        b64_decode(segments[4])?;

        let mut jwe = Jwe {
            header: Header::from_wire(map, segments[0].to_owned()),
            iv,
            encrypted_key_b64: Some(segments[1].to_owned()),
            iv_b64: Some(segments[2].to_owned()),
            ciphertext_b64: Some(segments[3].to_owned()),
            tag_b64: Some(segments[4].to_owned()),
            ..Default::default()
        };

        if let Some(value) = jwe.header.get_value("jwk") {
            let jwk: Jwk = serde_json::from_value(value.clone())
                .map_err(|_| Error::InvalidParam("malformed jwk header"))?;
            jwe.jwks_public.push(jwk);
        }
        if let (Some(resolver), Some(url)) = (resolver, jwe.header.get_str("jku")) {
            if let Some(set) = resolver.resolve(url) {
                jwe.jwks_public.keys.extend(set.keys);
            }
        }

        Ok(jwe)
    }

    /// Unwrap the CEK and decrypt the payload, returning the cleartext.
    pub fn decrypt(&mut self, jwk: Option<&Jwk>) -> Result<Vec<u8>> {
        self.decrypt_key(jwk)?;
        self.decrypt_payload()?;
        Ok(self.payload.to_vec())
    }

    /// Pick a key from the attached sets: by the header `kid` when one is
    /// named, else the set's only entry.
    fn select_key(&self, public: bool) -> Option<Jwk> {
        let set = if public {
            &self.jwks_public
        } else {
            &self.jwks_private
        };
        match self.header.get_str("kid") {
            Some(kid) => set.get(kid).cloned(),
            None => set.single().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use seal_jwk::{B64Secret, Oct};

    use super::*;

    fn oct_jwk(len: usize) -> Jwk {
        let mut key = vec![0u8; len];
        OsRng.fill_bytes(&mut key);
        Jwk::new(Oct {
            k: B64Secret::new(key),
        })
    }

    #[test]
    fn dir_token_has_empty_key_segment() {
        let jwk = oct_jwk(16);
        let mut jwe = Jwe::new();
        jwe.set_alg(KeyMgmtAlg::Dir);
        jwe.set_enc(EncryptionAlg::Aes128Gcm);
        jwe.set_payload(b"hello");
        let token = jwe.serialize(Some(&jwk)).unwrap();

        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[1], "");

        let mut parsed = Jwe::parse(&token).unwrap();
        assert_eq!(parsed.decrypt(Some(&jwk)).unwrap(), b"hello");
    }

    #[test]
    fn alg_none_is_refused() {
        let mut jwe = Jwe::new();
        jwe.set_alg(KeyMgmtAlg::None);
        jwe.set_enc(EncryptionAlg::Aes128Gcm);
        jwe.set_payload(b"x");
        assert!(matches!(
            jwe.serialize(Some(&oct_jwk(16))),
            Err(Error::InvalidParam(_))
        ));
    }

    #[test]
    fn segments_not_populated_on_failure() {
        let mut jwe = Jwe::new();
        jwe.set_alg(KeyMgmtAlg::Aes128Kw);
        jwe.set_enc(EncryptionAlg::Aes128Gcm);
        jwe.set_payload(b"x");
        // Wrong KEK size: wrap fails before any segment is written.
        assert!(jwe.serialize(Some(&oct_jwk(32))).is_err());
        assert!(jwe.ciphertext_b64.is_none());
        assert!(jwe.tag_b64.is_none());
    }

    #[test]
    fn kid_lookup_selects_key() {
        let mut wanted = oct_jwk(32);
        wanted.params.kid = Some("right".into());
        let mut decoy = oct_jwk(32);
        decoy.params.kid = Some("wrong".into());

        let mut jwe = Jwe::new();
        jwe.set_alg(KeyMgmtAlg::Dir);
        jwe.set_enc(EncryptionAlg::Aes256Gcm);
        jwe.header_mut().set_str("kid", "right");
        jwe.set_payload(b"routed");
        jwe.add_keys(None, Some(&decoy));
        jwe.add_keys(None, Some(&wanted));
        let token = jwe.serialize(None).unwrap();

        let mut parsed = Jwe::parse(&token).unwrap();
        parsed.add_keys(Some(&decoy), None);
        parsed.add_keys(Some(&wanted), None);
        assert_eq!(parsed.decrypt(None).unwrap(), b"routed");
    }

    #[test]
    fn whitespace_tolerated_on_parse() {
        let jwk = oct_jwk(32);
        let mut jwe = Jwe::new();
        jwe.set_alg(KeyMgmtAlg::Dir);
        jwe.set_enc(EncryptionAlg::Aes256Gcm);
        jwe.set_payload(b"spacey");
        let token = jwe.serialize(Some(&jwk)).unwrap();

        let sprinkled: String = token
            .chars()
            .enumerate()
            .flat_map(|(i, c)| {
                if i % 7 == 0 {
                    vec!['\n', c]
                } else {
                    vec![c]
                }
            })
            .collect();
        let mut parsed = Jwe::parse(&format!(" \t{sprinkled}\r\n")).unwrap();
        assert_eq!(parsed.decrypt(Some(&jwk)).unwrap(), b"spacey");
    }

    #[test]
    fn unknown_alg_rejected_at_parse() {
        let header = crate::compact::b64_encode(br#"{"alg":"X25519KW","enc":"A128GCM"}"#);
        let token = format!("{header}.AAAA.AAAAAAAAAAAAAAAA.AAAA.AAAA");
        assert!(matches!(
            Jwe::parse(&token),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn missing_enc_rejected_at_parse() {
        let header = crate::compact::b64_encode(br#"{"alg":"dir"}"#);
        let token = format!("{header}..AAAAAAAAAAAAAAAA.AAAA.AAAA");
        assert!(matches!(
            Jwe::parse(&token),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn embedded_jwk_header_lands_in_public_set() {
        let jwk = oct_jwk(16);
        let mut jwe = Jwe::new();
        jwe.set_alg(KeyMgmtAlg::Dir);
        jwe.set_enc(EncryptionAlg::Aes128Gcm);
        jwe.header_mut().set_value(
            "jwk",
            serde_json::to_value(&jwk).unwrap(),
        );
        jwe.set_payload(b"keyed");
        let token = jwe.serialize(Some(&jwk)).unwrap();

        let parsed = Jwe::parse(&token).unwrap();
        // Keys advertised by the producer land in the public set.
        assert_eq!(parsed.jwks_public.len(), 1);
        assert_eq!(parsed.jwks_public.single(), Some(&jwk));
    }

    #[test]
    fn jku_resolver_is_consulted() {
        struct Fixed(JwkSet);
        impl JwkSetResolver for Fixed {
            fn resolve(&self, url: &str) -> Option<JwkSet> {
                (url == "https://keys.example/jwks.json").then(|| self.0.clone())
            }
        }

        let jwk = oct_jwk(32);
        let mut set = JwkSet::default();
        set.push(jwk.clone());

        let mut jwe = Jwe::new();
        jwe.set_alg(KeyMgmtAlg::Dir);
        jwe.set_enc(EncryptionAlg::Aes256Gcm);
        jwe.header_mut()
            .set_str("jku", "https://keys.example/jwks.json");
        jwe.set_payload(b"fetched");
        let token = jwe.serialize(Some(&jwk)).unwrap();

        let resolver = Fixed(set);
        let mut parsed = Jwe::parse_with_resolver(&token, &resolver).unwrap();
        assert_eq!(parsed.jwks_public.len(), 1);
        assert_eq!(parsed.decrypt(Some(&jwk)).unwrap(), b"fetched");
    }

    #[test]
    fn deep_copy_is_independent() {
        let jwk = oct_jwk(16);
        let mut jwe = Jwe::new();
        jwe.set_alg(KeyMgmtAlg::Dir);
        jwe.set_enc(EncryptionAlg::Aes128Gcm);
        jwe.set_payload(b"original");

        let snapshot = jwe.clone();
        jwe.set_payload(b"mutated");
        assert_eq!(snapshot.payload(), b"original");

        let mut restored = snapshot.clone();
        let token = restored.serialize(Some(&jwk)).unwrap();
        let mut parsed = Jwe::parse(&token).unwrap();
        assert_eq!(parsed.decrypt(Some(&jwk)).unwrap(), b"original");
    }
}
