//! DEFLATE payload compression (`"zip": "DEF"`, RFC 7516 section 4.1.3).
//!
//! Raw DEFLATE streams per RFC 1951, no zlib framing. Compression runs
//! before encryption, decompression after decryption.

use std::io::Read;

use flate2::read::{DeflateDecoder, DeflateEncoder};
use flate2::Compression;

use crate::error::{Error, Result};

pub(crate) fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    DeflateEncoder::new(data, Compression::default())
        .read_to_end(&mut out)
        .map_err(|e| Error::Crypto(e.to_string()))?;
    Ok(out)
}

pub(crate) fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    DeflateDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| Error::Crypto(e.to_string()))?;
    Ok(out)
}
