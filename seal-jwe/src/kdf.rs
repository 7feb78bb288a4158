//! Concat KDF (NIST SP 800-56A section 5.8.1) for the ECDH-ES family.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Derive `key_len` bytes from the shared secret `z`.
///
/// The hash input is `counter || Z || len(alg_id) || alg_id || len(apu) ||
/// apu || len(apv) || apv || keydatalen`, every length a 4-byte big-endian
/// count and `keydatalen` in bits. A single SHA-256 block suffices: every
/// key size in the registry is at most 32 bytes.
pub(crate) fn concat_kdf(
    z: &[u8],
    alg_id: &str,
    apu: &[u8],
    apv: &[u8],
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if key_len == 0 || key_len > 32 {
        return Err(Error::InvalidParam("derived key length out of range"));
    }

    let mut hasher = Sha256::new();
    hasher.update(1u32.to_be_bytes());
    hasher.update(z);
    hasher.update((alg_id.len() as u32).to_be_bytes());
    hasher.update(alg_id.as_bytes());
    hasher.update((apu.len() as u32).to_be_bytes());
    hasher.update(apu);
    hasher.update((apv.len() as u32).to_be_bytes());
    hasher.update(apv);
    hasher.update(((key_len * 8) as u32).to_be_bytes());
    let digest = hasher.finalize();

    Ok(Zeroizing::new(digest[..key_len].to_vec()))
}
