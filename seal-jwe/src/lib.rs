// SPDX-License-Identifier: Apache-2.0 OR MIT

#![doc = include_str!("../README.md")]
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

mod alg;
mod compact;
mod content;
mod error;
mod header;
mod jwe;
mod kdf;
mod zip;

pub use error::{Error, Result};
pub use header::Header;
pub use jwe::{Jwe, JwkSetResolver};

pub use seal_jwa as jwa;
pub use seal_jwa::{Algorithm, EncryptionAlg, KeyMgmtAlg};
pub use seal_jwk as jwk;
pub use seal_jwk::{Jwk, JwkSet};
