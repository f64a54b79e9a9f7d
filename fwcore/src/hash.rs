//! SHA-256 (streaming and one-shot) and HMAC-SHA-256.
//!
//! FIPS 180-4 / RFC 2104 are a solved problem on crates.io; per the
//! design notes this wraps the `no_std`-validated `sha2`/`hmac` crates
//! the teacher already depends on rather than transcribing the
//! standard by hand.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256 as RcSha256};

/// Streaming SHA-256 context. `init` is [`Sha256::new`]; `update` may be
/// called any number of times with any chunk size; `finalize` consumes
/// the context and returns the 32-byte digest.
#[derive(Clone)]
pub struct Sha256 {
    inner: RcSha256,
}

impl Sha256 {
    pub fn new() -> Self {
        Self { inner: RcSha256::new() }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    pub fn finalize(self) -> [u8; 32] {
        self.inner.finalize().into()
    }

    /// One-shot digest, equivalent to `new().update(data).finalize()`.
    pub fn digest(data: &[u8]) -> [u8; 32] {
        RcSha256::digest(data).into()
    }
}

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}

type HmacSha256 = Hmac<RcSha256>;

/// HMAC-SHA-256 per RFC 2104/4231.
///
/// Exposed but not consumed by [`crate::verify::verify_record`] — this
/// crate checks integrity (a bare digest), not authenticity. Kept as a
/// primitive reserved for a possible future signed-metadata scheme.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    // `new_from_slice` never fails for HMAC: any key length is valid
    // (RFC 2104 hashes keys longer than the block size down to 32 bytes
    // internally), so this is infallible by construction.
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}
