//! # Digest Computation
//!
//! Both functions return [`Hash256`] so digests from either algorithm flow
//! through the same comparison and rendering code.

use blake2::digest::consts::U32;
use blake2::Blake2b;
use sha2::{Digest, Sha256};
use ssid_core::Hash256;

type Blake2b256 = Blake2b<U32>;

/// Blake2b with a 256-bit output.
pub fn blake2_256(data: &[u8]) -> Hash256 {
    let out = Blake2b256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&out);
    Hash256(bytes)
}

/// SHA-256.
pub fn sha256(data: &[u8]) -> Hash256 {
    let out = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&out);
    Hash256(bytes)
}
