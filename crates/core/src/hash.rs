//! SHA-256 helpers shared by the canonical encoders.

use sha2::{Digest, Sha256};

/// A 32-byte SHA-256 digest
pub type Hash32 = [u8; 32];

pub fn sha256(bytes: &[u8]) -> Hash32 {
    Sha256::digest(bytes).into()
}

/// Lowercase hex, the form hosts and contracts receive.
pub fn to_hex(hash: &Hash32) -> String {
    hex::encode(hash)
}
