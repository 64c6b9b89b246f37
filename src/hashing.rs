//! Hashing System - SHA-256 fingerprints for the artifact cache
//!
//! Every file the pipeline produces is named after the fingerprint of the
//! rendered document, so the same content always lands on the same paths.

use sha2::{Digest, Sha256};

/// Length of a fingerprint in hex characters.
pub const FINGERPRINT_LEN: usize = 16;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Fingerprint of a rendered document: the SHA-256 digest truncated to 16 hex chars.
pub fn tex_hash(content: &str) -> String {
    let mut digest = sha256_hex(content.as_bytes());
    digest.truncate(FINGERPRINT_LEN);
    digest
}

// We need hex encoding
mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}
