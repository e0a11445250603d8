use sha2::{Digest, Sha256};

use crate::Hash;

/// Canonical byte layout hashed during mining:
/// `prev_hash || data || timestamp || difficulty_bits || nonce`.
///
/// Integer fields are fixed-width big-endian 64-bit regardless of
/// platform. Changing field order, width, or endianness changes every
/// block hash, so this layout is an external contract.
pub fn pow_input(
    prev_hash: &[u8],
    data: &[u8],
    timestamp: i64,
    difficulty_bits: u32,
    nonce: u64,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(prev_hash.len() + data.len() + 8 + 8 + 8);
    bytes.extend_from_slice(prev_hash);
    bytes.extend_from_slice(data);
    bytes.extend_from_slice(&timestamp.to_be_bytes());
    bytes.extend_from_slice(&u64::from(difficulty_bits).to_be_bytes());
    bytes.extend_from_slice(&nonce.to_be_bytes());
    bytes
}

/// SHA-256 of the canonical proof-of-work input.
pub fn pow_hash(
    prev_hash: &[u8],
    data: &[u8],
    timestamp: i64,
    difficulty_bits: u32,
    nonce: u64,
) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(pow_input(prev_hash, data, timestamp, difficulty_bits, nonce));
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..]);
    out
}
