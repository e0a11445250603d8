use serde::{Deserialize, Serialize};

use crate::constants::GENESIS_DATA;
use crate::pow::{PowError, ProofOfWork};
use crate::Hash;

/// One unit of chained, tamper-evident data. Constructed only by mining;
/// no field changes once the nonce and hash are committed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub(crate) timestamp: i64,
    pub(crate) data: Vec<u8>,
    pub(crate) prev_hash: Vec<u8>,
    pub(crate) hash: Hash,
    pub(crate) nonce: u64,
}

impl Block {
    /// Mines a block carrying `data` and linking to `prev_hash`. The
    /// timestamp is injected by the caller, never read from a global
    /// clock. Returns only on success; an exhausted nonce space surfaces
    /// as an error instead of a half-built block.
    pub fn mine(
        data: Vec<u8>,
        prev_hash: Vec<u8>,
        timestamp: i64,
        difficulty_bits: u32,
    ) -> Result<Self, PowError> {
        let solution = ProofOfWork::new(&prev_hash, &data, timestamp, difficulty_bits).run()?;
        Ok(Self {
            timestamp,
            data,
            prev_hash,
            hash: solution.hash,
            nonce: solution.nonce,
        })
    }

    /// The fixed first block: marker payload, empty `prev_hash`, and the
    /// same proof-of-work cost as any other block.
    pub fn genesis(timestamp: i64, difficulty_bits: u32) -> Result<Self, PowError> {
        Self::mine(
            GENESIS_DATA.as_bytes().to_vec(),
            Vec::new(),
            timestamp,
            difficulty_bits,
        )
    }

    /// Recomputes the canonical digest from the block's fields and checks
    /// it against both the stored hash and the difficulty target.
    pub fn verify(&self, difficulty_bits: u32) -> bool {
        let pow = ProofOfWork::new(&self.prev_hash, &self.data, self.timestamp, difficulty_bits);
        let recomputed = pow.hash_nonce(self.nonce);
        recomputed == self.hash && pow.meets_target(&recomputed)
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn prev_hash(&self) -> &[u8] {
        &self.prev_hash
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn prev_hash_hex(&self) -> String {
        hex::encode(&self.prev_hash)
    }
}
