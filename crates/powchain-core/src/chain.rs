use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::info;

use crate::block::Block;
use crate::constants::DIFFICULTY_BITS;
use crate::pow::PowError;

/// Wall-clock source for block timestamps, injectable so tests can pin
/// time.
pub type Clock = fn() -> i64;

/// Seconds since the Unix epoch from the host clock.
pub fn system_clock() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs() as i64
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidateError {
    /// `prev_hash` does not match the predecessor's hash.
    #[error("block {index}: broken link to predecessor")]
    ChainLinkageViolation { index: usize },
    /// The stored hash does not re-derive from the block's fields, or it
    /// fails the difficulty target.
    #[error("block {index}: hash does not satisfy the proof-of-work target")]
    ProofOfWorkViolation { index: usize },
}

/// Append-only sequence of mined blocks, seeded with the genesis block.
/// The chain exclusively owns its blocks and only ever grows at the tail.
pub struct Blockchain {
    blocks: Vec<Block>,
    difficulty_bits: u32,
    clock: Clock,
}

impl Blockchain {
    /// Chain at the reference difficulty, stamped by the system clock.
    pub fn new() -> Result<Self, PowError> {
        Self::with_config(DIFFICULTY_BITS, system_clock)
    }

    /// Chain with explicit difficulty and clock. Mines the genesis block
    /// before returning, so construction pays one full proof-of-work.
    pub fn with_config(difficulty_bits: u32, clock: Clock) -> Result<Self, PowError> {
        let genesis = Block::genesis(clock(), difficulty_bits)?;
        Ok(Self {
            blocks: vec![genesis],
            difficulty_bits,
            clock,
        })
    }

    /// Mines a block carrying `data`, linked to the current tail, and
    /// pushes it. Takes `&mut self`, so appends are serialized by the
    /// borrow checker rather than a lock.
    pub fn append(&mut self, data: Vec<u8>) -> Result<&Block, PowError> {
        let tail_hash = self.tip().hash().to_vec();
        let block = Block::mine(data, tail_hash, (self.clock)(), self.difficulty_bits)?;
        info!(
            height = self.blocks.len(),
            hash = %block.hash_hex(),
            "block appended"
        );
        self.blocks.push(block);
        Ok(self.tip())
    }

    /// Walks the whole chain checking the linkage and proof-of-work
    /// invariants for every block, reporting the first violating index.
    /// O(chain length) hash recomputations.
    pub fn validate(&self) -> Result<(), ValidateError> {
        for (index, block) in self.blocks.iter().enumerate() {
            let expected_prev: &[u8] = match index {
                0 => &[],
                _ => self.blocks[index - 1].hash(),
            };
            if block.prev_hash() != expected_prev {
                return Err(ValidateError::ChainLinkageViolation { index });
            }
            if !block.verify(self.difficulty_bits) {
                return Err(ValidateError::ProofOfWorkViolation { index });
            }
        }
        Ok(())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The current tail. The chain is never empty post-construction.
    pub fn tip(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain holds at least the genesis block")
    }

    pub fn difficulty_bits(&self) -> u32 {
        self.difficulty_bits
    }
}
