pub const HASH_SIZE: usize = 32;

/// Leading zero bits a block hash must carry; roughly one in 2^24
/// digests beats the target this produces.
pub const DIFFICULTY_BITS: u32 = 24;

/// Payload of the fixed first block.
pub const GENESIS_DATA: &str = "BlockChain is God";
