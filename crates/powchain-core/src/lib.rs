//! Minimal proof-of-work blockchain core: blocks bound to their
//! predecessor by SHA-256, mined against a fixed numeric difficulty
//! target, and collected in an append-only in-memory chain.

pub mod block;
pub mod chain;
pub mod constants;
pub mod encode;
pub mod pow;

pub use block::Block;
pub use chain::{system_clock, Blockchain, Clock, ValidateError};
pub use pow::{PowError, PowSolution, ProofOfWork};

/// SHA-256 digest.
pub type Hash = [u8; 32];
