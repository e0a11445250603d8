//! End-to-end use of the library the way a consumer would: build a
//! chain, append payloads, and check the published invariants.

use powchain_core::{Blockchain, ProofOfWork};

fn fixed_clock() -> i64 {
    1_600_000_000
}

#[test]
fn chain_of_three_links_and_validates() {
    let mut chain = Blockchain::with_config(12, fixed_clock).expect("genesis mines");
    chain.append(b"send 1 bitcoin".to_vec()).expect("append");
    chain.append(b"send 1 klaytn".to_vec()).expect("append");

    let blocks = chain.blocks();
    assert_eq!(blocks.len(), 3);
    for i in 1..blocks.len() {
        assert_eq!(blocks[i].prev_hash(), blocks[i - 1].hash().as_slice());
    }
    chain.validate().expect("chain is intact");
}

#[test]
fn every_mined_block_beats_the_target() {
    let mut chain = Blockchain::with_config(16, fixed_clock).expect("genesis mines");
    chain.append(b"send 1 bitcoin".to_vec()).expect("append");

    for block in chain.blocks() {
        // 16 bits is byte-aligned, so the leading two bytes are zero.
        assert_eq!(&block.hash()[0..2], &[0, 0]);
        let pow = ProofOfWork::new(block.prev_hash(), block.data(), block.timestamp(), 16);
        assert!(pow.meets_target(block.hash()));
    }
}

#[test]
fn identical_inputs_mine_identical_blocks() {
    let a = Blockchain::with_config(12, fixed_clock).expect("genesis mines");
    let b = Blockchain::with_config(12, fixed_clock).expect("genesis mines");
    assert_eq!(a.tip().hash(), b.tip().hash());
    assert_eq!(a.tip().nonce(), b.tip().nonce());
}
