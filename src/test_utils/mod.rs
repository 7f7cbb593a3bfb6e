// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::atomic::{AtomicU64, Ordering};

use crate::blocks::{Block, RawBlockHeader, Tipset};
use crate::key_management::Wallet;
use crate::message::SignedMessage;
use crate::shim::{address::Address, crypto::SignatureType, econ::TokenAmount, message::Message};
use fvm_ipld_blockstore::Blockstore;
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;

/// A wallet holding `count` secp256k1 keys derived from `seed`.
pub fn seeded_wallet(seed: u64, count: usize) -> (Wallet, Vec<Address>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut wallet = Wallet::default();
    let addrs = (0..count)
        .map(|_| {
            wallet
                .generate_addr_with_rng(SignatureType::Secp256k1, &mut rng)
                .unwrap()
        })
        .collect();
    (wallet, addrs)
}

/// Signs `count` transfers, cycling through `senders`. Each sender's
/// sequences start at zero and increase by one.
pub fn new_signed_msgs(wallet: &Wallet, senders: &[Address], count: usize) -> Vec<SignedMessage> {
    (0..count)
        .map(|i| {
            let from = senders[i % senders.len()];
            let sequence = (i / senders.len()) as u64;
            let msg = Message::builder()
                .from(from)
                .to(Address::new_id(1000))
                .sequence(sequence)
                .value(TokenAmount::from_atto(1))
                .gas_limit(10_000)
                .build()
                .unwrap();
            SignedMessage::new(msg, wallet).unwrap()
        })
        .collect()
}

/// Persists a chain on top of `parent`. Each entry of `tipsets` is one tipset,
/// each of its entries one block, listing that block's messages. Returns the
/// new tipsets, lowest first.
pub fn new_chain_with_messages(
    db: &impl Blockstore,
    parent: &Tipset,
    tipsets: Vec<Vec<Vec<SignedMessage>>>,
) -> Vec<Tipset> {
    // Use a static counter to give all blocks a unique timestamp
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut parent = parent.clone();
    let mut chain = Vec::with_capacity(tipsets.len());
    for blocks in tipsets {
        let headers = blocks
            .into_iter()
            .enumerate()
            .map(|(i, messages)| {
                let block = Block::new(
                    RawBlockHeader {
                        miner_address: Address::new_id(i as u64),
                        parents: parent.key().clone(),
                        epoch: parent.epoch() + 1,
                        timestamp: COUNTER.fetch_add(1, Ordering::Relaxed),
                        messages: vec![],
                    },
                    messages,
                )
                .unwrap();
                block.persist(db).unwrap();
                block.header
            })
            .collect::<Vec<_>>();
        let tipset = Tipset::new(headers).unwrap();
        chain.push(tipset.clone());
        parent = tipset;
    }
    chain
}
