// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use forest_mpool::SignedMessage;
use forest_mpool::blocks::{Block, RawBlockHeader, Tipset};
use forest_mpool::key_management::Wallet;
use forest_mpool::shim::{
    address::Address, crypto::SignatureType, econ::TokenAmount, message::Message,
};
use fvm_ipld_blockstore::Blockstore;
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;

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

pub fn signed_msgs(wallet: &Wallet, senders: &[Address], count: usize) -> Vec<SignedMessage> {
    (0..count)
        .map(|i| {
            let msg = Message::transfer(
                senders[i % senders.len()],
                Address::new_id(1000),
                (i / senders.len()) as u64,
                TokenAmount::from_atto(1),
            );
            SignedMessage::new(msg, wallet).unwrap()
        })
        .collect()
}

/// Persists one tipset per entry of `tipsets` on top of `parent`, each block
/// carrying the listed messages. Returns the new tipsets, lowest first.
pub fn chain(
    db: &impl Blockstore,
    parent: &Tipset,
    tipsets: Vec<Vec<Vec<SignedMessage>>>,
) -> Vec<Tipset> {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut parent = parent.clone();
    let mut out = Vec::new();
    for blocks in tipsets {
        let headers = blocks
            .into_iter()
            .map(|messages| {
                let block = Block::new(
                    RawBlockHeader {
                        miner_address: Address::new_id(1),
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
        parent = Tipset::new(headers).unwrap();
        out.push(parent.clone());
    }
    out
}
