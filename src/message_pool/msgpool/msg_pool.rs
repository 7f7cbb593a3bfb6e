// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

// Contains the implementation of Message Pool component.
// The Message Pool holds signed messages that are not yet known to be
// included in the canonical chain. Messages are added directly by producers
// and reconciled against the chain whenever the head changes.

use std::sync::Arc;

use crate::chain::ChainStore;
use crate::message::{Message as _, SignedMessage};
use crate::shim::{address::Address, crypto::Recoverer};
use ahash::HashMap;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use parking_lot::RwLock as SyncRwLock;
use tokio::task::JoinSet;
use tracing::trace;

use crate::message_pool::{config::MpoolConfig, errors::Error, metrics, msgpool::head_change_loop};

/// Concurrency-safe set of pending [`SignedMessage`]s, keyed by their
/// content identifier.
///
/// Every operation takes the internal lock exactly once, so each call is
/// atomic with respect to every other call.
#[derive(Debug, Default)]
pub struct MessagePool {
    pending: SyncRwLock<HashMap<Cid, SignedMessage>>,
    config: MpoolConfig,
}

impl MessagePool {
    /// Creates a new, empty `MessagePool`.
    pub fn new(config: MpoolConfig) -> Self {
        Self {
            pending: SyncRwLock::new(HashMap::default()),
            config,
        }
    }

    pub fn config(&self) -> &MpoolConfig {
        &self.config
    }

    /// Adds a message and returns its [`Cid`]. Adding a message that is
    /// already pending leaves the pool unchanged.
    pub fn add(&self, msg: SignedMessage) -> Result<Cid, Error> {
        let cid = msg.cid().map_err(Error::Identity)?;
        let mut pending = self.pending.write();
        if pending.contains_key(&cid) {
            trace!("message {cid} is already pending");
        } else {
            trace!(
                "adding message {cid} from {} with sequence {}",
                msg.from(),
                msg.sequence()
            );
            pending.insert(cid, msg);
            metrics::MPOOL_MESSAGE_TOTAL.set(pending.len() as i64);
        }
        Ok(cid)
    }

    /// Checks that `msg` was signed by its sender, when the pool is configured
    /// to do so, and then [`MessagePool::add`]s it.
    pub fn push(&self, msg: SignedMessage, recoverer: &impl Recoverer) -> Result<Cid, Error> {
        if self.config.verify_signatures {
            msg.verify(recoverer)
                .map_err(|e| Error::InvalidSignature(format!("{e:#}")))?;
        }
        self.add(msg)
    }

    /// Removes the message with the given [`Cid`]. Removing a message that is
    /// not pending is a no-op.
    pub fn remove(&self, cid: &Cid) {
        let mut pending = self.pending.write();
        if pending.remove(cid).is_some() {
            trace!("removed message {cid}");
            metrics::MPOOL_MESSAGE_TOTAL.set(pending.len() as i64);
        }
    }

    /// Returns a point-in-time copy of every pending message.
    pub fn pending(&self) -> Vec<SignedMessage> {
        self.pending.read().values().cloned().collect()
    }

    /// Returns a copy of the pending messages sent by `addr`.
    pub fn pending_for(&self, addr: &Address) -> Vec<SignedMessage> {
        self.pending
            .read()
            .values()
            .filter(|msg| &msg.from() == addr)
            .cloned()
            .collect()
    }

    pub fn get(&self, cid: &Cid) -> Option<SignedMessage> {
        self.pending.read().get(cid).cloned()
    }

    pub fn contains(&self, cid: &Cid) -> bool {
        self.pending.read().contains_key(cid)
    }

    pub fn len(&self) -> usize {
        self.pending.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.read().is_empty()
    }

    /// Re-inserts `readd` and then drops `applied`, holding the lock for the
    /// whole update.
    pub(in crate::message_pool) fn apply_head_change(
        &self,
        readd: Vec<(Cid, SignedMessage)>,
        applied: &[Cid],
    ) {
        let mut pending = self.pending.write();
        for (cid, msg) in readd {
            pending.entry(cid).or_insert(msg);
        }
        for cid in applied {
            pending.remove(cid);
        }
        metrics::MPOOL_MESSAGE_TOTAL.set(pending.len() as i64);
    }

    /// Spawns a task that reconciles the pool with every head published by
    /// `chain_store`, starting from its current heaviest tipset.
    pub fn start_head_change_listener<DB>(
        self: &Arc<Self>,
        chain_store: &ChainStore<DB>,
        services: &mut JoinSet<anyhow::Result<()>>,
    ) where
        DB: Blockstore + Send + Sync + 'static,
    {
        let subscriber = chain_store.subscribe();
        let current = chain_store.heaviest_tipset();
        services.spawn(head_change_loop(
            Arc::clone(self),
            Arc::clone(chain_store.blockstore()),
            current,
            subscriber,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::SignedMessage;
    use crate::shim::crypto::{Secp256k1Recoverer, Signature};
    use crate::test_utils::{new_signed_msgs, seeded_wallet};

    #[test]
    fn add_is_idempotent() {
        let (wallet, addrs) = seeded_wallet(21, 1);
        let msgs = new_signed_msgs(&wallet, &addrs, 2);
        let mpool = MessagePool::default();
        let first = mpool.add(msgs[0].clone()).unwrap();
        let again = mpool.add(msgs[0].clone()).unwrap();
        assert_eq!(first, again);
        assert_eq!(mpool.len(), 1);
        assert_eq!(mpool.get(&first).as_ref(), Some(&msgs[0]));

        mpool.add(msgs[1].clone()).unwrap();
        assert_eq!(mpool.len(), 2);
    }

    #[test]
    fn remove_is_idempotent() {
        let (wallet, addrs) = seeded_wallet(22, 1);
        let msgs = new_signed_msgs(&wallet, &addrs, 2);
        let mpool = MessagePool::default();
        let cid = mpool.add(msgs[0].clone()).unwrap();

        mpool.remove(&msgs[1].cid().unwrap());
        assert_eq!(mpool.len(), 1);
        mpool.remove(&cid);
        mpool.remove(&cid);
        assert!(mpool.is_empty());
        assert!(!mpool.contains(&cid));
    }

    #[test]
    fn pending_is_a_snapshot() {
        let (wallet, addrs) = seeded_wallet(23, 2);
        let msgs = new_signed_msgs(&wallet, &addrs, 4);
        let mpool = MessagePool::default();
        for m in &msgs {
            mpool.add(m.clone()).unwrap();
        }
        let snapshot = mpool.pending();
        mpool.remove(&msgs[0].cid().unwrap());
        assert_eq!(snapshot.len(), 4);
        assert_eq!(mpool.pending().len(), 3);
        assert_eq!(mpool.pending_for(&addrs[0]).len(), 1);
        assert_eq!(mpool.pending_for(&addrs[1]).len(), 2);
    }

    #[test]
    fn push_rejects_forged_sender() {
        let (wallet, addrs) = seeded_wallet(24, 2);
        let msgs = new_signed_msgs(&wallet, &addrs, 1);
        let mut forged = msgs[0].message().clone();
        forged.from = addrs[1];
        let forged = SignedMessage::new_unchecked(forged, msgs[0].signature().clone());

        let mpool = MessagePool::default();
        assert!(matches!(
            mpool.push(forged.clone(), &Secp256k1Recoverer),
            Err(Error::InvalidSignature(_))
        ));
        mpool.push(msgs[0].clone(), &Secp256k1Recoverer).unwrap();
        assert_eq!(mpool.len(), 1);

        let lenient = MessagePool::new(MpoolConfig {
            verify_signatures: false,
        });
        lenient.push(forged, &Secp256k1Recoverer).unwrap();
        assert_eq!(lenient.len(), 1);
    }

    #[test]
    fn push_rejects_unsigned_messages() {
        let (wallet, addrs) = seeded_wallet(25, 1);
        let msgs = new_signed_msgs(&wallet, &addrs, 1);
        let unsigned =
            SignedMessage::new_unchecked(msgs[0].message().clone(), Signature::new_secp256k1(vec![]));
        let mpool = MessagePool::default();
        assert!(matches!(
            mpool.push(unsigned, &Secp256k1Recoverer),
            Err(Error::InvalidSignature(_))
        ));
        assert!(mpool.is_empty());
    }

    #[test]
    fn concurrent_producers_lose_nothing() {
        const PRODUCERS: u64 = 8;
        const PER_PRODUCER: usize = 25;
        let batches = (0..PRODUCERS)
            .map(|i| {
                let (wallet, addrs) = seeded_wallet(100 + i, 1);
                new_signed_msgs(&wallet, &addrs, PER_PRODUCER)
            })
            .collect::<Vec<_>>();

        let mpool = MessagePool::default();
        std::thread::scope(|s| {
            for batch in &batches {
                let mpool = &mpool;
                s.spawn(move || {
                    for m in batch {
                        mpool.add(m.clone()).unwrap();
                        // Duplicates from a racing producer must not inflate the pool.
                        mpool.add(m.clone()).unwrap();
                    }
                });
            }
        });
        assert_eq!(mpool.len(), PRODUCERS as usize * PER_PRODUCER);
        for batch in &batches {
            for m in batch {
                assert!(mpool.contains(&m.cid().unwrap()));
            }
        }
    }
}
