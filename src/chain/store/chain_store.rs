// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use crate::blocks::{Block, CachingBlockHeader, Tipset};
use crate::message::SignedMessage;
use crate::utils::db::CborStoreExt as _;
use anyhow::Result;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::broadcast::{self, Receiver as Subscriber, Sender as Publisher};
use tracing::debug;

/// Default capacity of the head change channel.
pub const DEFAULT_HEAD_CHANGE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainStoreConfig {
    /// Number of head changes buffered for each subscriber before it lags.
    pub head_change_capacity: usize,
}

impl Default for ChainStoreConfig {
    fn default() -> Self {
        Self {
            head_change_capacity: DEFAULT_HEAD_CHANGE_CAPACITY,
        }
    }
}

/// `Enum` for `pubsub` channel that defines message type variant and data
/// contained in message type.
#[derive(Clone, Debug)]
pub enum HeadChange {
    Apply(Arc<Tipset>),
}

/// Stores chain data and tracks the heaviest tipset. This structure is
/// thread-safe and can be shared across tasks behind an [`Arc`].
pub struct ChainStore<DB> {
    /// Publisher for head change events
    publisher: Publisher<HeadChange>,

    /// key-value `datastore`.
    pub db: Arc<DB>,

    heaviest: RwLock<Arc<Tipset>>,
}

impl<DB> ChainStore<DB>
where
    DB: Blockstore,
{
    /// Creates a store whose head is the empty root tipset.
    pub fn new(db: Arc<DB>, config: &ChainStoreConfig) -> Self {
        let (publisher, _) = broadcast::channel(config.head_change_capacity.max(1));
        Self {
            publisher,
            db,
            heaviest: RwLock::new(Arc::new(Tipset::empty())),
        }
    }

    /// Writes the block header and its messages to the data store.
    pub fn put_block(&self, block: &Block) -> Result<()> {
        block.persist(self.blockstore())
    }

    /// Sets the heaviest tipset and notifies subscribers.
    pub fn set_heaviest_tipset(&self, ts: Arc<Tipset>) {
        *self.heaviest.write() = Arc::clone(&ts);
        if self.publisher.send(HeadChange::Apply(ts)).is_err() {
            debug!("did not publish head change, no active receivers");
        }
    }

    /// Returns the currently tracked heaviest tipset.
    pub fn heaviest_tipset(&self) -> Arc<Tipset> {
        Arc::clone(&self.heaviest.read())
    }

    /// Subscribes to head changes published after this call.
    pub fn subscribe(&self) -> Subscriber<HeadChange> {
        self.publisher.subscribe()
    }

    /// Returns key-value store instance.
    pub fn blockstore(&self) -> &Arc<DB> {
        &self.db
    }
}

/// Returns the signed messages included in the block, in inclusion order.
pub fn block_messages<DB>(db: &DB, bh: &CachingBlockHeader) -> Result<Vec<SignedMessage>>
where
    DB: Blockstore,
{
    messages_from_cids(db, &bh.messages)
}

/// Loads and decodes every object named in `keys`. A missing key is an error.
pub fn messages_from_cids<DB, T>(db: &DB, keys: &[Cid]) -> Result<Vec<T>>
where
    DB: Blockstore,
    T: DeserializeOwned,
{
    keys.iter().map(|k| db.get_cbor_required(k)).collect()
}
