// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use ahash::HashMap;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use parking_lot::RwLock;

/// A [`Blockstore`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryDB {
    blockchain_db: RwLock<HashMap<Cid, Vec<u8>>>,
}

impl MemoryDB {
    /// Number of stored blocks.
    pub fn len(&self) -> usize {
        self.blockchain_db.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blockchain_db.read().is_empty()
    }

    pub fn contains(&self, cid: &Cid) -> bool {
        self.blockchain_db.read().contains_key(cid)
    }

    /// Drops the block stored under `cid`, returning whether it was present.
    pub fn remove(&self, cid: &Cid) -> bool {
        self.blockchain_db.write().remove(cid).is_some()
    }
}

impl Blockstore for MemoryDB {
    fn get(&self, k: &Cid) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.blockchain_db.read().get(k).cloned())
    }

    fn put_keyed(&self, k: &Cid, block: &[u8]) -> anyhow::Result<()> {
        self.blockchain_db.write().insert(*k, block.to_vec());
        Ok(())
    }
}
