// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{CachingBlockHeader, RawBlockHeader};
use crate::message::SignedMessage;
use crate::utils::db::CborStoreExt as _;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;

/// A complete block: the header and every signed message it includes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub header: CachingBlockHeader,
    pub messages: Vec<SignedMessage>,
}

impl std::hash::Hash for Block {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::hash::Hash::hash(self.cid(), state)
    }
}

impl Block {
    /// Builds a block from a header template and its messages. The header's
    /// message list is replaced by the CIDs of `messages`.
    pub fn new(mut header: RawBlockHeader, messages: Vec<SignedMessage>) -> anyhow::Result<Self> {
        header.messages = messages
            .iter()
            .map(SignedMessage::cid)
            .collect::<Result<_, _>>()?;
        Ok(Block {
            header: CachingBlockHeader::new(header)?,
            messages,
        })
    }

    pub fn header(&self) -> &CachingBlockHeader {
        &self.header
    }

    /// Returns block header's CID.
    pub fn cid(&self) -> &Cid {
        self.header.cid()
    }

    /// Persists the block in the given block store
    pub fn persist(&self, db: &impl Blockstore) -> anyhow::Result<()> {
        self.header.persist(db)?;
        for msg in &self.messages {
            db.put_cbor_default(msg)?;
        }
        Ok(())
    }
}
