// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::TipsetKey;
use crate::shim::{address::Address, clock::ChainEpoch};
use crate::utils::{cid::CidCborExt as _, db::CborStoreExt as _};
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::tuple::*;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

#[derive(Deserialize_tuple, Serialize_tuple, Clone, Hash, Eq, PartialEq, Debug)]
pub struct RawBlockHeader {
    /// The address of the miner actor that mined this block
    pub miner_address: Address,
    /// The set of parents this block was based on.
    /// Typically one, but can be several in the case where there were multiple
    /// winning ticket-holders for an epoch
    pub parents: TipsetKey,
    /// The period in which a new block is generated.
    pub epoch: ChainEpoch,
    /// Block creation time, in seconds since the Unix epoch
    pub timestamp: u64,
    /// CIDs of the signed messages included in this block, in inclusion order
    pub messages: Vec<Cid>,
}

impl RawBlockHeader {
    pub fn car_block(&self) -> anyhow::Result<(Cid, Vec<u8>)> {
        let data = fvm_ipld_encoding::to_vec(self)?;
        Ok((Cid::from_cbor_bytes_blake2b256(&data), data))
    }
}

/// A [`RawBlockHeader`] together with its [`Cid`], computed once on
/// construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CachingBlockHeader {
    uncached: RawBlockHeader,
    cid: Cid,
}

impl Deref for CachingBlockHeader {
    type Target = RawBlockHeader;

    fn deref(&self) -> &Self::Target {
        &self.uncached
    }
}

impl CachingBlockHeader {
    pub fn new(uncached: RawBlockHeader) -> anyhow::Result<Self> {
        let (cid, _) = uncached.car_block()?;
        Ok(Self { uncached, cid })
    }

    /// Returns [`None`] if the blockstore doesn't contain the CID.
    pub fn load(store: &impl Blockstore, cid: Cid) -> anyhow::Result<Option<Self>> {
        Ok(store
            .get_cbor::<RawBlockHeader>(&cid)?
            .map(|uncached| Self { uncached, cid }))
    }

    pub fn cid(&self) -> &Cid {
        &self.cid
    }

    /// Writes the header to `store` under its [`Cid`].
    pub fn persist(&self, store: &impl Blockstore) -> anyhow::Result<()> {
        let (cid, data) = self.uncached.car_block()?;
        store.put_keyed(&cid, &data)
    }
}

impl Serialize for CachingBlockHeader {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.uncached.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CachingBlockHeader {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let uncached = RawBlockHeader::deserialize(deserializer)?;
        Self::new(uncached).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDB;

    fn header(epoch: ChainEpoch) -> RawBlockHeader {
        RawBlockHeader {
            miner_address: Address::new_id(0),
            parents: TipsetKey::default(),
            epoch,
            timestamp: 7,
            messages: vec![],
        }
    }

    #[test]
    fn cid_matches_the_stored_key() {
        let db = MemoryDB::default();
        let h = CachingBlockHeader::new(header(1)).unwrap();
        h.persist(&db).unwrap();
        let loaded = CachingBlockHeader::load(&db, *h.cid()).unwrap().unwrap();
        assert_eq!(loaded, h);
        assert_eq!(loaded.epoch, 1);
    }

    #[test]
    fn missing_header_loads_as_none() {
        let db = MemoryDB::default();
        let h = CachingBlockHeader::new(header(2)).unwrap();
        assert!(CachingBlockHeader::load(&db, *h.cid()).unwrap().is_none());
    }

    #[test]
    fn encoding_preserves_cid() {
        let h = CachingBlockHeader::new(header(3)).unwrap();
        let bytes = fvm_ipld_encoding::to_vec(&h).unwrap();
        let decoded: CachingBlockHeader = fvm_ipld_encoding::from_slice(&bytes).unwrap();
        assert_eq!(decoded.cid(), h.cid());
    }
}
