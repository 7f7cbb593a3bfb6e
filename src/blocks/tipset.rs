// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{CachingBlockHeader, Error};
use crate::shim::clock::ChainEpoch;
use anyhow::Context as _;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use itertools::Itertools as _;
use serde::{Deserialize, Serialize};

/// A set of CIDs forming a unique key for a tipset.
///
/// The CIDs are kept sorted and free of duplicates, so two keys built from the
/// same blocks compare equal no matter the order the blocks were supplied in.
/// The empty key names the root of every chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TipsetKey(Vec<Cid>);

impl TipsetKey {
    pub fn new(cids: impl IntoIterator<Item = Cid>) -> Self {
        Self(cids.into_iter().sorted().dedup().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn cids(&self) -> &[Cid] {
        &self.0
    }

    pub fn contains(&self, cid: &Cid) -> bool {
        self.0.binary_search(cid).is_ok()
    }
}

impl FromIterator<Cid> for TipsetKey {
    fn from_iter<T: IntoIterator<Item = Cid>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'de> Deserialize<'de> for TipsetKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<Cid>::deserialize(deserializer).map(Self::new)
    }
}

impl std::fmt::Display for TipsetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

/// An immutable set of blocks at the same height with the same parent set.
/// Blocks in a tipset are canonically ordered by their CID.
///
/// [`Tipset::empty`] is the sentinel below the first real tipset of any chain:
/// it has no blocks, epoch zero and the empty key.
#[derive(Clone, Debug, Default)]
pub struct Tipset {
    headers: Vec<CachingBlockHeader>,
    key: TipsetKey,
}

impl PartialEq for Tipset {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Tipset {}

impl std::hash::Hash for Tipset {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state)
    }
}

impl Tipset {
    /// Builds a new tipset from a collection of block headers.
    /// Headers must share parents and epoch and must not repeat.
    pub fn new(headers: impl IntoIterator<Item = CachingBlockHeader>) -> Result<Self, Error> {
        let headers = headers
            .into_iter()
            .sorted_by(|a, b| a.cid().cmp(b.cid()))
            .collect_vec();
        let first = headers.first().ok_or(Error::NoBlocks)?;

        for header in headers.iter().skip(1) {
            if header.parents != first.parents {
                return Err(Error::InvalidTipset(format!(
                    "parent cids are not equal: {} != {}",
                    header.parents, first.parents
                )));
            }
            if header.epoch != first.epoch {
                return Err(Error::InvalidTipset(format!(
                    "epochs are not equal: {} != {}",
                    header.epoch, first.epoch
                )));
            }
        }
        if let Some((a, _)) = headers
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.cid() == b.cid())
        {
            return Err(Error::InvalidTipset(format!(
                "duplicate block {}",
                a.cid()
            )));
        }

        let key = TipsetKey::new(headers.iter().map(|h| *h.cid()));
        Ok(Self { headers, key })
    }

    /// The root sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the tipset named by `key`. The empty key yields
    /// [`Tipset::empty`]; any other missing block is an error.
    pub fn load(store: &impl Blockstore, key: &TipsetKey) -> anyhow::Result<Tipset> {
        if key.is_empty() {
            return Ok(Tipset::empty());
        }
        let headers = key
            .cids()
            .iter()
            .map(|cid| {
                CachingBlockHeader::load(store, *cid)?
                    .with_context(|| format!("block header not found in block store: cid={cid}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Tipset::new(headers).with_context(|| format!("invalid tipset {key}"))
    }

    /// Loads the parent of this tipset. The parent of a first tipset, and of
    /// the sentinel itself, is the sentinel.
    pub fn load_parent(&self, store: &impl Blockstore) -> anyhow::Result<Tipset> {
        Self::load(store, self.parents())
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn epoch(&self) -> ChainEpoch {
        self.headers.first().map(|h| h.epoch).unwrap_or_default()
    }

    pub fn block_headers(&self) -> &[CachingBlockHeader] {
        &self.headers
    }

    pub fn key(&self) -> &TipsetKey {
        &self.key
    }

    pub fn cids(&self) -> &[Cid] {
        self.key.cids()
    }

    /// Parent key shared by every block; empty for the sentinel.
    pub fn parents(&self) -> &TipsetKey {
        static EMPTY: TipsetKey = TipsetKey(Vec::new());
        self.headers.first().map(|h| &h.parents).unwrap_or(&EMPTY)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Iterates over this tipset and its ancestors, ending with the first
    /// tipset above the sentinel.
    pub fn chain<'a, DB: Blockstore + 'a>(
        self,
        store: &'a DB,
    ) -> impl Iterator<Item = anyhow::Result<Tipset>> + 'a {
        let mut next = Some(self);
        std::iter::from_fn(move || {
            let current = next.take().filter(|ts| !ts.is_empty())?;
            match current.load_parent(store) {
                Ok(parent) => next = Some(parent),
                Err(e) => return Some(Err(e)),
            }
            Some(Ok(current))
        })
    }
}
