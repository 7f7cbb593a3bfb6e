// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::utils::cid::CidCborExt;
use anyhow::Context as _;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use serde::{Serialize, de::DeserializeOwned};

/// Extension methods for storing and loading `dag-cbor` objects addressed by
/// their BLAKE2b-256 [`Cid`].
pub trait CborStoreExt: Blockstore {
    /// Encodes `obj`, stores it under its default [`Cid`] and returns that
    /// [`Cid`].
    fn put_cbor_default<S: Serialize>(&self, obj: &S) -> anyhow::Result<Cid> {
        let bytes = fvm_ipld_encoding::to_vec(obj)?;
        let cid = Cid::from_cbor_bytes_blake2b256(&bytes);
        self.put_keyed(&cid, &bytes)?;
        Ok(cid)
    }

    /// Loads and decodes the object stored under `cid`, if any.
    fn get_cbor<T: DeserializeOwned>(&self, cid: &Cid) -> anyhow::Result<Option<T>> {
        match self.get(cid)? {
            Some(bytes) => Ok(Some(
                fvm_ipld_encoding::from_slice(&bytes)
                    .with_context(|| format!("failed to decode entry {cid}"))?,
            )),
            None => Ok(None),
        }
    }

    /// Same as [`CborStoreExt::get_cbor`], but a missing entry is an error.
    fn get_cbor_required<T: DeserializeOwned>(&self, cid: &Cid) -> anyhow::Result<T> {
        self.get_cbor(cid)?
            .with_context(|| format!("Entry not found in block store: cid={cid}"))
    }
}

impl<T: Blockstore> CborStoreExt for T {}
