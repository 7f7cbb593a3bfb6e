// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::Cid;
use fvm_ipld_encoding::DAG_CBOR;
use multihash_codetable::{Code, MultihashDigest as _};

/// Extension methods for constructing `dag-cbor` [Cid]
pub trait CidCborExt {
    /// Default CID builder for Filecoin
    ///
    /// - The default codec is [`fvm_ipld_encoding::DAG_CBOR`]
    /// - The default hash function is 256 bit BLAKE2b
    ///
    /// This matches [`abi.CidBuilder`](https://github.com/filecoin-project/go-state-types/blob/master/abi/cid.go#L49) in go
    fn from_cbor_blake2b256<S: serde::ser::Serialize>(
        obj: &S,
    ) -> Result<Cid, fvm_ipld_encoding::Error> {
        let bytes = fvm_ipld_encoding::to_vec(obj)?;
        Ok(Self::from_cbor_bytes_blake2b256(&bytes))
    }

    /// Same as [`CidCborExt::from_cbor_blake2b256`] for bytes that are
    /// already `dag-cbor` encoded.
    fn from_cbor_bytes_blake2b256(bytes: &[u8]) -> Cid {
        Cid::new_v1(DAG_CBOR, Code::Blake2b256.digest(bytes))
    }
}

impl CidCborExt for Cid {}
