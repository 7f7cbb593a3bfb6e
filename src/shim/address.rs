// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub use super::fvm_shared_latest::address::{Address, Error, Protocol};

/// Derives the `secp256k1` key address for an uncompressed public key. The
/// address payload is the BLAKE2b-160 hash of the key.
pub fn address_from_public_key(public_key: &[u8]) -> Result<Address, Error> {
    Address::new_secp256k1(public_key)
}

/// Byte encoding used to give addresses a total, deterministic order.
pub fn address_sort_key(addr: &Address) -> Vec<u8> {
    addr.to_bytes()
}
