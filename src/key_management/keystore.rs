// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::errors::Error;
use crate::shim::crypto::SignatureType;
use ahash::HashMap;

/// `KeyInfo` holds the type of a key together with its private key bytes.
#[derive(Clone, PartialEq, Debug, Eq)]
pub struct KeyInfo {
    key_type: SignatureType,
    private_key: Vec<u8>,
}

impl KeyInfo {
    pub fn new(key_type: SignatureType, private_key: Vec<u8>) -> Self {
        KeyInfo {
            key_type,
            private_key,
        }
    }

    pub fn key_type(&self) -> SignatureType {
        self.key_type
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }
}

/// In-memory set of [`KeyInfo`]s, resolved by name.
#[derive(Default, Clone, Debug)]
pub struct KeyStore {
    key_info: HashMap<String, KeyInfo>,
}

impl KeyStore {
    /// Return all of the keys that are stored in the `KeyStore`
    pub fn list(&self) -> Vec<String> {
        self.key_info.keys().cloned().collect()
    }

    /// Return `KeyInfo` that corresponds to a given key
    pub fn get(&self, k: &str) -> Result<&KeyInfo, Error> {
        self.key_info.get(k).ok_or(Error::KeyInfo)
    }

    /// Save a key `key_info` pair to the `KeyStore`
    pub fn put(&mut self, key: String, key_info: KeyInfo) -> Result<(), Error> {
        if self.key_info.contains_key(&key) {
            return Err(Error::KeyExists);
        }
        self.key_info.insert(key, key_info);
        Ok(())
    }

    /// Remove the key and corresponding `key_info` from the `KeyStore`
    pub fn remove(&mut self, key: &str) -> Result<KeyInfo, Error> {
        self.key_info.remove(key).ok_or(Error::KeyNotExists)
    }
}
