// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Error, KeyInfo, KeyStore, wallet_helpers};
use crate::shim::{
    address::Address,
    crypto::{SignatureType, Signature, Signer},
};
use rand::{CryptoRng, RngCore};
use tracing::debug;

fn key_name(addr: &Address) -> String {
    format!("wallet-{addr}")
}

/// A set of signing keys, addressed by the account address derived from each
/// public key.
#[derive(Default, Clone, Debug)]
pub struct Wallet {
    keystore: KeyStore,
}

impl Wallet {
    pub fn new(keystore: KeyStore) -> Self {
        Wallet { keystore }
    }

    pub fn generate_addr_with_rng<R>(
        &mut self,
        typ: SignatureType,
        rng: &mut R,
    ) -> Result<Address, Error>
    where
        R: CryptoRng + RngCore,
    {
        let private_key = wallet_helpers::generate(typ, rng)?;
        self.import(KeyInfo::new(typ, private_key))
    }

    /// Adds an existing key and returns its address.
    pub fn import(&mut self, key_info: KeyInfo) -> Result<Address, Error> {
        let public_key = wallet_helpers::to_public(key_info.key_type(), key_info.private_key())?;
        let addr = wallet_helpers::new_address(key_info.key_type(), &public_key)?;
        self.keystore.put(key_name(&addr), key_info)?;
        debug!("imported key for {addr}");
        Ok(addr)
    }

    pub fn has_key(&self, addr: &Address) -> bool {
        self.keystore.get(&key_name(addr)).is_ok()
    }

    /// Addresses of every key in the wallet, in no particular order.
    pub fn list_addrs(&self) -> Vec<Address> {
        self.keystore
            .list()
            .iter()
            .filter_map(|name| name.strip_prefix("wallet-"))
            .filter_map(|addr| addr.parse().ok())
            .collect()
    }

    pub fn sign(&self, addr: &Address, msg: &[u8]) -> Result<Signature, Error> {
        let key_info = self.keystore.get(&key_name(addr))?;
        wallet_helpers::sign(key_info.key_type(), key_info.private_key(), msg)
    }
}

impl Signer for Wallet {
    fn sign_bytes(&self, data: &[u8], address: &Address) -> anyhow::Result<Signature> {
        Ok(self.sign(address, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn generated_addresses_are_listed() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut wallet = Wallet::default();
        let a = wallet
            .generate_addr_with_rng(SignatureType::Secp256k1, &mut rng)
            .unwrap();
        let b = wallet
            .generate_addr_with_rng(SignatureType::Secp256k1, &mut rng)
            .unwrap();
        assert_ne!(a, b);
        assert!(wallet.has_key(&a));
        let mut listed = wallet.list_addrs();
        listed.sort_by_key(|addr| addr.to_bytes());
        let mut expected = vec![a, b];
        expected.sort_by_key(|addr| addr.to_bytes());
        assert_eq!(listed, expected);
    }

    #[test]
    fn importing_twice_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let private_key =
            wallet_helpers::generate(SignatureType::Secp256k1, &mut rng).unwrap();
        let mut wallet = Wallet::default();
        wallet
            .import(KeyInfo::new(SignatureType::Secp256k1, private_key.clone()))
            .unwrap();
        assert!(matches!(
            wallet.import(KeyInfo::new(SignatureType::Secp256k1, private_key)),
            Err(Error::KeyExists)
        ));
    }

    #[test]
    fn signing_without_key_fails() {
        let wallet = Wallet::default();
        assert!(wallet.sign_bytes(b"data", &Address::new_id(1)).is_err());
    }
}
